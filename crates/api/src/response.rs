//! Standardized API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use engine_core::ValidationErrorCode;
use serde::{Deserialize, Serialize};
use telemetry::HealthStatus;

/// Outcome message for mutating endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<u64>,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            records: None,
        }
    }

    pub fn with_records(message: impl Into<String>, records: u64) -> Self {
        Self {
            message: message.into(),
            records: Some(records),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub store_connected: bool,
    pub registry_reachable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<u64>,
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = Some(details);
        self
    }
}

/// API error carrying one of the engine's error codes.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ErrorResponse,
}

impl ApiError {
    pub fn with_code(status: StatusCode, code: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            status,
            response: ErrorResponse::new(msg, code),
        }
    }

    /// Input rejected before it reached the engine.
    pub fn invalid(code: ValidationErrorCode, msg: impl Into<String>) -> Self {
        let status = StatusCode::from_u16(code.http_status()).unwrap_or(StatusCode::BAD_REQUEST);
        Self::with_code(status, code.code(), msg)
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::invalid(ValidationErrorCode::MalformedInput, msg)
    }

    pub fn validation(code: impl Into<String>, status: StatusCode, errors: Vec<String>) -> Self {
        Self {
            status,
            response: ErrorResponse::new("Validation failed", code).with_details(errors),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_code(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL", msg)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<engine_core::Error> for ApiError {
    fn from(err: engine_core::Error) -> Self {
        let status =
            StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match &err {
            engine_core::Error::ValidationWithCode { code, message, .. } => {
                ApiError::validation(*code, status, vec![message.clone()])
            }
            engine_core::Error::Database { code, message, .. }
            | engine_core::Error::Source { code, message, .. } => {
                ApiError::with_code(status, *code, message)
            }
            engine_core::Error::Validation(msg) => ApiError::bad_request(msg),
            _ => ApiError::internal(err.to_string()),
        }
    }
}
