//! Bulk upload and data reset endpoints.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use engine_core::{limits::MAX_UPLOAD_BYTES, ValidationErrorCode};
use telemetry::metrics;
use tracing::{debug, info, warn};

use crate::response::{ApiError, MessageResponse};
use crate::state::AppState;

/// Multipart field carrying the table.
const FILE_FIELD: &str = "file";

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::invalid(
            ValidationErrorCode::PayloadTooLarge,
            format!("upload exceeds {} bytes", MAX_UPLOAD_BYTES),
        )
    } else {
        ApiError::bad_request(e.body_text())
    }
}

/// POST /upload - Ingest one CSV file sent as multipart field `file`.
pub async fn upload_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<MessageResponse>, ApiError> {
    metrics().uploads_received.inc();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        if !file_name.ends_with(".csv") {
            warn!(file_name = %file_name, "Rejected non-CSV upload");
            return Err(ApiError::invalid(
                ValidationErrorCode::InvalidFileType,
                "Invalid file type. Please upload a CSV.",
            ));
        }

        let body = field.bytes().await.map_err(multipart_error)?;
        if body.len() > MAX_UPLOAD_BYTES {
            return Err(ApiError::invalid(
                ValidationErrorCode::PayloadTooLarge,
                format!(
                    "upload is {}KB, exceeds {}KB limit",
                    body.len() / 1024,
                    MAX_UPLOAD_BYTES / 1024
                ),
            ));
        }

        debug!(file_name = %file_name, size = body.len(), "Received upload");

        let count = state.ingestor.ingest_csv(&body).await?;
        return Ok(Json(MessageResponse::with_records(
            format!("Successfully processed {} records.", count),
            count as u64,
        )));
    }

    Err(ApiError::bad_request(format!(
        "multipart field '{}' is required",
        FILE_FIELD
    )))
}

/// DELETE /clear-data - Remove every stored record.
pub async fn clear_handler(
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    let removed = state.store.clear().await.inspect_err(|_| {
        metrics().store_errors.inc();
    })?;

    metrics().records_cleared.inc_by(removed);
    info!(removed = removed, "Cleared enrolment data");

    Ok(Json(MessageResponse::with_records(
        format!("Successfully deleted {} records from database.", removed),
        removed,
    )))
}
