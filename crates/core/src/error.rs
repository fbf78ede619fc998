//! Unified error types for the enrolment engine.
//!
//! Error codes:
//! - VALID_001-003: Input errors (whole call rejected, nothing persisted)
//! - DB_001-003: Record store errors
//! - SRC_001-002: External registry errors

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Input error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorCode {
    /// VALID_001: Undecodable bytes or unparseable table structure
    MalformedInput,
    /// VALID_002: Payload or batch exceeds configured limits
    PayloadTooLarge,
    /// VALID_003: Upload is not a CSV file
    InvalidFileType,
}

impl ValidationErrorCode {
    /// Get the error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedInput => "VALID_001",
            Self::PayloadTooLarge => "VALID_002",
            Self::InvalidFileType => "VALID_003",
        }
    }

    /// Get the HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::PayloadTooLarge => 413,
            _ => 400,
        }
    }
}

/// Record store error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbErrorCode {
    /// DB_001: Batch write failed, batch rolled back
    WriteFailed,
    /// DB_002: Bulk delete failed
    DeleteFailed,
    /// DB_003: Read query failed
    QueryFailed,
}

impl DbErrorCode {
    /// Get the error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::WriteFailed => "DB_001",
            Self::DeleteFailed => "DB_002",
            Self::QueryFailed => "DB_003",
        }
    }

    /// Get the HTTP status code.
    pub fn http_status(&self) -> u16 {
        500
    }
}

/// External source error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorCode {
    /// SRC_001: Registry unreachable (transport failure, timeout)
    Unreachable,
    /// SRC_002: Registry answered with a non-success status
    BadStatus,
}

impl SourceErrorCode {
    /// Get the error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unreachable => "SRC_001",
            Self::BadStatus => "SRC_002",
        }
    }

    /// Get the HTTP status code.
    pub fn http_status(&self) -> u16 {
        502
    }
}

/// Unified error type for the enrolment engine.
#[derive(Debug, Error)]
pub enum Error {
    /// Input error with code.
    #[error("[{code}] {message}")]
    ValidationWithCode {
        code: &'static str,
        message: String,
        http_status: u16,
    },

    /// Record store error with code.
    #[error("[{code}] {message}")]
    Database {
        code: &'static str,
        message: String,
        http_status: u16,
    },

    /// External source error with code.
    #[error("[{code}] {message}")]
    Source {
        code: &'static str,
        message: String,
        http_status: u16,
    },

    #[error("validation error: {0}")]
    Validation(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an input error with code.
    pub fn validation_code(code: ValidationErrorCode, msg: impl Into<String>) -> Self {
        Self::ValidationWithCode {
            code: code.code(),
            message: msg.into(),
            http_status: code.http_status(),
        }
    }

    /// Malformed input: undecodable bytes or broken table structure.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::validation_code(ValidationErrorCode::MalformedInput, msg)
    }

    /// Create a record store error.
    pub fn database(code: DbErrorCode, msg: impl Into<String>) -> Self {
        Self::Database {
            code: code.code(),
            message: msg.into(),
            http_status: code.http_status(),
        }
    }

    /// Create an external source error.
    pub fn source(code: SourceErrorCode, msg: impl Into<String>) -> Self {
        Self::Source {
            code: code.code(),
            message: msg.into(),
            http_status: code.http_status(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get the HTTP status code for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::ValidationWithCode { http_status, .. } => *http_status,
            Self::Database { http_status, .. } => *http_status,
            Self::Source { http_status, .. } => *http_status,
            Self::Validation(_) => 400,
            Self::Internal(_) => 500,
        }
    }

    /// Get the error code if this is a coded error.
    pub fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::ValidationWithCode { code, .. } => Some(code),
            Self::Database { code, .. } => Some(code),
            Self::Source { code, .. } => Some(code),
            _ => None,
        }
    }
}
