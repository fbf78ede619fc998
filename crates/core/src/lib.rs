//! Core record model, normalization, ingestion and analytics for the
//! enrolment engine.

pub mod analytics;
pub mod clean;
pub mod dates;
pub mod error;
pub mod ingest;
pub mod limits;
pub mod normalize;
pub mod record;
pub mod store;
pub mod table;

pub use analytics::*;
pub use error::{DbErrorCode, Error, Result, SourceErrorCode, ValidationErrorCode};
pub use ingest::BulkIngestor;
pub use record::*;
pub use store::{MemoryStore, RecordStore};
