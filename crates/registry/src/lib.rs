//! Client for the public enrolment registry and the paged sync that feeds
//! its pages through bulk ingestion.

pub mod client;
pub mod config;
pub mod source;
pub mod sync;

pub use client::RegistryClient;
pub use config::RegistryConfig;
pub use source::{PageQuery, PageSource};
pub use sync::{SyncOrchestrator, SyncReport, SyncRequest};
