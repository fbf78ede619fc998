//! Application state shared across handlers.

use std::sync::Arc;

use engine_core::{AggregationEngine, BulkIngestor, RecordStore};
use registry::{PageSource, SyncOrchestrator};

/// Shared application state.
///
/// Every component holds the same store handle, so an upload is visible to
/// the next analytics call without any cache to invalidate.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub ingestor: BulkIngestor,
    pub analytics: AggregationEngine,
    pub sync: SyncOrchestrator,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, source: Arc<dyn PageSource>) -> Self {
        let ingestor = BulkIngestor::new(store.clone());
        Self {
            analytics: AggregationEngine::new(store.clone()),
            sync: SyncOrchestrator::new(source, ingestor.clone()),
            ingestor,
            store,
        }
    }
}
