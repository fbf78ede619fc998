//! Record store abstraction.
//!
//! The ingestion pipeline and the aggregation engine only talk to a
//! [`RecordStore`]. ClickHouse implements it in production; [`MemoryStore`]
//! backs local development and tests.

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::Result;
use crate::record::{EnrolmentRecord, RecordFilter, StoredRecord};

/// Persistence operations needed by the engine.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persists every record or none of them. Returns the number written.
    async fn insert_batch(&self, records: Vec<EnrolmentRecord>) -> Result<usize>;

    /// Deletes all records, returning how many were removed.
    async fn clear(&self) -> Result<u64>;

    /// Reads records matching the filter.
    async fn fetch(&self, filter: &RecordFilter) -> Result<Vec<StoredRecord>>;

    /// Number of persisted records.
    async fn count(&self) -> Result<u64>;

    /// Connectivity check.
    async fn ping(&self) -> bool;
}

/// In-process store.
///
/// A batch is assigned ids up front and appended under a single write lock,
/// so readers never observe half a batch.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<StoredRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert_batch(&self, records: Vec<EnrolmentRecord>) -> Result<usize> {
        let count = records.len();
        let stored: Vec<StoredRecord> = records.into_iter().map(StoredRecord::assign).collect();
        self.records.write().extend(stored);
        Ok(count)
    }

    async fn clear(&self) -> Result<u64> {
        let mut records = self.records.write();
        let count = records.len() as u64;
        records.clear();
        Ok(count)
    }

    async fn fetch(&self, filter: &RecordFilter) -> Result<Vec<StoredRecord>> {
        Ok(self
            .records
            .read()
            .iter()
            .filter(|r| filter.matches(&r.record))
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.records.read().len() as u64)
    }

    async fn ping(&self) -> bool {
        true
    }
}
