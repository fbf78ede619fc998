//! Bulk ingestion: CSV bytes to persisted records.
//!
//! Decoding, normalizing and cleaning are pure; the only side effect is the
//! single atomic `insert_batch` at the end.

use std::sync::Arc;
use std::time::Instant;

use telemetry::metrics;
use tracing::{debug, error, info};

use crate::clean::clean_rows;
use crate::error::{Error, Result, ValidationErrorCode};
use crate::limits::MAX_BATCH_RECORDS;
use crate::normalize::normalize;
use crate::record::EnrolmentRecord;
use crate::store::RecordStore;
use crate::table::RawTable;

/// Commits validated batches to a record store.
#[derive(Clone)]
pub struct BulkIngestor {
    store: Arc<dyn RecordStore>,
}

impl BulkIngestor {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Runs the full pipeline over one CSV blob and returns the ingested count.
    ///
    /// Malformed input fails the call before anything is written. Rows that
    /// fail cleaning are dropped and only show up as a smaller count.
    pub async fn ingest_csv(&self, bytes: &[u8]) -> Result<usize> {
        let start = Instant::now();

        let table = RawTable::from_csv(bytes)?;
        let normalized = normalize(&table);

        debug!(
            columns = table.headers.len(),
            dialects = ?normalized.dialects,
            unmapped = ?normalized.unmapped,
            "Normalized table headers"
        );

        let cleaned = clean_rows(&normalized.rows);
        let discarded = cleaned.discarded();

        metrics().rows_received.inc_by(cleaned.total_rows as u64);
        metrics().rows_discarded.inc_by(discarded as u64);

        let ingested = self.ingest_records(cleaned.records).await?;

        let latency_ms = start.elapsed().as_millis() as u64;
        metrics().ingest_latency_ms.observe(latency_ms);

        info!(
            rows = table.len(),
            ingested = ingested,
            discarded = discarded,
            latency_ms = latency_ms,
            "CSV ingested"
        );

        Ok(ingested)
    }

    /// Persists already-clean records as one atomic batch.
    pub async fn ingest_records(&self, records: Vec<EnrolmentRecord>) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        if records.len() > MAX_BATCH_RECORDS {
            return Err(Error::validation_code(
                ValidationErrorCode::PayloadTooLarge,
                format!(
                    "batch has {} records, exceeds {} limit",
                    records.len(),
                    MAX_BATCH_RECORDS
                ),
            ));
        }

        let count = records.len();
        match self.store.insert_batch(records).await {
            Ok(written) => {
                metrics().batches_committed.inc();
                metrics().records_ingested.inc_by(written as u64);
                debug!(count = written, "Batch committed");
                Ok(written)
            }
            Err(e) => {
                metrics().store_errors.inc();
                error!(count = count, error = %e, "Batch rolled back");
                Err(e)
            }
        }
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }
}
