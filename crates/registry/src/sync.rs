//! Paged sync from a remote source into the record store.

use std::sync::Arc;

use engine_core::limits::DEFAULT_SYNC_LIMIT;
use engine_core::{BulkIngestor, Error, Result};
use serde::{Deserialize, Serialize};
use telemetry::metrics;
use tracing::{debug, info, warn};
use validator::Validate;

use crate::source::{PageQuery, PageSource};

/// Parameters of one sync call.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SyncRequest {
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 10000))]
    pub limit: u32,
    #[serde(default)]
    pub offset: u64,
    pub state: Option<String>,
    pub district: Option<String>,
    #[serde(default)]
    pub fetch_all: bool,
}

fn default_limit() -> u32 {
    DEFAULT_SYNC_LIMIT
}

impl Default for SyncRequest {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
            state: None,
            district: None,
            fetch_all: false,
        }
    }
}

impl SyncRequest {
    fn first_page(&self) -> PageQuery {
        PageQuery {
            limit: self.limit,
            offset: self.offset,
            state: self.state.clone().filter(|s| !s.is_empty()),
            district: self.district.clone().filter(|d| !d.is_empty()),
        }
    }
}

/// Outcome of a completed sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub records_synced: usize,
    pub pages_fetched: u32,
}

/// Pulls pages from a [`PageSource`] and commits each through the ingestor.
#[derive(Clone)]
pub struct SyncOrchestrator {
    source: Arc<dyn PageSource>,
    ingestor: BulkIngestor,
}

impl SyncOrchestrator {
    pub fn new(source: Arc<dyn PageSource>, ingestor: BulkIngestor) -> Self {
        Self { source, ingestor }
    }

    /// Runs a sync until an empty page, a page that ingests nothing, or,
    /// without `fetch_all`, after the first page.
    ///
    /// Every page is its own batch. A failure on a later page returns the
    /// error and leaves earlier pages committed.
    pub async fn sync(&self, request: &SyncRequest) -> Result<SyncReport> {
        request
            .validate()
            .map_err(|e| Error::validation(format!("{}", e)))?;

        metrics().sync_runs.inc();
        metrics().active_syncs.inc();
        let result = self.run(request).await;
        metrics().active_syncs.dec();

        match &result {
            Ok(report) => info!(
                records = report.records_synced,
                pages = report.pages_fetched,
                state = ?request.state,
                district = ?request.district,
                "Sync completed"
            ),
            Err(e) => warn!(error = %e, "Sync aborted"),
        }

        result
    }

    async fn run(&self, request: &SyncRequest) -> Result<SyncReport> {
        let mut query = request.first_page();
        let mut report = SyncReport {
            records_synced: 0,
            pages_fetched: 0,
        };

        loop {
            let body = self.source.fetch_page(&query).await?;
            report.pages_fetched += 1;

            if body.iter().all(u8::is_ascii_whitespace) {
                debug!(offset = query.offset, "Empty page, stopping");
                break;
            }

            let ingested = self.ingestor.ingest_csv(&body).await?;
            if ingested == 0 {
                debug!(offset = query.offset, "Page yielded no records, stopping");
                break;
            }
            report.records_synced += ingested;

            if !request.fetch_all {
                break;
            }
            query.offset += u64::from(query.limit);
        }

        Ok(report)
    }
}
