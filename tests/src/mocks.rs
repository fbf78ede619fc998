//! Mock implementations for testing.

use async_trait::async_trait;
use bytes::Bytes;
use engine_core::{
    DbErrorCode, EnrolmentRecord, Error, MemoryStore, RecordFilter, RecordStore, Result,
    SourceErrorCode, StoredRecord,
};
use parking_lot::Mutex;
use registry::{PageQuery, PageSource};
use std::sync::Arc;

/// Store that delegates to a [`MemoryStore`] but can be told to fail.
///
/// Implements the same `RecordStore` trait as the ClickHouse store, so the
/// router runs unchanged against it.
#[derive(Clone, Default)]
pub struct MockStore {
    inner: Arc<MemoryStore>,
    fail_writes: Arc<Mutex<bool>>,
    fail_reads: Arc<Mutex<bool>>,
    offline: Arc<Mutex<bool>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `insert_batch` and `clear` fail.
    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.lock() = fail;
    }

    /// Make every `fetch` and `count` fail.
    pub fn set_fail_reads(&self, fail: bool) {
        *self.fail_reads.lock() = fail;
    }

    /// Make `ping` report the store as unreachable.
    pub fn set_offline(&self, offline: bool) {
        *self.offline.lock() = offline;
    }

    pub async fn records(&self) -> Vec<StoredRecord> {
        self.inner
            .fetch(&RecordFilter::all())
            .await
            .unwrap_or_default()
    }
}

#[async_trait]
impl RecordStore for MockStore {
    async fn insert_batch(&self, records: Vec<EnrolmentRecord>) -> Result<usize> {
        if *self.fail_writes.lock() {
            return Err(Error::database(
                DbErrorCode::WriteFailed,
                "mock store write failure",
            ));
        }
        self.inner.insert_batch(records).await
    }

    async fn clear(&self) -> Result<u64> {
        if *self.fail_writes.lock() {
            return Err(Error::database(
                DbErrorCode::DeleteFailed,
                "mock store delete failure",
            ));
        }
        self.inner.clear().await
    }

    async fn fetch(&self, filter: &RecordFilter) -> Result<Vec<StoredRecord>> {
        if *self.fail_reads.lock() {
            return Err(Error::database(
                DbErrorCode::QueryFailed,
                "mock store read failure",
            ));
        }
        self.inner.fetch(filter).await
    }

    async fn count(&self) -> Result<u64> {
        if *self.fail_reads.lock() {
            return Err(Error::database(
                DbErrorCode::QueryFailed,
                "mock store read failure",
            ));
        }
        self.inner.count().await
    }

    async fn ping(&self) -> bool {
        !*self.offline.lock()
    }
}

/// One scripted registry response.
#[derive(Debug, Clone)]
pub enum MockPage {
    Body(String),
    Status(u16),
    Unreachable,
}

/// Page source that replays scripted responses in order and records every
/// query it receives. Once the script runs out it serves empty pages.
#[derive(Clone, Default)]
pub struct MockSource {
    pages: Arc<Mutex<Vec<MockPage>>>,
    queries: Arc<Mutex<Vec<PageQuery>>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, page: MockPage) {
        self.pages.lock().push(page);
    }

    pub fn push_body(&self, body: impl Into<String>) {
        self.push(MockPage::Body(body.into()));
    }

    /// Queries received so far.
    pub fn queries(&self) -> Vec<PageQuery> {
        self.queries.lock().clone()
    }
}

#[async_trait]
impl PageSource for MockSource {
    async fn fetch_page(&self, query: &PageQuery) -> Result<Bytes> {
        let idx = {
            let mut queries = self.queries.lock();
            queries.push(query.clone());
            queries.len() - 1
        };

        match self.pages.lock().get(idx).cloned() {
            Some(MockPage::Body(body)) => Ok(Bytes::from(body)),
            Some(MockPage::Status(code)) => Err(Error::source(
                SourceErrorCode::BadStatus,
                format!("registry returned {}", code),
            )),
            Some(MockPage::Unreachable) => Err(Error::source(
                SourceErrorCode::Unreachable,
                "registry unreachable",
            )),
            None => Ok(Bytes::new()),
        }
    }
}
