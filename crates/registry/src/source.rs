//! Paged source abstraction.

use async_trait::async_trait;
use bytes::Bytes;
use engine_core::Result;

/// One page request against a paged CSV source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageQuery {
    pub limit: u32,
    pub offset: u64,
    pub state: Option<String>,
    pub district: Option<String>,
}

/// Anything that can hand back a page of delimited text.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Returns the raw page body. An empty or whitespace-only body means
    /// there are no more pages.
    async fn fetch_page(&self, query: &PageQuery) -> Result<Bytes>;
}
