//! HTTP client for the open-data registry.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use engine_core::{Error, Result, SourceErrorCode};
use telemetry::{health, metrics};
use tracing::{debug, warn};
use url::Url;

use crate::config::RegistryConfig;
use crate::source::{PageQuery, PageSource};

/// Fetches CSV pages of the enrolment resource.
#[derive(Clone)]
pub struct RegistryClient {
    endpoint: Url,
    api_key: Option<String>,
    http_client: reqwest::Client,
}

impl RegistryClient {
    pub fn new(config: &RegistryConfig) -> Result<Self> {
        let raw = format!(
            "{}/resource/{}",
            config.base_url.trim_end_matches('/'),
            config.resource_id
        );
        let endpoint = Url::parse(&raw)
            .map_err(|e| Error::internal(format!("invalid registry url {}: {}", raw, e)))?;

        if !config.has_api_key() {
            warn!("Registry API key not configured; requests will be sent without one");
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint,
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            http_client,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Full request URL for a page, including the key.
    pub fn page_url(&self, query: &PageQuery) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(ref key) = self.api_key {
                pairs.append_pair("api-key", key);
            }
            pairs
                .append_pair("format", "csv")
                .append_pair("limit", &query.limit.to_string())
                .append_pair("offset", &query.offset.to_string());
            if let Some(state) = query.state.as_deref().filter(|s| !s.is_empty()) {
                pairs.append_pair("filters[state]", state);
            }
            if let Some(district) = query.district.as_deref().filter(|d| !d.is_empty()) {
                pairs.append_pair("filters[district]", district);
            }
        }
        url
    }
}

#[async_trait]
impl PageSource for RegistryClient {
    async fn fetch_page(&self, query: &PageQuery) -> Result<Bytes> {
        let start = Instant::now();

        debug!(
            endpoint = %self.endpoint,
            limit = query.limit,
            offset = query.offset,
            "Fetching registry page"
        );

        let response = self
            .http_client
            .get(self.page_url(query))
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Registry request failed");
                metrics().source_errors.inc();
                health().registry.set_unhealthy(e.to_string());
                Error::source(SourceErrorCode::Unreachable, format!("registry unreachable: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Registry returned error");
            metrics().source_errors.inc();
            return Err(Error::source(
                SourceErrorCode::BadStatus,
                format!("registry returned {}: {}", status, body),
            ));
        }

        let body = response.bytes().await.map_err(|e| {
            metrics().source_errors.inc();
            Error::source(SourceErrorCode::Unreachable, format!("reading registry body: {}", e))
        })?;

        health().registry.set_healthy();
        metrics().sync_pages_fetched.inc();
        metrics()
            .source_latency_ms
            .observe(start.elapsed().as_millis() as u64);

        Ok(body)
    }
}
