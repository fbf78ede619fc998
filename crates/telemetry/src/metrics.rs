//! Internal metrics collection.
//!
//! Counters live in-memory and are exposed as a JSON snapshot by the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// A counter metric.
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_by(&self, n: u64) {
        self.0.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    pub fn reset(&self) -> u64 {
        self.0.swap(0, Ordering::Relaxed)
    }
}

/// A gauge metric (can go up or down).
#[derive(Debug, Default)]
pub struct Gauge(AtomicU64);

impl Gauge {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn set(&self, val: u64) {
        self.0.store(val, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn dec(&self) {
        self.0.fetch_sub(1, Ordering::Relaxed);
    }
}

/// Histogram for latency tracking.
#[derive(Debug)]
pub struct Histogram {
    /// Buckets: 1ms, 5ms, 10ms, 25ms, 50ms, 100ms, 250ms, 500ms, 1s, 5s, 10s
    buckets: [AtomicU64; 11],
    sum: AtomicU64,
    count: AtomicU64,
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Histogram {
    const BUCKET_BOUNDS: [u64; 11] = [1, 5, 10, 25, 50, 100, 250, 500, 1000, 5000, 10000];

    pub fn new() -> Self {
        Self {
            buckets: Default::default(),
            sum: AtomicU64::new(0),
            count: AtomicU64::new(0),
        }
    }

    /// Records a value in milliseconds.
    pub fn observe(&self, ms: u64) {
        self.sum.fetch_add(ms, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);

        let idx = Self::BUCKET_BOUNDS
            .iter()
            .position(|&bound| ms <= bound)
            .unwrap_or(Self::BUCKET_BOUNDS.len() - 1);
        self.buckets[idx].fetch_add(1, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn sum(&self) -> u64 {
        self.sum.load(Ordering::Relaxed)
    }

    pub fn mean(&self) -> f64 {
        let count = self.count();
        if count == 0 {
            0.0
        } else {
            self.sum() as f64 / count as f64
        }
    }

    /// Returns bucket counts.
    pub fn buckets(&self) -> Vec<(u64, u64)> {
        Self::BUCKET_BOUNDS
            .iter()
            .zip(self.buckets.iter())
            .map(|(&bound, count)| (bound, count.load(Ordering::Relaxed)))
            .collect()
    }
}

/// Collected metrics for the enrolment engine.
#[derive(Debug, Default)]
pub struct Metrics {
    // Ingestion
    pub uploads_received: Counter,
    pub rows_received: Counter,
    pub rows_discarded: Counter,
    pub records_ingested: Counter,
    pub batches_committed: Counter,
    pub records_cleared: Counter,

    // Store
    pub store_errors: Counter,

    // Registry sync
    pub sync_runs: Counter,
    pub sync_pages_fetched: Counter,
    pub source_errors: Counter,

    // Analytics
    pub queries_served: Counter,

    // Latency histograms
    pub ingest_latency_ms: Histogram,
    pub query_latency_ms: Histogram,
    pub source_latency_ms: Histogram,

    // Gauges
    pub active_syncs: Gauge,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A snapshot of metrics at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub timestamp: DateTime<Utc>,
    pub uploads_received: u64,
    pub rows_received: u64,
    pub rows_discarded: u64,
    pub records_ingested: u64,
    pub batches_committed: u64,
    pub records_cleared: u64,
    pub store_errors: u64,
    pub sync_runs: u64,
    pub sync_pages_fetched: u64,
    pub source_errors: u64,
    pub queries_served: u64,
    pub ingest_latency_mean_ms: f64,
    pub query_latency_mean_ms: f64,
    pub source_latency_mean_ms: f64,
    pub active_syncs: u64,
}

impl Metrics {
    /// Takes a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            timestamp: Utc::now(),
            uploads_received: self.uploads_received.get(),
            rows_received: self.rows_received.get(),
            rows_discarded: self.rows_discarded.get(),
            records_ingested: self.records_ingested.get(),
            batches_committed: self.batches_committed.get(),
            records_cleared: self.records_cleared.get(),
            store_errors: self.store_errors.get(),
            sync_runs: self.sync_runs.get(),
            sync_pages_fetched: self.sync_pages_fetched.get(),
            source_errors: self.source_errors.get(),
            queries_served: self.queries_served.get(),
            ingest_latency_mean_ms: self.ingest_latency_ms.mean(),
            query_latency_mean_ms: self.query_latency_ms.mean(),
            source_latency_mean_ms: self.source_latency_ms.mean(),
            active_syncs: self.active_syncs.get(),
        }
    }
}

/// Global metrics registry.
pub static METRICS: std::sync::LazyLock<Metrics> = std::sync::LazyLock::new(Metrics::new);

/// Get the global metrics instance.
pub fn metrics() -> &'static Metrics {
    &METRICS
}
