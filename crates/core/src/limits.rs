//! Size limits and defaults for the enrolment engine.
//!
//! Limits reject oversized inputs before they are decoded, so a single
//! upload cannot exhaust memory or overflow one atomic store insert.

// === Input Limits ===

/// Maximum upload payload size in bytes (64MB).
///
/// Registry exports for a full state run to a few MB; 64MB leaves headroom
/// for national dumps uploaded by hand.
pub const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Maximum records committed in one batch.
///
/// Kept below ClickHouse's default `max_insert_block_size` (1,048,576) so one
/// batch is always written as one block. The table is unpartitioned, so that
/// block lands as a single part and ClickHouse applies it atomically.
pub const MAX_BATCH_RECORDS: usize = 1_000_000;

/// Largest value accepted for one age bucket of one record.
///
/// Larger counts drop the row, which keeps store-wide sums far from `u64::MAX`.
pub const MAX_BUCKET_COUNT: u64 = u32::MAX as u64;

// === Analytics Defaults ===

/// Records whose three-bucket sum is below this are reported as anomalies.
pub const DEFAULT_ANOMALY_THRESHOLD: u64 = 10;

/// Classification label attached to every anomaly row.
pub const LOW_ENROLMENT_LABEL: &str = "Low Enrolment";

/// Top-state value reported when the store is empty.
pub const NO_TOP_STATE: &str = "N/A";

// === Sync Defaults ===

/// Page size used by the sync endpoint when none is given.
pub const DEFAULT_SYNC_LIMIT: u32 = 100;

/// Largest page size accepted from callers.
pub const MAX_SYNC_LIMIT: u32 = 10_000;
