//! ClickHouse table schemas.

/// Table holding every ingested enrolment record.
pub const ENROLMENT_TABLE: &str = "enrolment_data";

/// SQL for creating the enrolment table inside the client's database.
///
/// Duplicates are legitimate rows, so a plain MergeTree is used rather than
/// a replacing engine. The table has no partition key: an insert block that
/// spans partitions is split into parts committed one by one, which would
/// break all-or-nothing batches.
pub const CREATE_ENROLMENT_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS enrolment_data (
    id String,
    date Date,
    state LowCardinality(String),
    district String,
    pincode Nullable(String),
    age_0_5 UInt64,
    age_5_17 UInt64,
    age_17_plus UInt64,
    created_at DateTime DEFAULT now()
)
ENGINE = MergeTree()
ORDER BY (state, district, date)
SETTINGS index_granularity = 8192
"#;

/// SQL for creating the database itself.
pub fn create_database(database: &str) -> String {
    format!("CREATE DATABASE IF NOT EXISTS `{}`", database.replace('`', ""))
}

/// Returns table DDL in creation order.
pub fn all_tables() -> Vec<&'static str> {
    vec![CREATE_ENROLMENT_TABLE]
}
