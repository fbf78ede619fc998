//! ClickHouse-backed record store.

use async_trait::async_trait;
use chrono::NaiveDate;
use clickhouse::Row;
use engine_core::{
    DbErrorCode, EnrolmentRecord, Error, RecordFilter, RecordStore, Result, StoredRecord,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::client::ClickHouseClient;
use crate::health::check_connection;
use crate::schema::ENROLMENT_TABLE;

const COLUMNS: &str = "id, date, state, district, pincode, age_0_5, age_5_17, age_17_plus";

/// `NaiveDate::default()` is 1970-01-01.
fn epoch() -> NaiveDate {
    NaiveDate::default()
}

/// Row layout of `enrolment_data`. `Date` travels as days since the epoch.
#[derive(Debug, Clone, Row, Serialize, Deserialize)]
pub struct EnrolmentRow {
    pub id: String,
    pub date: u16,
    pub state: String,
    pub district: String,
    pub pincode: Option<String>,
    pub age_0_5: u64,
    pub age_5_17: u64,
    pub age_17_plus: u64,
}

impl EnrolmentRow {
    /// Fails for dates outside the `Date` range (1970-01-01 to 2149-06-06).
    pub fn from_stored(stored: StoredRecord) -> Result<Self> {
        let days = stored.record.date.signed_duration_since(epoch()).num_days();
        let date = u16::try_from(days).map_err(|_| {
            Error::database(
                DbErrorCode::WriteFailed,
                format!("date {} outside storable range", stored.record.date),
            )
        })?;

        let r = stored.record;
        Ok(Self {
            id: stored.id.to_string(),
            date,
            state: r.state,
            district: r.district,
            pincode: r.pincode,
            age_0_5: r.age_0_5,
            age_5_17: r.age_5_17,
            age_17_plus: r.age_17_plus,
        })
    }

    pub fn into_stored(self) -> Result<StoredRecord> {
        let id = Uuid::parse_str(&self.id).map_err(|e| {
            Error::database(DbErrorCode::QueryFailed, format!("bad id {}: {}", self.id, e))
        })?;
        let date = epoch() + chrono::Days::new(u64::from(self.date));

        Ok(StoredRecord {
            id,
            record: EnrolmentRecord {
                date,
                state: self.state,
                district: self.district,
                pincode: self.pincode,
                age_0_5: self.age_0_5,
                age_5_17: self.age_5_17,
                age_17_plus: self.age_17_plus,
            },
        })
    }
}

/// Builds the SELECT for a filter along with its bind values, in order.
fn select_sql(filter: &RecordFilter) -> (String, Vec<String>) {
    let mut clauses = Vec::new();
    let mut binds = Vec::new();

    if let Some(ref state) = filter.state {
        clauses.push("state = ?");
        binds.push(state.clone());
    }
    if let Some(ref district) = filter.district {
        clauses.push("district = ?");
        binds.push(district.clone());
    }

    let mut sql = format!("SELECT {} FROM {}", COLUMNS, ENROLMENT_TABLE);
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY date, state, district");

    (sql, binds)
}

/// Record store over a single ClickHouse table.
///
/// A batch is written through one INSERT request. The request is only
/// committed by `end()`, so any failure before that leaves the table as it was.
#[derive(Clone)]
pub struct ClickHouseStore {
    client: ClickHouseClient,
}

impl ClickHouseStore {
    pub fn new(client: ClickHouseClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ClickHouseClient {
        &self.client
    }
}

fn write_err(e: impl std::fmt::Display) -> Error {
    Error::database(DbErrorCode::WriteFailed, format!("insert failed: {}", e))
}

#[async_trait]
impl RecordStore for ClickHouseStore {
    async fn insert_batch(&self, records: Vec<EnrolmentRecord>) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let count = records.len();
        let start = std::time::Instant::now();

        // Convert everything up front so a bad row aborts before any bytes are sent.
        let rows = records
            .into_iter()
            .map(|r| EnrolmentRow::from_stored(StoredRecord::assign(r)))
            .collect::<Result<Vec<_>>>()?;

        let mut insert = self
            .client
            .inner()
            .insert::<EnrolmentRow>(ENROLMENT_TABLE)
            .map_err(write_err)?;

        for row in &rows {
            insert.write(row).await.map_err(write_err)?;
        }

        insert.end().await.map_err(write_err)?;

        debug!(
            count = count,
            latency_ms = %start.elapsed().as_millis(),
            "Inserted enrolment batch to ClickHouse"
        );

        Ok(count)
    }

    async fn clear(&self) -> Result<u64> {
        let removed = self.count().await.map_err(|e| {
            Error::database(DbErrorCode::DeleteFailed, format!("count before clear: {}", e))
        })?;

        self.client
            .inner()
            .query(&format!("TRUNCATE TABLE IF EXISTS {}", ENROLMENT_TABLE))
            .execute()
            .await
            .map_err(|e| Error::database(DbErrorCode::DeleteFailed, format!("truncate failed: {}", e)))?;

        warn!(removed = removed, "Enrolment table truncated");
        Ok(removed)
    }

    async fn fetch(&self, filter: &RecordFilter) -> Result<Vec<StoredRecord>> {
        let (sql, binds) = select_sql(filter);

        let mut query = self.client.inner().query(&sql);
        for value in binds {
            query = query.bind(value);
        }

        let rows: Vec<EnrolmentRow> = query
            .fetch_all()
            .await
            .map_err(|e| Error::database(DbErrorCode::QueryFailed, format!("select failed: {}", e)))?;

        rows.into_iter().map(EnrolmentRow::into_stored).collect()
    }

    async fn count(&self) -> Result<u64> {
        self.client
            .inner()
            .query(&format!("SELECT count() FROM {}", ENROLMENT_TABLE))
            .fetch_one::<u64>()
            .await
            .map_err(|e| Error::database(DbErrorCode::QueryFailed, format!("count failed: {}", e)))
    }

    async fn ping(&self) -> bool {
        check_connection(&self.client).await
    }
}
