//! Aggregation engine.
//!
//! Every query reads the current record set from the store and recomputes;
//! nothing is cached between calls. The folding functions are pure and
//! operate on any iterator of records.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Instant;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use telemetry::metrics;
use tracing::debug;

use crate::error::Result;
use crate::limits::{LOW_ENROLMENT_LABEL, NO_TOP_STATE};
use crate::record::{EnrolmentRecord, RecordFilter, StoredRecord};
use crate::store::RecordStore;

/// Totals across the whole record set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_enrolments: u64,
    pub total_0_5: u64,
    pub total_5_17: u64,
    pub total_17_plus: u64,
    pub top_state: String,
}

/// Per-bucket totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeComparison {
    pub age_0_5: u64,
    pub age_5_17: u64,
    pub age_17_plus: u64,
}

impl AgeComparison {
    pub fn total(&self) -> u64 {
        self.age_0_5
            .saturating_add(self.age_5_17)
            .saturating_add(self.age_17_plus)
    }

    fn add(&mut self, record: &EnrolmentRecord) {
        self.age_0_5 = self.age_0_5.saturating_add(record.age_0_5);
        self.age_5_17 = self.age_5_17.saturating_add(record.age_5_17);
        self.age_17_plus = self.age_17_plus.saturating_add(record.age_17_plus);
    }
}

/// One `(date, state)` group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTrend {
    pub date: NaiveDate,
    pub state: String,
    pub enrolments: u64,
}

/// One `(date, district)` group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistrictTrend {
    pub date: NaiveDate,
    pub district: String,
    pub enrolments: u64,
}

/// A single record whose total falls below the anomaly threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalyRow {
    pub date: NaiveDate,
    pub district: String,
    pub total_enrolment: u64,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Sums the three age buckets.
pub fn age_totals<'a, I>(records: I) -> AgeComparison
where
    I: IntoIterator<Item = &'a EnrolmentRecord>,
{
    let mut totals = AgeComparison::default();
    for record in records {
        totals.add(record);
    }
    totals
}

/// Overall totals plus the state with the highest enrolment.
///
/// Ties go to the alphabetically first state.
pub fn summarize<'a, I>(records: I) -> SummaryStats
where
    I: IntoIterator<Item = &'a EnrolmentRecord>,
{
    let mut totals = AgeComparison::default();
    let mut by_state: BTreeMap<&str, u64> = BTreeMap::new();

    for record in records {
        totals.add(record);
        let total = by_state.entry(record.state.as_str()).or_default();
        *total = total.saturating_add(record.total());
    }

    let mut top: Option<(&str, u64)> = None;
    for (state, total) in by_state {
        if top.map_or(true, |(_, best)| total > best) {
            top = Some((state, total));
        }
    }

    SummaryStats {
        total_enrolments: totals.total(),
        total_0_5: totals.age_0_5,
        total_5_17: totals.age_5_17,
        total_17_plus: totals.age_17_plus,
        top_state: top.map_or_else(|| NO_TOP_STATE.to_string(), |(s, _)| s.to_string()),
    }
}

/// Groups records by `(date, key)` and sums their totals, ordered by key.
fn group_by_date<'a, I, F>(records: I, key: F) -> BTreeMap<(NaiveDate, &'a str), u64>
where
    I: IntoIterator<Item = &'a EnrolmentRecord>,
    F: Fn(&'a EnrolmentRecord) -> &'a str,
{
    let mut groups = BTreeMap::new();
    for record in records {
        let total: &mut u64 = groups.entry((record.date, key(record))).or_default();
        *total = total.saturating_add(record.total());
    }
    groups
}

pub fn state_trends<'a, I>(records: I) -> Vec<StateTrend>
where
    I: IntoIterator<Item = &'a EnrolmentRecord>,
{
    group_by_date(records, |r| r.state.as_str())
        .into_iter()
        .map(|((date, state), enrolments)| StateTrend {
            date,
            state: state.to_string(),
            enrolments,
        })
        .collect()
}

pub fn district_trends<'a, I>(records: I) -> Vec<DistrictTrend>
where
    I: IntoIterator<Item = &'a EnrolmentRecord>,
{
    group_by_date(records, |r| r.district.as_str())
        .into_iter()
        .map(|((date, district), enrolments)| DistrictTrend {
            date,
            district: district.to_string(),
            enrolments,
        })
        .collect()
}

/// Every record whose total is strictly below `threshold`, in input order.
pub fn find_anomalies<'a, I>(records: I, threshold: u64) -> Vec<AnomalyRow>
where
    I: IntoIterator<Item = &'a EnrolmentRecord>,
{
    records
        .into_iter()
        .filter(|r| r.total() < threshold)
        .map(|r| AnomalyRow {
            date: r.date,
            district: r.district.clone(),
            total_enrolment: r.total(),
            kind: LOW_ENROLMENT_LABEL.to_string(),
        })
        .collect()
}

/// Distinct values of one field, sorted ascending.
pub fn distinct<'a, I, F>(records: I, field: F) -> Vec<String>
where
    I: IntoIterator<Item = &'a EnrolmentRecord>,
    F: Fn(&'a EnrolmentRecord) -> &'a str,
{
    records
        .into_iter()
        .map(field)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Query front-end over a record store.
#[derive(Clone)]
pub struct AggregationEngine {
    store: Arc<dyn RecordStore>,
}

impl AggregationEngine {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn overall_summary(&self) -> Result<SummaryStats> {
        let records = self.load("summary", &RecordFilter::all()).await?;
        Ok(summarize(records.iter().map(|r| &r.record)))
    }

    pub async fn trends_by_state(&self, filter_state: Option<&str>) -> Result<Vec<StateTrend>> {
        let records = self
            .load("trends_by_state", &RecordFilter::by_state(filter_state))
            .await?;
        Ok(state_trends(records.iter().map(|r| &r.record)))
    }

    pub async fn trends_by_district(
        &self,
        filter_district: Option<&str>,
    ) -> Result<Vec<DistrictTrend>> {
        let records = self
            .load("trends_by_district", &RecordFilter::by_district(filter_district))
            .await?;
        Ok(district_trends(records.iter().map(|r| &r.record)))
    }

    pub async fn age_comparison(&self) -> Result<AgeComparison> {
        let records = self.load("age_comparison", &RecordFilter::all()).await?;
        Ok(age_totals(records.iter().map(|r| &r.record)))
    }

    pub async fn anomalies(&self, threshold: u64) -> Result<Vec<AnomalyRow>> {
        let records = self.load("anomalies", &RecordFilter::all()).await?;
        Ok(find_anomalies(records.iter().map(|r| &r.record), threshold))
    }

    pub async fn unique_states(&self) -> Result<Vec<String>> {
        let records = self.load("unique_states", &RecordFilter::all()).await?;
        Ok(distinct(records.iter().map(|r| &r.record), |r| r.state.as_str()))
    }

    pub async fn unique_districts(&self, filter_state: Option<&str>) -> Result<Vec<String>> {
        let records = self
            .load("unique_districts", &RecordFilter::by_state(filter_state))
            .await?;
        Ok(distinct(records.iter().map(|r| &r.record), |r| r.district.as_str()))
    }

    async fn load(&self, query: &'static str, filter: &RecordFilter) -> Result<Vec<StoredRecord>> {
        let start = Instant::now();
        let records = self.store.fetch(filter).await?;
        let latency_ms = start.elapsed().as_millis() as u64;

        metrics().queries_served.inc();
        metrics().query_latency_ms.observe(latency_ms);
        debug!(query = query, records = records.len(), latency_ms = latency_ms, "Loaded records");

        Ok(records)
    }
}
