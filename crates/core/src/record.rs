//! Canonical enrolment record types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Canonical field names every input dialect is mapped onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    Date,
    State,
    District,
    Pincode,
    #[serde(rename = "age_0_5")]
    Age0To5,
    #[serde(rename = "age_5_17")]
    Age5To17,
    #[serde(rename = "age_17_plus")]
    Age17Plus,
}

impl CanonicalField {
    /// All canonical fields in column order.
    pub const ALL: [CanonicalField; 7] = [
        Self::Date,
        Self::State,
        Self::District,
        Self::Pincode,
        Self::Age0To5,
        Self::Age5To17,
        Self::Age17Plus,
    ];

    /// Age bucket fields, synthesized with 0 when absent from the input.
    pub const AGE_BUCKETS: [CanonicalField; 3] = [Self::Age0To5, Self::Age5To17, Self::Age17Plus];

    /// Fields a row must carry to survive cleaning.
    pub const REQUIRED: [CanonicalField; 3] = [Self::Date, Self::State, Self::District];

    /// Returns the canonical column name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::State => "state",
            Self::District => "district",
            Self::Pincode => "pincode",
            Self::Age0To5 => "age_0_5",
            Self::Age5To17 => "age_5_17",
            Self::Age17Plus => "age_17_plus",
        }
    }

    pub fn is_age_bucket(&self) -> bool {
        Self::AGE_BUCKETS.contains(self)
    }
}

impl std::fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully normalized, validated enrolment entry.
///
/// Created only by the cleaner; never mutated once persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrolmentRecord {
    pub date: NaiveDate,
    pub state: String,
    pub district: String,
    pub pincode: Option<String>,
    pub age_0_5: u64,
    pub age_5_17: u64,
    pub age_17_plus: u64,
}

impl EnrolmentRecord {
    /// Sum of the three age buckets, saturating at `u64::MAX`.
    pub fn total(&self) -> u64 {
        self.age_0_5
            .saturating_add(self.age_5_17)
            .saturating_add(self.age_17_plus)
    }
}

/// A record as read back from the store, with its surrogate id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: Uuid,
    #[serde(flatten)]
    pub record: EnrolmentRecord,
}

impl StoredRecord {
    /// Assigns a fresh surrogate id.
    pub fn assign(record: EnrolmentRecord) -> Self {
        Self {
            id: Uuid::new_v4(),
            record,
        }
    }
}

/// Store-side filter on the geographic dimensions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub state: Option<String>,
    pub district: Option<String>,
}

impl RecordFilter {
    /// Matches every record.
    pub fn all() -> Self {
        Self::default()
    }

    /// Empty strings are treated as "no filter".
    pub fn by_state(state: Option<&str>) -> Self {
        Self {
            state: non_empty(state),
            district: None,
        }
    }

    pub fn by_district(district: Option<&str>) -> Self {
        Self {
            state: None,
            district: non_empty(district),
        }
    }

    pub fn matches(&self, record: &EnrolmentRecord) -> bool {
        self.state.as_deref().map_or(true, |s| record.state == s)
            && self.district.as_deref().map_or(true, |d| record.district == d)
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_none() && self.district.is_none()
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}
