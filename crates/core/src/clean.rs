//! Row validation and cleaning.
//!
//! Converts normalized rows into typed [`EnrolmentRecord`]s. Rows that cannot
//! be made valid are dropped; only the surviving count is visible to callers.
//!
//! Policy for age counts: missing or null is 0, integral values (including
//! `12.0`) up to [`MAX_BUCKET_COUNT`] are accepted, anything else drops
//! the row.

use crate::dates::parse_date;
use crate::limits::MAX_BUCKET_COUNT;
use crate::normalize::NormalizedRow;
use crate::record::{CanonicalField, EnrolmentRecord};

/// Why a row was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowDefect {
    MissingField(CanonicalField),
    NonNumeric(CanonicalField),
    NegativeCount(CanonicalField),
    CountTooLarge(CanonicalField),
    InvalidDate,
}

impl std::fmt::Display for RowDefect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "missing {}", field),
            Self::NonNumeric(field) => write!(f, "non-numeric {}", field),
            Self::NegativeCount(field) => write!(f, "negative {}", field),
            Self::CountTooLarge(field) => write!(f, "oversized {}", field),
            Self::InvalidDate => f.write_str("unparseable date"),
        }
    }
}

/// Outcome of cleaning a batch of rows.
#[derive(Debug, Clone, Default)]
pub struct CleanedBatch {
    pub records: Vec<EnrolmentRecord>,
    /// Input row count before cleaning.
    pub total_rows: usize,
}

impl CleanedBatch {
    /// Rows that did not survive cleaning.
    pub fn discarded(&self) -> usize {
        self.total_rows - self.records.len()
    }
}

/// Cleans one row.
pub fn clean_row(row: &NormalizedRow) -> Result<EnrolmentRecord, RowDefect> {
    for field in CanonicalField::REQUIRED {
        if row.get(field).is_none() {
            return Err(RowDefect::MissingField(field));
        }
    }

    let age_0_5 = parse_count(row, CanonicalField::Age0To5)?;
    let age_5_17 = parse_count(row, CanonicalField::Age5To17)?;
    let age_17_plus = parse_count(row, CanonicalField::Age17Plus)?;

    let date = row
        .get(CanonicalField::Date)
        .and_then(parse_date)
        .ok_or(RowDefect::InvalidDate)?;

    Ok(EnrolmentRecord {
        date,
        state: required(row, CanonicalField::State)?,
        district: required(row, CanonicalField::District)?,
        pincode: row.get(CanonicalField::Pincode).map(str::to_string),
        age_0_5,
        age_5_17,
        age_17_plus,
    })
}

/// Cleans every row, keeping the survivors in input order.
pub fn clean_rows<'a, I>(rows: I) -> CleanedBatch
where
    I: IntoIterator<Item = &'a NormalizedRow>,
{
    let mut batch = CleanedBatch::default();

    for (i, row) in rows.into_iter().enumerate() {
        batch.total_rows += 1;
        match clean_row(row) {
            Ok(record) => batch.records.push(record),
            Err(defect) => tracing::trace!(row = i, defect = %defect, "Dropped row"),
        }
    }

    batch
}

fn required(row: &NormalizedRow, field: CanonicalField) -> Result<String, RowDefect> {
    row.get(field)
        .map(str::to_string)
        .ok_or(RowDefect::MissingField(field))
}

fn parse_count(row: &NormalizedRow, field: CanonicalField) -> Result<u64, RowDefect> {
    let Some(raw) = row.get(field) else {
        return Ok(0);
    };
    let raw = raw.trim();

    let value = if let Ok(value) = raw.parse::<i128>() {
        value
    } else {
        let value: f64 = raw.parse().map_err(|_| RowDefect::NonNumeric(field))?;
        if !value.is_finite() || value.fract() != 0.0 {
            return Err(RowDefect::NonNumeric(field));
        }
        if value > MAX_BUCKET_COUNT as f64 {
            return Err(RowDefect::CountTooLarge(field));
        }
        value as i128
    };

    if value < 0 {
        return Err(RowDefect::NegativeCount(field));
    }
    u64::try_from(value)
        .ok()
        .filter(|v| *v <= MAX_BUCKET_COUNT)
        .ok_or(RowDefect::CountTooLarge(field))
}
