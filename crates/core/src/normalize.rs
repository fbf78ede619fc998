//! Header dialect normalization.
//!
//! Registry exports have changed column names over time. Every known
//! spelling is listed in [`DIALECT_TABLE`]; a table may mix spellings from
//! several dialects and each column is mapped on its own.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::record::CanonicalField;
use crate::table::RawTable;

/// A historical header-naming convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// Title-case exports: `Date`, `Demo_age_17+`, ...
    Legacy,
    /// Lower-case exports: `date`, `age_18_greater`, ...
    Modern,
    /// Exports with a mangled trailing underscore: `demo_age_17_`
    AlternateSuffix,
}

/// Ordered alias table: incoming header (trimmed, case-sensitive) to canonical field.
pub const DIALECT_TABLE: &[(&str, CanonicalField, Dialect)] = &[
    ("Date", CanonicalField::Date, Dialect::Legacy),
    ("State", CanonicalField::State, Dialect::Legacy),
    ("District", CanonicalField::District, Dialect::Legacy),
    ("Pincode", CanonicalField::Pincode, Dialect::Legacy),
    ("Demo_age_5_17", CanonicalField::Age5To17, Dialect::Legacy),
    ("Demo_age_17+", CanonicalField::Age17Plus, Dialect::Legacy),
    ("date", CanonicalField::Date, Dialect::Modern),
    ("state", CanonicalField::State, Dialect::Modern),
    ("district", CanonicalField::District, Dialect::Modern),
    ("pincode", CanonicalField::Pincode, Dialect::Modern),
    ("age_0_5", CanonicalField::Age0To5, Dialect::Modern),
    ("age_5_17", CanonicalField::Age5To17, Dialect::Modern),
    ("age_18_greater", CanonicalField::Age17Plus, Dialect::Modern),
    ("demo_age_17_", CanonicalField::Age17Plus, Dialect::AlternateSuffix),
];

/// Cell spellings read as null.
const NULL_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None", "#N/A", "<NA>",
];

/// Returns true if a raw cell should be read as null.
pub fn is_null_token(cell: &str) -> bool {
    NULL_TOKENS.contains(&cell.trim())
}

/// Looks up the canonical field for an incoming header.
pub fn canonical_for(header: &str) -> Option<(CanonicalField, Dialect)> {
    let header = header.trim();
    DIALECT_TABLE
        .iter()
        .find(|(alias, _, _)| *alias == header)
        .map(|(_, field, dialect)| (*field, *dialect))
}

/// Where a single input column lands.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ColumnTarget {
    Canonical(CanonicalField),
    Passthrough(String),
}

/// A row keyed by canonical field names. Values are untyped text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedRow {
    fields: BTreeMap<CanonicalField, Option<String>>,
    passthrough: BTreeMap<String, Option<String>>,
}

impl NormalizedRow {
    /// Builds a row directly from canonical values (absent keys stay absent).
    pub fn from_fields<I, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (CanonicalField, Option<V>)>,
        V: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(|(f, v)| (f, v.map(Into::into))).collect(),
            passthrough: BTreeMap::new(),
        }
    }

    /// Non-null value of a canonical field.
    pub fn get(&self, field: CanonicalField) -> Option<&str> {
        self.fields.get(&field).and_then(|v| v.as_deref())
    }

    /// Whether the field exists in this row at all (null or not).
    pub fn has(&self, field: CanonicalField) -> bool {
        self.fields.contains_key(&field)
    }

    /// Canonical field names present in this row.
    pub fn field_names(&self) -> BTreeSet<CanonicalField> {
        self.fields.keys().copied().collect()
    }

    /// Unrecognized columns, carried along unmapped.
    pub fn passthrough(&self) -> &BTreeMap<String, Option<String>> {
        &self.passthrough
    }

    fn put(&mut self, target: &ColumnTarget, value: Option<String>) {
        match target {
            ColumnTarget::Canonical(field) => {
                let slot = self.fields.entry(*field).or_insert(None);
                if slot.is_none() {
                    *slot = value;
                }
            }
            ColumnTarget::Passthrough(name) => {
                self.passthrough.entry(name.clone()).or_insert(value);
            }
        }
    }
}

/// Normalizer output.
#[derive(Debug, Clone, Default)]
pub struct NormalizedTable {
    pub rows: Vec<NormalizedRow>,
    /// Dialects seen in the header row.
    pub dialects: BTreeSet<Dialect>,
    /// Headers with no canonical mapping.
    pub unmapped: Vec<String>,
}

/// Rewrites a decoded table onto canonical field names.
///
/// Age buckets missing from the header set are synthesized as `"0"` for
/// every row. Null-token cells become `None`.
pub fn normalize(table: &RawTable) -> NormalizedTable {
    let mut dialects = BTreeSet::new();
    let mut unmapped = Vec::new();

    let plan: Vec<ColumnTarget> = table
        .headers
        .iter()
        .map(|header| match canonical_for(header) {
            Some((field, dialect)) => {
                dialects.insert(dialect);
                ColumnTarget::Canonical(field)
            }
            None => {
                let name = header.trim().to_string();
                unmapped.push(name.clone());
                ColumnTarget::Passthrough(name)
            }
        })
        .collect();

    let missing_buckets: Vec<CanonicalField> = CanonicalField::AGE_BUCKETS
        .into_iter()
        .filter(|bucket| !plan.contains(&ColumnTarget::Canonical(*bucket)))
        .collect();

    let rows = table
        .rows
        .iter()
        .map(|cells| {
            let mut row = NormalizedRow::default();
            for (target, cell) in plan.iter().zip(cells) {
                let value = cell.as_deref().filter(|c| !is_null_token(c)).map(str::to_string);
                row.put(target, value);
            }
            for bucket in &missing_buckets {
                row.fields.insert(*bucket, Some("0".to_string()));
            }
            row
        })
        .collect();

    NormalizedTable {
        rows,
        dialects,
        unmapped,
    }
}
