//! Delimited table decoding.
//!
//! Turns raw upload/registry bytes into a header row plus string cells.
//! Any failure here rejects the whole input.

use csv::{ReaderBuilder, StringRecord};

use crate::error::{Error, Result};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// A decoded table: one header row and untyped cells.
///
/// Rows shorter than the header are padded with `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    /// Decodes CSV bytes with a header row.
    pub fn from_csv(bytes: &[u8]) -> Result<Self> {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        let text = std::str::from_utf8(bytes)
            .map_err(|e| Error::malformed(format!("input is not valid UTF-8: {}", e)))?;

        if text.trim().is_empty() {
            return Err(Error::malformed("no columns to parse from input"));
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| Error::malformed(format!("invalid header row: {}", e)))?
            .iter()
            .map(str::to_string)
            .collect();

        let width = headers.len();
        let mut rows = Vec::new();

        for (i, record) in reader.records().enumerate() {
            let record =
                record.map_err(|e| Error::malformed(format!("row {}: {}", i + 1, e)))?;
            rows.push(widen(&record, width, i + 1)?);
        }

        Ok(Self { headers, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn widen(record: &StringRecord, width: usize, line: usize) -> Result<Vec<Option<String>>> {
    if record.len() > width {
        return Err(Error::malformed(format!(
            "row {}: expected {} fields, saw {}",
            line,
            width,
            record.len()
        )));
    }

    let mut cells: Vec<Option<String>> = record.iter().map(|c| Some(c.to_string())).collect();
    cells.resize(width, None);
    Ok(cells)
}
