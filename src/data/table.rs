//! Raw tabular input as parsed from an uploaded CSV file.

use crate::error::{ForecastError, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Cell spellings treated as missing values, following the pandas defaults.
const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "NaT", "None", "n/a", "nan", "null",
];

/// True when `cell` denotes a missing value.
pub fn is_missing(cell: &str) -> bool {
    MISSING_MARKERS.contains(&cell.trim())
}

/// Header names plus string cells, exactly as read from the CSV text.
///
/// Cells are not trimmed or typed here; the cleaning step decides how to
/// interpret them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Build a table from headers and rows. Short rows are padded with empty
    /// cells; rows longer than the header are rejected.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        if headers.is_empty() {
            return Err(ForecastError::EmptyData);
        }
        let width = headers.len();
        let mut padded = Vec::with_capacity(rows.len());
        for (i, mut row) in rows.into_iter().enumerate() {
            if row.len() > width {
                return Err(ForecastError::Csv(format!(
                    "row {i} has {} fields, expected {width}",
                    row.len()
                )));
            }
            row.resize(width, String::new());
            padded.push(row);
        }
        Ok(Self {
            headers,
            rows: padded,
        })
    }

    /// Parse CSV text with a header row.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::None)
            .from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(ForecastError::EmptyData);
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        tracing::debug!(columns = headers.len(), rows = rows.len(), "parsed csv table");
        Self::new(headers, rows)
    }

    /// Open and parse a CSV file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the first column named exactly `name`.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ForecastError::ColumnNotFound(name.to_string()))
    }

    /// Cells of column `index`, top to bottom.
    pub fn column(&self, index: usize) -> Result<impl Iterator<Item = &str> + '_> {
        if index >= self.headers.len() {
            return Err(ForecastError::IndexOutOfBounds {
                index,
                size: self.headers.len(),
            });
        }
        Ok(self.rows.iter().map(move |row| row[index].as_str()))
    }

    /// Remove leading and trailing whitespace from every header name.
    pub fn strip_headers(&mut self) {
        for header in &mut self.headers {
            let trimmed = header.trim();
            if trimmed.len() != header.len() {
                *header = trimmed.to_string();
            }
        }
    }

    /// Keep only rows whose flag in `keep` is true.
    pub(crate) fn retain_rows(&mut self, keep: &[bool]) {
        let mut flags = keep.iter().copied();
        self.rows.retain(|_| flags.next().unwrap_or(false));
    }

    /// The first `n` rows as a new table.
    pub fn head(&self, n: usize) -> RawTable {
        RawTable {
            headers: self.headers.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }
}
