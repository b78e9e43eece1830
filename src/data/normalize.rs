//! Temporal normalization and reduction of a raw table to a time series.
//!
//! The date column is parsed strictly first. A single unparseable cell
//! switches to the auto-cleaning path: header names are trimmed, the column
//! is parsed again with bad cells turned into nulls, and the null rows are
//! removed. That path is the only recovered failure in the pipeline and
//! always leaves a [`Notice`] behind.

use crate::core::TimeSeries;
use crate::data::datetime::parse_timestamp;
use crate::data::table::{is_missing, RawTable};
use crate::error::{ForecastError, Result};
use chrono::NaiveDateTime;
use std::fmt;

/// User-facing message produced while cleaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Strict date parsing failed and the auto-cleaning path ran.
    DateParseFallback {
        /// First cell that failed to parse.
        first_bad_value: String,
        /// Rows removed because their date could not be parsed.
        dropped_rows: usize,
    },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::DateParseFallback { .. } => {
                write!(f, "Parsing failed, applying auto-cleaning.")
            }
        }
    }
}

/// A raw table whose date column has been parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTable {
    table: RawTable,
    date_index: usize,
    dates: Vec<Option<NaiveDateTime>>,
    /// Position of each kept row in the uploaded table.
    source_rows: Vec<usize>,
    notices: Vec<Notice>,
}

impl NormalizedTable {
    pub fn table(&self) -> &RawTable {
        &self.table
    }

    /// Parsed dates, one per table row. `None` marks an empty date cell.
    pub fn dates(&self) -> &[Option<NaiveDateTime>] {
        &self.dates
    }

    /// Data-row index in the uploaded table for each kept row.
    pub fn source_rows(&self) -> &[usize] {
        &self.source_rows
    }

    /// Name of the date column after any header cleanup.
    pub fn date_column(&self) -> &str {
        &self.table.headers()[self.date_index]
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Whether the auto-cleaning path ran.
    pub fn used_fallback(&self) -> bool {
        self.notices
            .iter()
            .any(|n| matches!(n, Notice::DateParseFallback { .. }))
    }
}

/// Parse `date_column` of `table` into timestamps.
pub fn normalize_dates(table: RawTable, date_column: &str) -> Result<NormalizedTable> {
    let date_index = table.column_index(date_column)?;

    match parse_strict(&table, date_index)? {
        Ok(dates) => {
            tracing::debug!(column = date_column, rows = dates.len(), "parsed date column");
            let source_rows = (0..table.len()).collect();
            Ok(NormalizedTable {
                table,
                date_index,
                dates,
                source_rows,
                notices: Vec::new(),
            })
        }
        Err(first_bad_value) => clean_dates(table, date_column, first_bad_value),
    }
}

/// Strict pass. The inner `Err` carries the first cell that failed.
fn parse_strict(
    table: &RawTable,
    date_index: usize,
) -> Result<std::result::Result<Vec<Option<NaiveDateTime>>, String>> {
    let mut dates = Vec::with_capacity(table.len());
    for cell in table.column(date_index)? {
        if is_missing(cell) {
            dates.push(None);
            continue;
        }
        match parse_timestamp(cell) {
            Some(ts) => dates.push(Some(ts)),
            None => return Ok(Err(cell.to_string())),
        }
    }
    Ok(Ok(dates))
}

fn clean_dates(
    mut table: RawTable,
    date_column: &str,
    first_bad_value: String,
) -> Result<NormalizedTable> {
    table.strip_headers();
    let date_index = table.column_index(date_column.trim())?;

    let parsed: Vec<Option<NaiveDateTime>> = table
        .column(date_index)?
        .map(parse_timestamp)
        .collect();
    let keep: Vec<bool> = parsed.iter().map(Option::is_some).collect();
    let dropped_rows = keep.iter().filter(|k| !**k).count();

    table.retain_rows(&keep);
    let source_rows: Vec<usize> = keep
        .iter()
        .enumerate()
        .filter_map(|(row, kept)| kept.then_some(row))
        .collect();
    let dates: Vec<Option<NaiveDateTime>> = parsed.into_iter().filter(Option::is_some).collect();

    let notice = Notice::DateParseFallback {
        first_bad_value,
        dropped_rows,
    };
    tracing::warn!(
        column = date_column,
        dropped_rows,
        remaining = dates.len(),
        "{notice}"
    );

    Ok(NormalizedTable {
        table,
        date_index,
        dates,
        source_rows,
        notices: vec![notice],
    })
}

/// Parse a value cell. `Ok(None)` means the cell is a missing marker.
///
/// `row` is the 0-based data-row index in the uploaded table, used only for
/// the error.
pub fn parse_value(row: usize, cell: &str) -> Result<Option<f64>> {
    if is_missing(cell) {
        return Ok(None);
    }
    match cell.trim().parse::<f64>() {
        Ok(v) if v.is_nan() => Ok(None),
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(ForecastError::NonNumericValue {
            row,
            value: cell.to_string(),
        }),
    }
}

/// Index the table by its dates, keep only `value_column`, drop missing rows.
///
/// Row order is preserved. A non-increasing index is reported through the
/// log and returned unchanged.
pub fn into_series(normalized: &NormalizedTable, value_column: &str) -> Result<TimeSeries> {
    let table = normalized.table();
    let value_index = match table.column_index(value_column) {
        Ok(idx) => idx,
        Err(err) if normalized.used_fallback() => table
            .column_index(value_column.trim())
            .map_err(|_| err)?,
        Err(err) => return Err(err),
    };

    let mut timestamps = Vec::with_capacity(table.len());
    let mut values = Vec::with_capacity(table.len());
    let mut dropped = 0usize;

    for ((date, cell), &row) in normalized
        .dates()
        .iter()
        .zip(table.column(value_index)?)
        .zip(normalized.source_rows())
    {
        match (date, parse_value(row, cell)?) {
            (Some(ts), Some(v)) => {
                timestamps.push(*ts);
                values.push(v);
            }
            _ => dropped += 1,
        }
    }

    let series = TimeSeries::new(timestamps, values, table.headers()[value_index].clone())?;
    tracing::debug!(
        value_column,
        rows = series.len(),
        dropped,
        "reduced table to series"
    );
    if !series.is_strictly_increasing() {
        tracing::warn!(
            duplicates = series.duplicate_timestamps(),
            "date index is not strictly increasing; keeping input order"
        );
    }
    Ok(series)
}
