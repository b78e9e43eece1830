//! TimeSeries data structure for a cleaned, timestamp-indexed column.

use crate::error::{ForecastError, Result};
use chrono::NaiveDateTime;

/// A univariate time series: one value per timestamp, in input order.
///
/// The index is not required to be sorted or unique. Rows keep the order
/// they had in the source table; callers that need a strictly increasing
/// index can check [`TimeSeries::is_strictly_increasing`].
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    timestamps: Vec<NaiveDateTime>,
    values: Vec<f64>,
    label: String,
}

impl TimeSeries {
    /// Create a labelled series from parallel timestamp and value vectors.
    pub fn new(
        timestamps: Vec<NaiveDateTime>,
        values: Vec<f64>,
        label: impl Into<String>,
    ) -> Result<Self> {
        if timestamps.len() != values.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: timestamps.len(),
                got: values.len(),
            });
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::InvalidParameter(
                "series values must be finite".to_string(),
            ));
        }
        Ok(Self {
            timestamps,
            values,
            label: label.into(),
        })
    }

    /// Create an unlabelled series.
    pub fn univariate(timestamps: Vec<NaiveDateTime>, values: Vec<f64>) -> Result<Self> {
        Self::new(timestamps, values, "value")
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Name of the source column the values came from.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Timestamp of the final row, which anchors forecast dates.
    pub fn last_timestamp(&self) -> Option<NaiveDateTime> {
        self.timestamps.last().copied()
    }

    /// Iterate over `(timestamp, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDateTime, f64)> + '_ {
        self.timestamps
            .iter()
            .copied()
            .zip(self.values.iter().copied())
    }

    /// True when every timestamp is later than the one before it.
    pub fn is_strictly_increasing(&self) -> bool {
        self.timestamps.windows(2).all(|w| w[0] < w[1])
    }

    /// Number of timestamps equal to their predecessor.
    pub fn duplicate_timestamps(&self) -> usize {
        self.timestamps.windows(2).filter(|w| w[0] == w[1]).count()
    }
}
