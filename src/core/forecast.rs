//! Forecast result structures.

use crate::core::calendar::month_offsets;
use crate::error::{ForecastError, Result};
use chrono::NaiveDateTime;

/// Point predictions for consecutive future steps, with optional intervals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forecast {
    point: Vec<f64>,
    lower: Option<Vec<f64>>,
    upper: Option<Vec<f64>>,
}

impl Forecast {
    /// Create an empty forecast.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a forecast from point predictions.
    pub fn from_values(values: Vec<f64>) -> Self {
        Self {
            point: values,
            lower: None,
            upper: None,
        }
    }

    /// Create a forecast with prediction intervals.
    pub fn from_values_with_intervals(
        values: Vec<f64>,
        lower: Vec<f64>,
        upper: Vec<f64>,
    ) -> Result<Self> {
        for bound in [&lower, &upper] {
            if bound.len() != values.len() {
                return Err(ForecastError::DimensionMismatch {
                    expected: values.len(),
                    got: bound.len(),
                });
            }
        }
        Ok(Self {
            point: values,
            lower: Some(lower),
            upper: Some(upper),
        })
    }

    /// Number of forecast steps.
    pub fn horizon(&self) -> usize {
        self.point.len()
    }

    pub fn is_empty(&self) -> bool {
        self.point.is_empty()
    }

    /// Point predictions.
    pub fn primary(&self) -> &[f64] {
        &self.point
    }

    pub fn has_intervals(&self) -> bool {
        self.lower.is_some() && self.upper.is_some()
    }

    pub fn lower(&self) -> Option<&[f64]> {
        self.lower.as_deref()
    }

    pub fn upper(&self) -> Option<&[f64]> {
        self.upper.as_deref()
    }
}

/// A forecast whose steps are pinned to calendar-month timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct DatedForecast {
    timestamps: Vec<NaiveDateTime>,
    forecast: Forecast,
}

impl DatedForecast {
    /// Attach `last + i months` timestamps to each step of `forecast`.
    pub fn monthly_after(last: NaiveDateTime, forecast: Forecast) -> Result<Self> {
        let timestamps = month_offsets(last, forecast.horizon())?;
        Ok(Self {
            timestamps,
            forecast,
        })
    }

    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    pub fn forecast(&self) -> &Forecast {
        &self.forecast
    }

    pub fn values(&self) -> &[f64] {
        self.forecast.primary()
    }

    pub fn horizon(&self) -> usize {
        self.forecast.horizon()
    }

    /// Iterate over `(timestamp, prediction)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDateTime, f64)> + '_ {
        self.timestamps
            .iter()
            .copied()
            .zip(self.forecast.primary().iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn forecast_from_values_reports_horizon() {
        let forecast = Forecast::from_values(vec![1.0, 2.0, 3.0, 4.0]);
        assert!(!forecast.is_empty());
        assert_eq!(forecast.horizon(), 4);
        assert!(!forecast.has_intervals());
        assert_eq!(forecast.lower(), None);
    }

    #[test]
    fn forecast_empty_state() {
        let forecast = Forecast::new();
        assert!(forecast.is_empty());
        assert_eq!(forecast.horizon(), 0);
    }

    #[test]
    fn forecast_intervals_must_match_length() {
        let ok = Forecast::from_values_with_intervals(
            vec![2.0, 3.0],
            vec![1.0, 2.0],
            vec![3.0, 4.0],
        )
        .unwrap();
        assert!(ok.has_intervals());
        assert_eq!(ok.upper().unwrap(), &[3.0, 4.0]);

        let err = Forecast::from_values_with_intervals(vec![2.0, 3.0], vec![1.0], vec![3.0, 4.0]);
        assert!(matches!(
            err,
            Err(ForecastError::DimensionMismatch {
                expected: 2,
                got: 1
            })
        ));
    }

    #[test]
    fn dated_forecast_uses_calendar_months() {
        let last = NaiveDate::from_ymd_opt(2021, 1, 31)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let dated =
            DatedForecast::monthly_after(last, Forecast::from_values(vec![1.0, 2.0, 3.0])).unwrap();
        let days: Vec<String> = dated
            .timestamps()
            .iter()
            .map(|t| t.format("%Y-%m-%d").to_string())
            .collect();
        assert_eq!(days, vec!["2021-02-28", "2021-03-31", "2021-04-30"]);
        assert_eq!(dated.iter().count(), 3);
    }
}
