//! Forecast table shown under the combined chart.

use crate::core::DatedForecast;
use chrono::{NaiveDateTime, NaiveTime};
use serde::Serialize;
use std::fmt;

/// Decimal places shown in the forecast table.
pub const TABLE_DECIMALS: i32 = 2;

/// Round `x` to `decimals` places, ties to even.
pub fn round_to(x: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    let rounded = (x * scale).round_ties_even() / scale;
    if rounded.is_finite() {
        rounded
    } else {
        x
    }
}

/// Date-only at midnight, full timestamp otherwise.
pub fn format_timestamp(ts: NaiveDateTime) -> String {
    if ts.time() == NaiveTime::MIN {
        ts.format("%Y-%m-%d").to_string()
    } else {
        ts.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastRow {
    pub timestamp: String,
    pub forecast: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper: Option<f64>,
}

/// One row per forecast step, values rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastTable {
    rows: Vec<ForecastRow>,
}

impl ForecastTable {
    pub fn from_forecast(dated: &DatedForecast) -> Self {
        let forecast = dated.forecast();
        let rows = dated
            .iter()
            .enumerate()
            .map(|(i, (ts, value))| ForecastRow {
                timestamp: format_timestamp(ts),
                forecast: round_to(value, TABLE_DECIMALS),
                lower: forecast.lower().map(|l| round_to(l[i], TABLE_DECIMALS)),
                upper: forecast.upper().map(|u| round_to(u[i], TABLE_DECIMALS)),
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[ForecastRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_intervals(&self) -> bool {
        self.rows.first().is_some_and(|r| r.lower.is_some())
    }
}

impl fmt::Display for ForecastTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .rows
            .iter()
            .map(|r| r.timestamp.len())
            .max()
            .unwrap_or(0)
            .max("timestamp".len());

        write!(f, "{:<width$}  {:>12}", "timestamp", "forecast")?;
        if self.has_intervals() {
            write!(f, "  {:>12}  {:>12}", "lower", "upper")?;
        }
        writeln!(f)?;

        for row in &self.rows {
            write!(f, "{:<width$}  {:>12.2}", row.timestamp, row.forecast)?;
            if let (Some(lower), Some(upper)) = (row.lower, row.upper) {
                write!(f, "  {lower:>12.2}  {upper:>12.2}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Forecast;
    use chrono::NaiveDate;

    fn jan(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 1, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn rounds_half_to_even() {
        assert_eq!(round_to(0.125, 2), 0.12);
        assert_eq!(round_to(0.375, 2), 0.38);
        assert_eq!(round_to(2.5, 0), 2.0);
        assert_eq!(round_to(-1.005, 2), -1.0);
        assert_eq!(round_to(123.456789, 2), 123.46);
    }

    #[test]
    fn timestamps_drop_midnight_time() {
        assert_eq!(format_timestamp(jan(31)), "2021-01-31");
        let noon = NaiveDate::from_ymd_opt(2021, 1, 31)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap();
        assert_eq!(format_timestamp(noon), "2021-01-31 12:30:00");
    }

    #[test]
    fn table_rows_follow_forecast() {
        let dated =
            DatedForecast::monthly_after(jan(31), Forecast::from_values(vec![10.004, 11.5, 12.999]))
                .unwrap();
        let table = ForecastTable::from_forecast(&dated);

        let stamps: Vec<&str> = table.rows().iter().map(|r| r.timestamp.as_str()).collect();
        assert_eq!(stamps, vec!["2021-02-28", "2021-03-31", "2021-04-30"]);
        let values: Vec<f64> = table.rows().iter().map(|r| r.forecast).collect();
        assert_eq!(values, vec![10.0, 11.5, 13.0]);
        assert!(!table.has_intervals());
    }

    #[test]
    fn json_omits_absent_intervals() {
        let dated =
            DatedForecast::monthly_after(jan(1), Forecast::from_values(vec![1.0])).unwrap();
        let json = serde_json::to_string(&ForecastTable::from_forecast(&dated)).unwrap();
        assert_eq!(json, r#"{"rows":[{"timestamp":"2021-02-01","forecast":1.0}]}"#);
    }

    #[test]
    fn display_includes_interval_columns() {
        let forecast =
            Forecast::from_values_with_intervals(vec![5.0, 6.0], vec![4.0, 4.5], vec![6.0, 7.5])
                .unwrap();
        let dated = DatedForecast::monthly_after(jan(1), forecast).unwrap();
        let text = ForecastTable::from_forecast(&dated).to_string();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("lower") && lines[0].contains("upper"));
        assert!(lines[1].starts_with("2021-02-01"));
        assert!(lines[2].ends_with("7.50"));
    }
}
