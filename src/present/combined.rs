//! Historical values and forecast laid out on one timestamp index.

use crate::core::{DatedForecast, TimeSeries};
use crate::error::Result;
use crate::present::table::format_timestamp;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombinedRow {
    pub timestamp: NaiveDateTime,
    pub actual: Option<f64>,
    pub forecast: Option<f64>,
}

#[derive(Serialize)]
struct CsvRow {
    timestamp: String,
    actual: Option<f64>,
    forecast: Option<f64>,
}

/// History rows (actual only) followed by forecast rows (forecast only).
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedView {
    rows: Vec<CombinedRow>,
    history_len: usize,
}

impl CombinedView {
    pub fn new(history: &TimeSeries, forecast: &DatedForecast) -> Self {
        let mut rows = Vec::with_capacity(history.len() + forecast.horizon());
        rows.extend(history.iter().map(|(timestamp, value)| CombinedRow {
            timestamp,
            actual: Some(value),
            forecast: None,
        }));
        rows.extend(forecast.iter().map(|(timestamp, value)| CombinedRow {
            timestamp,
            actual: None,
            forecast: Some(value),
        }));
        Self {
            rows,
            history_len: history.len(),
        }
    }

    pub fn rows(&self) -> &[CombinedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn history(&self) -> &[CombinedRow] {
        &self.rows[..self.history_len]
    }

    pub fn forecast(&self) -> &[CombinedRow] {
        &self.rows[self.history_len..]
    }

    /// Write `timestamp,actual,forecast` rows; absent values are empty cells.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut out = csv::Writer::from_writer(writer);
        for row in &self.rows {
            out.serialize(CsvRow {
                timestamp: format_timestamp(row.timestamp),
                actual: row.actual,
                forecast: row.forecast,
            })?;
        }
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Forecast;
    use chrono::NaiveDate;

    fn month(m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, m, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn view() -> CombinedView {
        let history =
            TimeSeries::new(vec![month(1), month(2), month(3)], vec![1.0, 2.0, 3.0], "sales")
                .unwrap();
        let forecast =
            DatedForecast::monthly_after(month(3), Forecast::from_values(vec![3.5, 4.25])).unwrap();
        CombinedView::new(&history, &forecast)
    }

    #[test]
    fn actual_and_forecast_are_exclusive() {
        let view = view();
        assert_eq!(view.len(), 5);
        assert_eq!(view.history().len(), 3);
        assert_eq!(view.forecast().len(), 2);
        for row in view.rows() {
            assert!(row.actual.is_some() != row.forecast.is_some());
        }
        assert_eq!(view.forecast()[0].timestamp, month(4));
        assert_eq!(view.forecast()[1].forecast, Some(4.25));
    }

    #[test]
    fn csv_leaves_missing_side_empty() {
        let mut buf = Vec::new();
        view().write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "timestamp,actual,forecast");
        assert_eq!(lines[1], "2020-01-01,1.0,");
        assert_eq!(lines[4], "2020-04-01,,3.5");
        assert_eq!(lines.len(), 6);
    }
}
