//! One forecasting session: load, clean, fit, forecast, present.
//!
//! Nothing here is cached. Each call builds its values from its inputs, so
//! repeating a session with the same inputs repeats the whole computation.

use crate::config::ModelConfig;
use crate::core::{DatedForecast, TimeSeries};
use crate::data::{into_series, normalize_dates, Notice, RawTable};
use crate::error::{ForecastError, Result};
use crate::present::{CombinedView, DataPreview, ForecastTable};
use std::io::Read;
use std::path::Path;

/// An uploaded table waiting for column selection.
#[derive(Debug, Clone)]
pub struct Session {
    table: RawTable,
}

/// The cleaned series plus anything the user should be told about it.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSeries {
    pub series: TimeSeries,
    pub notices: Vec<Notice>,
}

impl Session {
    pub fn new(table: RawTable) -> Self {
        Self { table }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        RawTable::from_reader(reader).map(Self::new)
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading table");
        RawTable::from_path(path).map(Self::new)
    }

    pub fn table(&self) -> &RawTable {
        &self.table
    }

    pub fn columns(&self) -> &[String] {
        self.table.headers()
    }

    pub fn preview(&self, rows: usize) -> DataPreview {
        DataPreview::new(&self.table, rows)
    }

    /// Parse the date column and reduce the table to the value column.
    pub fn prepare(&self, date_column: &str, value_column: &str) -> Result<PreparedSeries> {
        let normalized = normalize_dates(self.table.clone(), date_column)?;
        let series = into_series(&normalized, value_column)?;
        Ok(PreparedSeries {
            series,
            notices: normalized.notices().to_vec(),
        })
    }
}

/// A fitted model's forecast together with the history it was fitted on.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRun {
    pub history: TimeSeries,
    pub forecast: DatedForecast,
    /// Model family and orders, e.g. `SARIMAX(1,1,1)x(1,1,1)[12]`.
    pub model_label: String,
}

impl ForecastRun {
    pub fn combined(&self) -> CombinedView {
        CombinedView::new(&self.history, &self.forecast)
    }

    pub fn table(&self) -> ForecastTable {
        ForecastTable::from_forecast(&self.forecast)
    }
}

/// Fit `config` on the whole of `series` and forecast `config.horizon()`
/// months past its last timestamp.
///
/// With `interval_level` set, lower and upper bounds are attached too.
pub fn run_forecast(
    series: &TimeSeries,
    config: &ModelConfig,
    interval_level: Option<f64>,
) -> Result<ForecastRun> {
    config.validate()?;
    let last = series
        .last_timestamp()
        .ok_or(ForecastError::InsufficientData { needed: 1, got: 0 })?;

    let mut model = config.build();
    let model_label = model.describe();
    tracing::debug!(model = %model_label, observations = series.len(), "fitting model");
    model.fit(series)?;

    let horizon = config.horizon();
    let forecast = match interval_level {
        Some(level) => model.predict_with_intervals(horizon, level)?,
        None => model.predict(horizon)?,
    };
    let forecast = DatedForecast::monthly_after(last, forecast)?;
    tracing::debug!(model = %model_label, horizon, "forecast generated");

    Ok(ForecastRun {
        history: series.clone(),
        forecast,
        model_label,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::arima::{ARIMASpec, SARIMASpec};

    fn monthly_csv(n: usize) -> String {
        let mut csv = String::from("Month,Sales\n");
        for i in 0..n {
            let value = 200.0 + 2.0 * i as f64 + [0.0, 5.0, 12.0, 7.0][i % 4];
            csv.push_str(&format!("{}-{:02},{value}\n", 2015 + i / 12, i % 12 + 1));
        }
        csv
    }

    #[test]
    fn session_columns_and_preview() {
        let session = Session::from_reader(monthly_csv(10).as_bytes()).unwrap();
        assert_eq!(session.columns(), &["Month", "Sales"]);
        assert_eq!(session.preview(5).table().len(), 5);
    }

    #[test]
    fn prepare_then_forecast_arima() {
        let session = Session::from_reader(monthly_csv(48).as_bytes()).unwrap();
        let prepared = session.prepare("Month", "Sales").unwrap();
        assert!(prepared.notices.is_empty());
        assert_eq!(prepared.series.len(), 48);

        let config = ModelConfig::arima(ARIMASpec::new(1, 1, 1), 6);
        let run = run_forecast(&prepared.series, &config, None).unwrap();
        assert_eq!(run.forecast.horizon(), 6);
        assert_eq!(run.model_label, "ARIMA(1,1,1)");
        assert_eq!(run.table().len(), 6);
        assert_eq!(run.combined().len(), 54);
    }

    #[test]
    fn sarimax_with_intervals() {
        let session = Session::from_reader(monthly_csv(60).as_bytes()).unwrap();
        let series = session.prepare("Month", "Sales").unwrap().series;
        let config =
            ModelConfig::sarimax(ARIMASpec::new(1, 0, 0), SARIMASpec::new(0, 1, 1, 4), 8);

        let run = run_forecast(&series, &config, Some(0.9)).unwrap();
        assert!(run.forecast.forecast().has_intervals());
        assert!(run.table().has_intervals());
    }

    #[test]
    fn invalid_config_is_rejected_before_fitting() {
        let session = Session::from_reader(monthly_csv(24).as_bytes()).unwrap();
        let series = session.prepare("Month", "Sales").unwrap().series;
        let config = ModelConfig::arima(ARIMASpec::default(), 40);
        assert!(matches!(
            run_forecast(&series, &config, None),
            Err(ForecastError::ParameterOutOfRange { name: "horizon", .. })
        ));
    }

    #[test]
    fn empty_series_is_insufficient() {
        let session = Session::from_reader("Month,Sales\nbad,1\n".as_bytes()).unwrap();
        let prepared = session.prepare("Month", "Sales").unwrap();
        assert!(prepared.series.is_empty());
        assert_eq!(prepared.notices.len(), 1);
        assert!(matches!(
            run_forecast(&prepared.series, &ModelConfig::default(), None),
            Err(ForecastError::InsufficientData { .. })
        ));
    }

    #[test]
    fn missing_column_is_reported() {
        let session = Session::from_reader(monthly_csv(5).as_bytes()).unwrap();
        assert_eq!(
            session.prepare("Date", "Sales"),
            Err(ForecastError::ColumnNotFound("Date".to_string()))
        );
    }
}
