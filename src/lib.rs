//! # forecast-studio
//!
//! Forecast a monthly time series from a CSV upload.
//!
//! A session reads one table, parses the chosen date column (falling back to
//! an auto-cleaning pass when parsing fails), reduces it to one value
//! column, fits ARIMA or seasonal ARIMA on the whole history, and presents
//! the forecast as SVG charts and a rounded table.
//!
//! ```
//! use forecast_studio::prelude::*;
//!
//! let csv = "Month,Sales\n2020-01,10\n2020-02,12\n2020-03,13\n2020-04,15\n\
//!            2020-05,16\n2020-06,18\n2020-07,19\n2020-08,21\n";
//! let session = Session::from_reader(csv.as_bytes()).unwrap();
//! let prepared = session.prepare("Month", "Sales").unwrap();
//!
//! let config = ModelConfig::arima(ARIMASpec::new(0, 1, 0), 3);
//! let run = run_forecast(&prepared.series, &config, None).unwrap();
//! assert_eq!(run.table().len(), 3);
//! ```

#![allow(clippy::upper_case_acronyms)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::needless_range_loop)]

pub mod config;
pub mod core;
pub mod data;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod present;
pub mod utils;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::config::{ModelConfig, ModelFamily, SessionRequest};
    pub use crate::core::{DatedForecast, Forecast, TimeSeries};
    pub use crate::error::{ForecastError, Result};
    pub use crate::models::{ARIMASpec, Forecaster, SARIMASpec, ARIMA, SARIMA};
    pub use crate::pipeline::{run_forecast, ForecastRun, PreparedSeries, Session};
}
