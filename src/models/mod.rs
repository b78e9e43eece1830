//! Forecasting models.

mod traits;

pub mod arima;

pub use arima::{ARIMASpec, SARIMASpec, ARIMA, SARIMA};
pub use traits::{BoxedForecaster, Forecaster};
