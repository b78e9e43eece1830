//! Forecaster trait defining the common interface for the model families.

use crate::core::{Forecast, TimeSeries};
use crate::error::Result;

/// Common interface for forecasting models.
///
/// This trait is object-safe and can be used with `Box<dyn Forecaster>`.
pub trait Forecaster {
    /// Fit the model to the full history.
    fn fit(&mut self, series: &TimeSeries) -> Result<()>;

    /// Generate `horizon` dynamic point forecasts.
    fn predict(&self, horizon: usize) -> Result<Forecast>;

    /// Generate predictions with prediction intervals at `level`.
    fn predict_with_intervals(&self, horizon: usize, level: f64) -> Result<Forecast> {
        let _ = level;
        self.predict(horizon)
    }

    /// In-sample one-step predictions.
    fn fitted_values(&self) -> Option<&[f64]>;

    /// Residuals (actual - fitted).
    fn residuals(&self) -> Option<&[f64]>;

    /// Model family name.
    fn name(&self) -> &str;

    /// Family name together with its orders, e.g. `ARIMA(1,1,1)`.
    fn describe(&self) -> String {
        self.name().to_string()
    }

    fn is_fitted(&self) -> bool {
        self.fitted_values().is_some()
    }
}

/// Type alias for boxed forecaster trait objects.
///
/// # Example
///
/// ```
/// use forecast_studio::models::{BoxedForecaster, Forecaster};
/// use forecast_studio::models::arima::ARIMA;
///
/// let model: BoxedForecaster = Box::new(ARIMA::new(1, 1, 1));
/// assert_eq!(model.name(), "ARIMA");
/// ```
pub type BoxedForecaster = Box<dyn Forecaster>;
