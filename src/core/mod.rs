//! Core data structures for time series forecasting.

pub mod calendar;
mod forecast;
mod time_series;

pub use calendar::{add_months, month_offsets};
pub use forecast::{DatedForecast, Forecast};
pub use time_series::TimeSeries;
