//! ARIMA and SARIMA (Autoregressive Integrated Moving Average) models.
//!
//! This module provides:
//! - ARIMA models with (p, d, q) specifications
//! - SARIMA models with multiplicative seasonal components (P, D, Q)\[s\]
//! - Differencing helpers shared by both

mod arma;
mod diff;
mod model;

pub use diff::{difference, differencing_polynomial, seasonal_difference, undifference};
pub use model::{ARIMASpec, SARIMASpec, ARIMA, SARIMA};
