//! ARIMA and seasonal ARIMA models.

use crate::core::{Forecast, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::models::arima::arma::{fit_arma, ArmaFit, ArmaOrders};
use crate::models::arima::diff::{
    difference, differencing_polynomial, seasonal_difference, undifference,
};
use crate::models::Forecaster;
use statrs::distribution::{ContinuousCDF, Normal};
use std::fmt;

/// Non-seasonal order `(p, d, q)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ARIMASpec {
    /// AR order (p)
    pub p: usize,
    /// Differencing order (d)
    pub d: usize,
    /// MA order (q)
    pub q: usize,
}

impl ARIMASpec {
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }
}

impl Default for ARIMASpec {
    fn default() -> Self {
        Self::new(1, 1, 1)
    }
}

impl fmt::Display for ARIMASpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.p, self.d, self.q)
    }
}

/// Seasonal order `(P, D, Q, s)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SARIMASpec {
    /// Seasonal AR order (P)
    pub p: usize,
    /// Seasonal differencing order (D)
    pub d: usize,
    /// Seasonal MA order (Q)
    pub q: usize,
    /// Season length (s)
    pub period: usize,
}

impl SARIMASpec {
    pub fn new(p: usize, d: usize, q: usize, period: usize) -> Self {
        Self { p, d, q, period }
    }
}

impl Default for SARIMASpec {
    fn default() -> Self {
        Self::new(1, 1, 1, 12)
    }
}

impl fmt::Display for SARIMASpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})[{}]", self.p, self.d, self.q, self.period)
    }
}

/// State shared by both model kinds once fitted.
#[derive(Debug, Clone)]
struct Fitted {
    history: Vec<f64>,
    differenced: Vec<f64>,
    delta: Vec<f64>,
    arma: ArmaFit,
}

/// Smallest series that leaves at least two usable observations.
fn min_observations(order: ARIMASpec, seasonal: SARIMASpec) -> usize {
    let s = seasonal.period;
    order.d + seasonal.d * s + (order.p + seasonal.p * s).max(order.q + seasonal.q * s) + 2
}

fn fit_model(
    series: &TimeSeries,
    order: ARIMASpec,
    seasonal: SARIMASpec,
    include_mean: bool,
) -> Result<Fitted> {
    let values = series.values();
    let needed = min_observations(order, seasonal);
    if values.len() < needed {
        return Err(ForecastError::InsufficientData {
            needed,
            got: values.len(),
        });
    }

    let differenced = seasonal_difference(
        &difference(values, order.d),
        seasonal.d,
        seasonal.period,
    );
    let orders = ArmaOrders {
        p: order.p,
        q: order.q,
        seasonal_p: seasonal.p,
        seasonal_q: seasonal.q,
        period: seasonal.period,
        include_mean,
    };
    let arma = fit_arma(&differenced, orders)?;
    if !arma.converged {
        tracing::warn!(
            order = %order,
            seasonal = %seasonal,
            "parameter estimation did not converge; using best estimate found"
        );
    }
    tracing::debug!(
        order = %order,
        seasonal = %seasonal,
        sigma2 = arma.sigma2,
        aic = ?arma.aic,
        "model fitted"
    );

    Ok(Fitted {
        history: values.to_vec(),
        differenced,
        delta: differencing_polynomial(order.d, seasonal.d, seasonal.period),
        arma,
    })
}

impl Fitted {
    fn predict(&self, horizon: usize) -> Forecast {
        let w = self.arma.forecast(&self.differenced, horizon);
        let levels = undifference(&w, &self.history, &self.delta);
        Forecast::from_values(levels)
    }

    fn predict_with_intervals(&self, horizon: usize, level: f64) -> Result<Forecast> {
        if !(level > 0.0 && level < 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "interval level must be in (0, 1), got {level}"
            )));
        }
        let point = self.predict(horizon);
        let z = Normal::new(0.0, 1.0)
            .map_err(|e| ForecastError::ComputationError(e.to_string()))?
            .inverse_cdf((1.0 + level) / 2.0);

        let psi = self.arma.psi_weights(&self.delta, horizon);
        let mut cumulative = 0.0;
        let mut lower = Vec::with_capacity(horizon);
        let mut upper = Vec::with_capacity(horizon);
        for (pred, weight) in point.primary().iter().zip(&psi) {
            cumulative += weight * weight;
            let se = (self.arma.sigma2 * cumulative).sqrt();
            lower.push(pred - z * se);
            upper.push(pred + z * se);
        }
        Forecast::from_values_with_intervals(point.primary().to_vec(), lower, upper)
    }
}

/// ARIMA(p, d, q) forecasting model.
///
/// A constant term is estimated only when `d == 0`; differenced models
/// forecast without drift.
#[derive(Debug, Clone)]
pub struct ARIMA {
    spec: ARIMASpec,
    fitted: Option<Fitted>,
}

impl ARIMA {
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self::from_spec(ARIMASpec::new(p, d, q))
    }

    pub fn from_spec(spec: ARIMASpec) -> Self {
        Self { spec, fitted: None }
    }

    pub fn spec(&self) -> ARIMASpec {
        self.spec
    }

    pub fn ar_coefficients(&self) -> &[f64] {
        self.fitted.as_ref().map(|f| f.arma.phi.as_slice()).unwrap_or(&[])
    }

    pub fn ma_coefficients(&self) -> &[f64] {
        self.fitted
            .as_ref()
            .map(|f| f.arma.theta.as_slice())
            .unwrap_or(&[])
    }

    /// Estimated constant (0 when none is fitted).
    pub fn intercept(&self) -> f64 {
        self.fitted.as_ref().map(|f| f.arma.mean).unwrap_or(0.0)
    }

    pub fn aic(&self) -> Option<f64> {
        self.fitted.as_ref().and_then(|f| f.arma.aic)
    }

    pub fn bic(&self) -> Option<f64> {
        self.fitted.as_ref().and_then(|f| f.arma.bic)
    }
}

impl Default for ARIMA {
    fn default() -> Self {
        Self::from_spec(ARIMASpec::default())
    }
}

impl Forecaster for ARIMA {
    fn fit(&mut self, series: &TimeSeries) -> Result<()> {
        let no_season = SARIMASpec::new(0, 0, 0, 0);
        self.fitted = Some(fit_model(series, self.spec, no_season, self.spec.d == 0)?);
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Forecast> {
        let fitted = self.fitted.as_ref().ok_or(ForecastError::FitRequired)?;
        Ok(fitted.predict(horizon))
    }

    fn predict_with_intervals(&self, horizon: usize, level: f64) -> Result<Forecast> {
        let fitted = self.fitted.as_ref().ok_or(ForecastError::FitRequired)?;
        fitted.predict_with_intervals(horizon, level)
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted.as_ref().map(|f| f.arma.fitted.as_slice())
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.fitted.as_ref().map(|f| f.arma.residuals.as_slice())
    }

    fn name(&self) -> &str {
        "ARIMA"
    }

    fn describe(&self) -> String {
        format!("ARIMA{}", self.spec)
    }
}

/// Seasonal ARIMA(p, d, q)(P, D, Q)\[s\] without exogenous regressors.
///
/// Seasonal and non-seasonal polynomials combine multiplicatively. No
/// constant term is estimated.
#[derive(Debug, Clone)]
pub struct SARIMA {
    spec: ARIMASpec,
    seasonal: SARIMASpec,
    fitted: Option<Fitted>,
}

impl SARIMA {
    pub fn new(
        p: usize,
        d: usize,
        q: usize,
        seasonal_p: usize,
        seasonal_d: usize,
        seasonal_q: usize,
        period: usize,
    ) -> Self {
        Self::from_specs(
            ARIMASpec::new(p, d, q),
            SARIMASpec::new(seasonal_p, seasonal_d, seasonal_q, period),
        )
    }

    pub fn from_specs(spec: ARIMASpec, seasonal: SARIMASpec) -> Self {
        Self {
            spec,
            seasonal,
            fitted: None,
        }
    }

    pub fn spec(&self) -> ARIMASpec {
        self.spec
    }

    pub fn seasonal_spec(&self) -> SARIMASpec {
        self.seasonal
    }

    pub fn ar_coefficients(&self) -> &[f64] {
        self.fitted.as_ref().map(|f| f.arma.phi.as_slice()).unwrap_or(&[])
    }

    pub fn ma_coefficients(&self) -> &[f64] {
        self.fitted
            .as_ref()
            .map(|f| f.arma.theta.as_slice())
            .unwrap_or(&[])
    }

    pub fn seasonal_ar_coefficients(&self) -> &[f64] {
        self.fitted
            .as_ref()
            .map(|f| f.arma.seasonal_phi.as_slice())
            .unwrap_or(&[])
    }

    pub fn seasonal_ma_coefficients(&self) -> &[f64] {
        self.fitted
            .as_ref()
            .map(|f| f.arma.seasonal_theta.as_slice())
            .unwrap_or(&[])
    }

    pub fn aic(&self) -> Option<f64> {
        self.fitted.as_ref().and_then(|f| f.arma.aic)
    }

    pub fn bic(&self) -> Option<f64> {
        self.fitted.as_ref().and_then(|f| f.arma.bic)
    }
}

impl Forecaster for SARIMA {
    fn fit(&mut self, series: &TimeSeries) -> Result<()> {
        if self.seasonal.period == 0 {
            return Err(ForecastError::InvalidParameter(
                "seasonal period must be at least 1".to_string(),
            ));
        }
        self.fitted = Some(fit_model(series, self.spec, self.seasonal, false)?);
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Forecast> {
        let fitted = self.fitted.as_ref().ok_or(ForecastError::FitRequired)?;
        Ok(fitted.predict(horizon))
    }

    fn predict_with_intervals(&self, horizon: usize, level: f64) -> Result<Forecast> {
        let fitted = self.fitted.as_ref().ok_or(ForecastError::FitRequired)?;
        fitted.predict_with_intervals(horizon, level)
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted.as_ref().map(|f| f.arma.fitted.as_slice())
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.fitted.as_ref().map(|f| f.arma.residuals.as_slice())
    }

    fn name(&self) -> &str {
        "SARIMAX"
    }

    fn describe(&self) -> String {
        format!("SARIMAX{}x{}", self.spec, self.seasonal)
    }
}
