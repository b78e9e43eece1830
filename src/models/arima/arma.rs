//! Conditional-sum-of-squares ARMA estimation on a differenced series.
//!
//! Seasonal and non-seasonal polynomials are multiplied out into a single
//! set of lag coefficients, so ARIMA and SARIMA share one filter, one
//! optimiser objective and one forecast recursion.

use crate::error::{ForecastError, Result};
use crate::models::arima::diff::multiply;
use crate::utils::optimization::{nelder_mead, NelderMeadConfig};

/// Stationarity and invertibility box for every coefficient.
const COEFFICIENT_BOUND: f64 = 0.99;

/// Orders of the ARMA part, after differencing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ArmaOrders {
    pub p: usize,
    pub q: usize,
    pub seasonal_p: usize,
    pub seasonal_q: usize,
    pub period: usize,
    pub include_mean: bool,
}

impl ArmaOrders {
    pub fn num_coefficients(&self) -> usize {
        self.p + self.q + self.seasonal_p + self.seasonal_q
    }

    pub fn num_params(&self) -> usize {
        self.num_coefficients() + usize::from(self.include_mean)
    }

    /// Highest AR lag once seasonal terms are expanded.
    pub fn ar_lags(&self) -> usize {
        self.p + self.seasonal_p * self.period
    }
}

/// Parameters in the optimiser's flat layout, split by role.
#[derive(Debug, Clone, PartialEq)]
struct Params {
    mean: f64,
    phi: Vec<f64>,
    theta: Vec<f64>,
    seasonal_phi: Vec<f64>,
    seasonal_theta: Vec<f64>,
}

impl Params {
    fn unpack(flat: &[f64], orders: &ArmaOrders) -> Self {
        let (mean, mut rest) = if orders.include_mean {
            (flat[0], &flat[1..])
        } else {
            (0.0, flat)
        };
        let mut take = |k: usize| {
            let (head, tail) = rest.split_at(k);
            rest = tail;
            head.to_vec()
        };
        let phi = take(orders.p);
        let theta = take(orders.q);
        let seasonal_phi = take(orders.seasonal_p);
        let seasonal_theta = take(orders.seasonal_q);
        Self {
            mean,
            phi,
            theta,
            seasonal_phi,
            seasonal_theta,
        }
    }

    fn ar(&self, period: usize) -> Vec<f64> {
        expand_ar(&self.phi, &self.seasonal_phi, period)
    }

    fn ma(&self, period: usize) -> Vec<f64> {
        expand_ma(&self.theta, &self.seasonal_theta, period)
    }
}

/// Lag coefficients `a_1..a_K` of `(1 - sum phi_i B^i)(1 - sum Phi_j B^{js})`
/// written as `y_t = sum a_k y_{t-k}`.
pub(crate) fn expand_ar(phi: &[f64], seasonal_phi: &[f64], period: usize) -> Vec<f64> {
    let product = multiply(
        &lag_polynomial(phi, 1, -1.0),
        &lag_polynomial(seasonal_phi, period, -1.0),
    );
    product[1..].iter().map(|c| -c).collect()
}

/// Lag coefficients `m_1..m_K` of `(1 + sum theta_i B^i)(1 + sum Theta_j B^{js})`.
pub(crate) fn expand_ma(theta: &[f64], seasonal_theta: &[f64], period: usize) -> Vec<f64> {
    let product = multiply(
        &lag_polynomial(theta, 1, 1.0),
        &lag_polynomial(seasonal_theta, period, 1.0),
    );
    product[1..].to_vec()
}

fn lag_polynomial(coefs: &[f64], stride: usize, sign: f64) -> Vec<f64> {
    let stride = stride.max(1);
    let mut poly = vec![0.0; coefs.len() * stride + 1];
    poly[0] = 1.0;
    for (j, c) in coefs.iter().enumerate() {
        poly[(j + 1) * stride] = sign * c;
    }
    poly
}

/// One-step predictions and innovations for `w` under the given lags.
///
/// The first `ar.len()` observations have no prediction; their innovations
/// are taken as zero.
fn filter(w: &[f64], ar: &[f64], ma: &[f64], mean: f64) -> (Vec<f64>, Vec<f64>) {
    let n = w.len();
    let start = ar.len().min(n);
    let mut fitted = vec![f64::NAN; n];
    let mut residuals = vec![0.0; n];

    for t in start..n {
        let mut pred = mean;
        for (k, a) in ar.iter().enumerate() {
            pred += a * (w[t - 1 - k] - mean);
        }
        for (k, m) in ma.iter().enumerate().take(t) {
            pred += m * residuals[t - 1 - k];
        }
        fitted[t] = pred;
        residuals[t] = w[t] - pred;
    }
    (fitted, residuals)
}

fn css(w: &[f64], params: &Params, period: usize) -> f64 {
    let ar = params.ar(period);
    if w.len() <= ar.len() {
        return f64::MAX;
    }
    let (_, residuals) = filter(w, &ar, &params.ma(period), params.mean);
    let total: f64 = residuals[ar.len()..].iter().map(|e| e * e).sum();
    if total.is_finite() {
        total
    } else {
        f64::MAX
    }
}

/// A fitted ARMA model on the differenced scale.
#[derive(Debug, Clone)]
pub(crate) struct ArmaFit {
    pub mean: f64,
    pub phi: Vec<f64>,
    pub theta: Vec<f64>,
    pub seasonal_phi: Vec<f64>,
    pub seasonal_theta: Vec<f64>,
    /// Expanded AR lag coefficients.
    pub ar: Vec<f64>,
    /// Expanded MA lag coefficients.
    pub ma: Vec<f64>,
    pub fitted: Vec<f64>,
    pub residuals: Vec<f64>,
    pub sigma2: f64,
    pub aic: Option<f64>,
    pub bic: Option<f64>,
    pub converged: bool,
}

/// Estimate the ARMA part of a model on the differenced series `w`.
pub(crate) fn fit_arma(w: &[f64], orders: ArmaOrders) -> Result<ArmaFit> {
    let start = orders.ar_lags();
    if w.len() <= start + 1 {
        return Err(ForecastError::InsufficientData {
            needed: start + 2,
            got: w.len(),
        });
    }

    let sample_mean = w.iter().sum::<f64>() / w.len() as f64;
    let (params, converged) = if orders.num_coefficients() == 0 {
        let params = Params {
            mean: if orders.include_mean { sample_mean } else { 0.0 },
            phi: vec![],
            theta: vec![],
            seasonal_phi: vec![],
            seasonal_theta: vec![],
        };
        (params, true)
    } else {
        estimate(w, &orders, sample_mean)
    };

    let ar = params.ar(orders.period);
    let ma = params.ma(orders.period);
    let (fitted, residuals) = filter(w, &ar, &ma, params.mean);

    let effective = &residuals[start..];
    let n_eff = effective.len() as f64;
    let sigma2 = effective.iter().map(|e| e * e).sum::<f64>() / n_eff;
    if !sigma2.is_finite() {
        return Err(ForecastError::ComputationError(
            "residual variance is not finite".to_string(),
        ));
    }

    let (aic, bic) = if sigma2 > 0.0 {
        let k = orders.num_params() as f64;
        let ll = -0.5 * n_eff * (1.0 + sigma2.ln() + (2.0 * std::f64::consts::PI).ln());
        (Some(-2.0 * ll + 2.0 * k), Some(-2.0 * ll + k * n_eff.ln()))
    } else {
        (None, None)
    };

    Ok(ArmaFit {
        mean: params.mean,
        phi: params.phi,
        theta: params.theta,
        seasonal_phi: params.seasonal_phi,
        seasonal_theta: params.seasonal_theta,
        ar,
        ma,
        fitted,
        residuals,
        sigma2,
        aic,
        bic,
        converged,
    })
}

fn estimate(w: &[f64], orders: &ArmaOrders, sample_mean: f64) -> (Params, bool) {
    let mut initial = Vec::with_capacity(orders.num_params());
    let mut bounds = Vec::with_capacity(orders.num_params());
    if orders.include_mean {
        initial.push(sample_mean);
        bounds.push((f64::NEG_INFINITY, f64::INFINITY));
    }
    for count in [orders.p, orders.q, orders.seasonal_p, orders.seasonal_q] {
        for i in 0..count {
            initial.push(0.1 / (i + 1) as f64);
            bounds.push((-COEFFICIENT_BOUND, COEFFICIENT_BOUND));
        }
    }

    let config = NelderMeadConfig {
        max_iter: 1000.max(200 * initial.len()),
        tolerance: 1e-8,
        ..Default::default()
    };
    let result = nelder_mead(
        |flat| css(w, &Params::unpack(flat, orders), orders.period),
        &initial,
        Some(&bounds),
        config,
    );

    tracing::debug!(
        iterations = result.iterations,
        css = result.optimal_value,
        converged = result.converged,
        "css optimisation finished"
    );
    (Params::unpack(&result.optimal_point, orders), result.converged)
}

impl ArmaFit {
    /// Dynamic forecasts of `w` for `horizon` steps past its end.
    ///
    /// Each step feeds on earlier predictions; future innovations are zero.
    pub fn forecast(&self, w: &[f64], horizon: usize) -> Vec<f64> {
        let mut values = w.to_vec();
        let mut shocks = self.residuals.clone();
        for _ in 0..horizon {
            let t = values.len();
            let mut pred = self.mean;
            for (k, a) in self.ar.iter().enumerate().take(t) {
                pred += a * (values[t - 1 - k] - self.mean);
            }
            for (k, m) in self.ma.iter().enumerate().take(t) {
                pred += m * shocks[t - 1 - k];
            }
            values.push(pred);
            shocks.push(0.0);
        }
        values.split_off(w.len())
    }

    /// MA(infinity) weights `psi_0..psi_{horizon-1}` of the integrated model.
    ///
    /// `delta` is the differencing polynomial, so the weights describe the
    /// level series rather than the differenced one.
    pub fn psi_weights(&self, delta: &[f64], horizon: usize) -> Vec<f64> {
        let mut ar_poly = vec![1.0];
        ar_poly.extend(self.ar.iter().map(|a| -a));
        let full: Vec<f64> = multiply(&ar_poly, delta)[1..].iter().map(|c| -c).collect();

        let mut psi = Vec::with_capacity(horizon);
        for j in 0..horizon {
            if j == 0 {
                psi.push(1.0);
                continue;
            }
            let mut value = self.ma.get(j - 1).copied().unwrap_or(0.0);
            for (k, a) in full.iter().enumerate().take(j) {
                value += a * psi[j - 1 - k];
            }
            psi.push(value);
        }
        psi
    }
}
