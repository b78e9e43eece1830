//! Differencing utilities for ARIMA and SARIMA models.

/// Apply differencing to a time series `d` times.
pub fn difference(series: &[f64], d: usize) -> Vec<f64> {
    let mut result = series.to_vec();
    for _ in 0..d {
        if result.len() <= 1 {
            return Vec::new();
        }
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    result
}

/// Apply seasonal differencing `d` times at lag `period`.
pub fn seasonal_difference(series: &[f64], d: usize, period: usize) -> Vec<f64> {
    if period == 0 {
        return series.to_vec();
    }
    let mut result = series.to_vec();
    for _ in 0..d {
        if result.len() <= period {
            return Vec::new();
        }
        result = result
            .iter()
            .skip(period)
            .zip(result.iter())
            .map(|(curr, prev)| curr - prev)
            .collect();
    }
    result
}

/// Coefficients of `(1 - B)^d (1 - B^period)^seasonal_d`, lowest lag first.
///
/// The leading coefficient is always 1.
pub fn differencing_polynomial(d: usize, seasonal_d: usize, period: usize) -> Vec<f64> {
    let mut poly = vec![1.0];
    for _ in 0..d {
        poly = multiply(&poly, &[1.0, -1.0]);
    }
    if period > 0 {
        let mut seasonal = vec![0.0; period + 1];
        seasonal[0] = 1.0;
        seasonal[period] = -1.0;
        for _ in 0..seasonal_d {
            poly = multiply(&poly, &seasonal);
        }
    }
    poly
}

/// Multiply two polynomials given as coefficient vectors.
pub(crate) fn multiply(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, x) in a.iter().enumerate() {
        for (j, y) in b.iter().enumerate() {
            out[i + j] += x * y;
        }
    }
    out
}

/// Turn forecasts of the differenced series back into levels.
///
/// `delta` is the polynomial from [`differencing_polynomial`]. Each new level
/// is `w_t - sum_k delta_k * y_{t-k}`, where earlier levels include the
/// history followed by the levels already reconstructed.
pub fn undifference(differenced: &[f64], history: &[f64], delta: &[f64]) -> Vec<f64> {
    let order = delta.len().saturating_sub(1);
    if order == 0 {
        return differenced.to_vec();
    }

    let mut levels: Vec<f64> = history[history.len().saturating_sub(order)..].to_vec();
    let offset = levels.len();
    for &w in differenced {
        let t = levels.len();
        let mut y = w;
        for (k, coef) in delta.iter().enumerate().skip(1) {
            if t >= k {
                y -= coef * levels[t - k];
            }
        }
        levels.push(y);
    }
    levels.split_off(offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn difference_order_0() {
        let series = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(difference(&series, 0), series);
    }

    #[test]
    fn difference_order_2() {
        let series = vec![1.0, 3.0, 6.0, 10.0, 15.0];
        // First diff: [2, 3, 4, 5]; second: [1, 1, 1]
        assert_eq!(difference(&series, 2), vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn difference_exhausts_short_series() {
        assert!(difference(&[1.0], 1).is_empty());
        assert!(difference(&[], 1).is_empty());
    }

    #[test]
    fn seasonal_difference_basic() {
        // Quarterly data: each quarter rises by 10 year over year
        let series = vec![100.0, 120.0, 80.0, 90.0, 110.0, 130.0, 90.0, 100.0];
        assert_eq!(
            seasonal_difference(&series, 1, 4),
            vec![10.0, 10.0, 10.0, 10.0]
        );
        assert_eq!(seasonal_difference(&series, 0, 4), series);
    }

    #[test]
    fn polynomial_matches_sequential_differencing() {
        let series: Vec<f64> = (0..30).map(|i| (i * i) as f64 + (i % 4) as f64).collect();
        let delta = differencing_polynomial(1, 1, 4);
        assert_eq!(delta.len(), 6);

        let expected = seasonal_difference(&difference(&series, 1), 1, 4);
        let k = delta.len() - 1;
        for (i, t) in (k..series.len()).enumerate() {
            let w: f64 = delta
                .iter()
                .enumerate()
                .map(|(j, c)| c * series[t - j])
                .sum();
            assert_relative_eq!(w, expected[i], epsilon = 1e-9);
        }
    }

    #[test]
    fn undifference_continues_first_difference() {
        let history = vec![10.0, 12.0, 15.0, 19.0, 24.0];
        let delta = differencing_polynomial(1, 0, 0);
        let levels = undifference(&[6.0, 7.0], &history, &delta);
        assert_relative_eq!(levels[0], 30.0, epsilon = 1e-10);
        assert_relative_eq!(levels[1], 37.0, epsilon = 1e-10);
    }

    #[test]
    fn undifference_inverts_second_difference() {
        let full: Vec<f64> = (0..12).map(|i| (i * i) as f64).collect();
        let (history, future) = full.split_at(8);
        let delta = differencing_polynomial(2, 0, 0);
        let w = difference(&full, 2);
        let future_w = &w[w.len() - future.len()..];
        let levels = undifference(future_w, history, &delta);
        for (a, b) in levels.iter().zip(future) {
            assert_relative_eq!(a, b, epsilon = 1e-9);
        }
    }

    #[test]
    fn undifference_inverts_seasonal_difference() {
        let full: Vec<f64> = (0..24)
            .map(|i| 50.0 + i as f64 + [3.0, -1.0, 4.0, -6.0][i % 4])
            .collect();
        let (history, future) = full.split_at(16);
        let delta = differencing_polynomial(1, 1, 4);
        let w = seasonal_difference(&difference(&full, 1), 1, 4);
        let future_w = &w[w.len() - future.len()..];
        let levels = undifference(future_w, history, &delta);
        for (a, b) in levels.iter().zip(future) {
            assert_relative_eq!(a, b, epsilon = 1e-9);
        }
    }

    #[test]
    fn undifference_without_differencing_is_identity() {
        let delta = differencing_polynomial(0, 0, 12);
        assert_eq!(undifference(&[1.0, 2.0], &[5.0], &delta), vec![1.0, 2.0]);
    }
}
