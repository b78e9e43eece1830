//! Model configuration and the per-session request record.

use crate::error::{ForecastError, Result};
use crate::models::arima::{ARIMASpec, SARIMASpec, ARIMA, SARIMA};
use crate::models::BoxedForecaster;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

pub const AR_ORDER_RANGE: RangeInclusive<usize> = 0..=5;
pub const DIFF_ORDER_RANGE: RangeInclusive<usize> = 0..=2;
pub const MA_ORDER_RANGE: RangeInclusive<usize> = 0..=5;
pub const SEASONAL_AR_RANGE: RangeInclusive<usize> = 0..=5;
pub const SEASONAL_DIFF_RANGE: RangeInclusive<usize> = 0..=2;
pub const SEASONAL_MA_RANGE: RangeInclusive<usize> = 0..=5;
pub const PERIOD_RANGE: RangeInclusive<usize> = 1..=24;
pub const HORIZON_RANGE: RangeInclusive<usize> = 1..=36;

pub const DEFAULT_HORIZON: usize = 12;

/// Which model family to fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelFamily {
    #[default]
    Arima,
    Sarimax,
}

impl FromStr for ModelFamily {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "arima" => Ok(Self::Arima),
            "sarimax" => Ok(Self::Sarimax),
            other => Err(ForecastError::InvalidParameter(format!(
                "unknown model family {other:?}, expected ARIMA or SARIMAX"
            ))),
        }
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Arima => f.write_str("ARIMA"),
            Self::Sarimax => f.write_str("SARIMAX"),
        }
    }
}

/// Family, orders and horizon for one forecasting run.
///
/// `seasonal` is `Some` exactly when the family is SARIMAX.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelConfig {
    family: ModelFamily,
    order: ARIMASpec,
    seasonal: Option<SARIMASpec>,
    horizon: usize,
}

impl ModelConfig {
    pub fn arima(order: ARIMASpec, horizon: usize) -> Self {
        Self {
            family: ModelFamily::Arima,
            order,
            seasonal: None,
            horizon,
        }
    }

    pub fn sarimax(order: ARIMASpec, seasonal: SARIMASpec, horizon: usize) -> Self {
        Self {
            family: ModelFamily::Sarimax,
            order,
            seasonal: Some(seasonal),
            horizon,
        }
    }

    /// Build from every control value at once; seasonal values are ignored
    /// for ARIMA.
    pub fn from_parts(
        family: ModelFamily,
        order: ARIMASpec,
        seasonal: SARIMASpec,
        horizon: usize,
    ) -> Self {
        match family {
            ModelFamily::Arima => Self::arima(order, horizon),
            ModelFamily::Sarimax => Self::sarimax(order, seasonal, horizon),
        }
    }

    pub fn family(&self) -> ModelFamily {
        self.family
    }

    pub fn order(&self) -> ARIMASpec {
        self.order
    }

    pub fn seasonal(&self) -> Option<SARIMASpec> {
        self.seasonal
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Check every value against its allowed range.
    pub fn validate(&self) -> Result<()> {
        check("p", self.order.p, AR_ORDER_RANGE)?;
        check("d", self.order.d, DIFF_ORDER_RANGE)?;
        check("q", self.order.q, MA_ORDER_RANGE)?;
        if let Some(seasonal) = self.seasonal {
            check("P", seasonal.p, SEASONAL_AR_RANGE)?;
            check("D", seasonal.d, SEASONAL_DIFF_RANGE)?;
            check("Q", seasonal.q, SEASONAL_MA_RANGE)?;
            check("s", seasonal.period, PERIOD_RANGE)?;
        }
        check("horizon", self.horizon, HORIZON_RANGE)
    }

    /// Unfitted model for this configuration.
    pub fn build(&self) -> BoxedForecaster {
        match self.seasonal {
            None => Box::new(ARIMA::from_spec(self.order)),
            Some(seasonal) => Box::new(SARIMA::from_specs(self.order, seasonal)),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self::arima(ARIMASpec::default(), DEFAULT_HORIZON)
    }
}

fn check(name: &'static str, value: usize, range: RangeInclusive<usize>) -> Result<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ForecastError::ParameterOutOfRange {
            name,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

/// Everything one session needs besides the uploaded table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRequest {
    pub date_column: String,
    pub value_column: String,
    pub model: ModelConfig,
}

impl SessionRequest {
    pub fn new(
        date_column: impl Into<String>,
        value_column: impl Into<String>,
        model: ModelConfig,
    ) -> Self {
        Self {
            date_column: date_column.into(),
            value_column: value_column.into(),
            model,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_parses_case_insensitively() {
        assert_eq!("ARIMA".parse::<ModelFamily>().unwrap(), ModelFamily::Arima);
        assert_eq!("sarimax".parse::<ModelFamily>().unwrap(), ModelFamily::Sarimax);
        assert_eq!(" SarimaX ".parse::<ModelFamily>().unwrap(), ModelFamily::Sarimax);
        assert!(matches!(
            "prophet".parse::<ModelFamily>(),
            Err(ForecastError::InvalidParameter(_))
        ));
        assert_eq!(ModelFamily::Sarimax.to_string(), "SARIMAX");
    }

    #[test]
    fn defaults() {
        let config = ModelConfig::default();
        assert_eq!(config.family(), ModelFamily::Arima);
        assert_eq!(config.order(), ARIMASpec::new(1, 1, 1));
        assert_eq!(config.seasonal(), None);
        assert_eq!(config.horizon(), 12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn arima_drops_seasonal_values() {
        let config = ModelConfig::from_parts(
            ModelFamily::Arima,
            ARIMASpec::new(2, 1, 0),
            SARIMASpec::new(1, 1, 1, 12),
            6,
        );
        assert_eq!(config.seasonal(), None);
        assert_eq!(config.build().describe(), "ARIMA(2,1,0)");
    }

    #[test]
    fn sarimax_keeps_all_four_seasonal_values() {
        let seasonal = SARIMASpec::new(2, 0, 1, 4);
        let config = ModelConfig::from_parts(
            ModelFamily::Sarimax,
            ARIMASpec::new(1, 1, 1),
            seasonal,
            6,
        );
        assert_eq!(config.seasonal(), Some(seasonal));
        assert_eq!(config.build().describe(), "SARIMAX(1,1,1)x(2,0,1)[4]");
    }

    #[test]
    fn validate_rejects_out_of_range_orders() {
        let config = ModelConfig::arima(ARIMASpec::new(6, 1, 1), 12);
        assert_eq!(
            config.validate(),
            Err(ForecastError::ParameterOutOfRange {
                name: "p",
                value: 6,
                min: 0,
                max: 5,
            })
        );

        let config = ModelConfig::arima(ARIMASpec::new(1, 3, 1), 12);
        assert!(matches!(
            config.validate(),
            Err(ForecastError::ParameterOutOfRange { name: "d", .. })
        ));
    }

    #[test]
    fn validate_checks_seasonal_period_and_horizon() {
        let config = ModelConfig::sarimax(ARIMASpec::default(), SARIMASpec::new(1, 1, 1, 0), 12);
        assert!(matches!(
            config.validate(),
            Err(ForecastError::ParameterOutOfRange { name: "s", .. })
        ));

        let config = ModelConfig::sarimax(ARIMASpec::default(), SARIMASpec::new(1, 1, 1, 25), 12);
        assert!(config.validate().is_err());

        for horizon in [0, 37] {
            let config = ModelConfig::arima(ARIMASpec::default(), horizon);
            assert!(matches!(
                config.validate(),
                Err(ForecastError::ParameterOutOfRange { name: "horizon", .. })
            ));
        }
        assert!(ModelConfig::arima(ARIMASpec::default(), 36).validate().is_ok());
    }

    #[test]
    fn seasonal_bounds_are_ignored_for_arima() {
        // Out-of-range seasonal controls don't matter when ARIMA is selected.
        let config = ModelConfig::from_parts(
            ModelFamily::Arima,
            ARIMASpec::default(),
            SARIMASpec::new(9, 9, 9, 99),
            12,
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn session_request_holds_columns() {
        let request = SessionRequest::new("Month", "Sales", ModelConfig::default());
        assert_eq!(request.date_column, "Month");
        assert_eq!(request.value_column, "Sales");
    }
}
