//! Volatility estimator: annualized close-to-close volatility with optional clamps.
//!
//! The raw estimate comes from [`ReturnSeries::annualized_volatility`]. The
//! floor and cap are applied after annualization; with neither set the raw
//! estimate passes through untouched.

use crate::config::StrategyConfig;
use crate::error::StrategyError;

use super::returns::ReturnSeries;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VolatilityEstimator {
    floor: Option<f64>,
    cap: Option<f64>,
}

impl VolatilityEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bounds(floor: Option<f64>, cap: Option<f64>) -> Self {
        Self { floor, cap }
    }

    pub fn from_config(config: &StrategyConfig) -> Self {
        Self::with_bounds(config.volatility_floor, config.volatility_cap)
    }

    /// Annualized volatility, clamped, and checked to be usable as a divisor.
    pub fn estimate(&self, series: &ReturnSeries) -> Result<f64, StrategyError> {
        let raw = series.annualized_volatility()?;
        let mut vol = raw;
        if let Some(floor) = self.floor {
            vol = vol.max(floor);
        }
        if let Some(cap) = self.cap {
            vol = vol.min(cap);
        }
        if !vol.is_finite() || vol <= 0.0 {
            return Err(StrategyError::DegenerateVolatility(vol));
        }
        Ok(vol)
    }
}
