//! Strategy configuration.
//!
//! Every field has a default, so a TOML file only needs the keys it overrides:
//!
//! ```toml
//! target_volatility = 0.15
//! trading_speed_factor = 0.75
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::error::StrategyError;

/// Errors loading or saving a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize config TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error(transparent)]
    Invalid(#[from] StrategyError),
}

/// Parameters of the volatility-targeting trend system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// Instrument label, used only in log output.
    pub symbol: String,
    /// Close-price window length for the volatility estimate.
    pub std_period: usize,
    /// Fast trend EMA length.
    pub fast_period: usize,
    /// Slow trend EMA length. Also the warm-up length.
    pub slow_period: usize,
    /// Annualized volatility the position is sized to.
    pub target_volatility: f64,
    /// Stop distance as a multiple of annualized volatility.
    pub trading_speed_factor: f64,
    /// Capital at risk.
    pub capital: f64,
    /// Lower clamp on the annualized volatility estimate.
    pub volatility_floor: Option<f64>,
    /// Upper clamp on the annualized volatility estimate.
    pub volatility_cap: Option<f64>,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            symbol: "SPY".into(),
            std_period: 25,
            fast_period: 16,
            slow_period: 64,
            target_volatility: 0.12,
            trading_speed_factor: 0.5,
            capital: 100_000.0,
            volatility_floor: None,
            volatility_cap: None,
        }
    }
}

impl StrategyConfig {
    /// Load and validate a configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate a configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Number of bars consumed before the first entry can be evaluated.
    pub fn warmup_bars(&self) -> usize {
        self.slow_period
    }

    pub fn validate(&self) -> Result<(), StrategyError> {
        if self.std_period < 3 {
            return Err(StrategyError::Config(format!(
                "std_period must be >= 3, got {}",
                self.std_period
            )));
        }
        if self.fast_period == 0 || self.fast_period >= self.slow_period {
            return Err(StrategyError::Config(format!(
                "need 0 < fast_period < slow_period, got {} / {}",
                self.fast_period, self.slow_period
            )));
        }
        for (name, value) in [
            ("target_volatility", self.target_volatility),
            ("trading_speed_factor", self.trading_speed_factor),
            ("capital", self.capital),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(StrategyError::Config(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if let (Some(floor), Some(cap)) = (self.volatility_floor, self.volatility_cap) {
            if floor > cap {
                return Err(StrategyError::Config(format!(
                    "volatility_floor {floor} exceeds volatility_cap {cap}"
                )));
            }
        }
        Ok(())
    }

    /// Deterministic BLAKE3 hash of the configuration, for tagging replay output.
    pub fn fingerprint(&self) -> String {
        let json = serde_json::to_string(self).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}
