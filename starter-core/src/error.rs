//! Strategy error taxonomy.
//!
//! None of these are fatal to a running session. The strategy logs and skips
//! the offending bar or event; the host decides whether to surface them.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StrategyError {
    /// Volatility requested before the return window holds enough samples.
    #[error("insufficient data: need {needed} samples, have {available}")]
    InsufficientData { needed: usize, available: usize },

    /// Stop update or order event that does not match the current position.
    #[error("invalid order state: {0}")]
    InvalidOrderState(String),

    /// Volatility estimate that cannot size a position or place a stop.
    #[error("degenerate volatility estimate: {0}")]
    DegenerateVolatility(f64),

    #[error("invalid configuration: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_data_message_names_counts() {
        let err = StrategyError::InsufficientData {
            needed: 3,
            available: 1,
        };
        assert_eq!(
            err.to_string(),
            "insufficient data: need 3 samples, have 1"
        );
    }

    #[test]
    fn degenerate_volatility_carries_value() {
        let err = StrategyError::DegenerateVolatility(0.0);
        assert!(err.to_string().contains("degenerate"));
    }
}
