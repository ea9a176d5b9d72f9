//! Indicators fed one close per bar.
//!
//! - `returns`: bounded close window and the simple returns between closes
//! - `volatility`: annualized volatility estimate with optional clamps
//! - `ema`: streaming EMA used by the trend source

pub mod ema;
pub mod returns;
pub mod volatility;

pub use ema::Ema;
pub use returns::{sample_std_dev, ReturnSeries, ANNUALIZATION_FACTOR, MIN_SAMPLES};
pub use volatility::VolatilityEstimator;

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
