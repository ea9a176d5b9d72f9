//! Volatility Target Sizer
//!
//! Scales exposure so the position's annualized volatility matches a target.

/// Volatility-targeting sizer
///
/// # Formula
/// ```text
/// exposure = capital * (target_vol / asset_vol)
/// shares   = round(exposure / price)
/// ```
///
/// # Example
/// - Capital: $100,000
/// - Target volatility: 12%
/// - Asset volatility: 24%
/// - Price: $100
/// - Shares: round(100,000 * 0.5 / 100) = 500
#[derive(Debug, Clone, PartialEq)]
pub struct VolTargetSizer {
    target_volatility: f64,
}

impl VolTargetSizer {
    pub fn new(target_volatility: f64) -> Self {
        assert!(target_volatility > 0.0, "target_volatility must be > 0");
        Self { target_volatility }
    }

    pub fn target_volatility(&self) -> f64 {
        self.target_volatility
    }

    pub fn size(&self, capital: f64, asset_volatility: f64, asset_price: f64) -> i64 {
        volatility_target_shares(capital, self.target_volatility, asset_volatility, asset_price)
    }
}

/// Whole shares that put `capital` at `target_volatility`, rounded half away
/// from zero. Non-finite results (zero volatility or price) size to 0.
pub fn volatility_target_shares(
    capital: f64,
    target_volatility: f64,
    asset_volatility: f64,
    asset_price: f64,
) -> i64 {
    let shares = capital * (target_volatility / asset_volatility) / asset_price;
    if !shares.is_finite() {
        return 0;
    }
    shares.round() as i64
}
