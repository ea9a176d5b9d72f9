//! Volatility trailing stop: trail a volatility-scaled distance from the watermark.
//!
//! For longs: stop = watermark * (1 - vol * speed).
//! For shorts: stop = watermark * (1 + vol * speed).
//!
//! No ratchet is applied to the stop itself. It is recomputed every bar from
//! the current volatility, so it can widen when volatility rises even though
//! the watermark it hangs from only moves in the position's favor.

use crate::domain::PositionSide;

/// Stop trigger for a long position.
pub fn stop_price_for_long(high_watermark: f64, volatility: f64, speed_factor: f64) -> f64 {
    high_watermark * (1.0 - volatility * speed_factor)
}

/// Stop trigger for a short position.
pub fn stop_price_for_short(high_watermark: f64, volatility: f64, speed_factor: f64) -> f64 {
    high_watermark * (1.0 + volatility * speed_factor)
}

/// Stop calculator bound to a trading-speed factor.
#[derive(Debug, Clone, PartialEq)]
pub struct StopCalculator {
    /// Stop distance as a multiple of annualized volatility (e.g., 0.5).
    pub speed_factor: f64,
}

impl StopCalculator {
    pub fn new(speed_factor: f64) -> Self {
        assert!(speed_factor > 0.0, "speed_factor must be positive");
        Self { speed_factor }
    }

    /// Fraction of the watermark the price must move against the position.
    pub fn stop_distance(&self, volatility: f64) -> f64 {
        volatility * self.speed_factor
    }

    /// Stop trigger for `side`, or `None` when flat.
    pub fn stop_for(&self, side: PositionSide, high_watermark: f64, volatility: f64) -> Option<f64> {
        match side {
            PositionSide::Long => Some(stop_price_for_long(
                high_watermark,
                volatility,
                self.speed_factor,
            )),
            PositionSide::Short => Some(stop_price_for_short(
                high_watermark,
                volatility,
                self.speed_factor,
            )),
            PositionSide::Flat => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn long_stop_below_watermark() {
        // 110 * (1 - 0.20 * 0.5) = 99
        let calc = StopCalculator::new(0.5);
        let stop = calc.stop_for(PositionSide::Long, 110.0, 0.20).unwrap();
        assert!(approx(stop, 99.0));
    }

    #[test]
    fn short_stop_above_watermark() {
        // 80 * (1 + 0.20 * 0.5) = 88
        let calc = StopCalculator::new(0.5);
        let stop = calc.stop_for(PositionSide::Short, 80.0, 0.20).unwrap();
        assert!(approx(stop, 88.0));
    }

    #[test]
    fn flat_has_no_stop() {
        assert_eq!(StopCalculator::new(0.5).stop_for(PositionSide::Flat, 100.0, 0.2), None);
    }

    #[test]
    fn stop_widens_with_volatility() {
        let calm = stop_price_for_long(100.0, 0.10, 0.5);
        let wild = stop_price_for_long(100.0, 0.30, 0.5);
        assert!(wild < calm);
    }

    #[test]
    fn distance_scales_with_speed() {
        assert!(approx(StopCalculator::new(0.5).stop_distance(0.2), 0.1));
        assert!(approx(StopCalculator::new(1.0).stop_distance(0.2), 0.2));
    }
}
