/// High watermark tracking
///
/// **Core Rule:** the reference price only moves in the position's favor.
///
/// - Flat: the watermark follows every close, so an entry starts from the
///   close of its own bar.
/// - Long: the watermark can only rise.
/// - Short: the watermark can only fall (it is a low watermark in effect).
use crate::domain::PositionSide;
use serde::{Deserialize, Serialize};

/// Most favorable close since the current position was opened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighWatermarkTracker {
    level: f64,
}

impl HighWatermarkTracker {
    /// Create a tracker at an explicit level
    pub fn with_level(level: f64) -> Self {
        Self { level }
    }

    /// Apply one close for the given side
    ///
    /// Returns the updated watermark.
    ///
    /// # Example
    /// ```
    /// use starter_core::domain::PositionSide;
    /// use starter_core::position_management::HighWatermarkTracker;
    ///
    /// let mut hw = HighWatermarkTracker::default();
    /// hw.update(100.0, PositionSide::Flat);
    ///
    /// // New high while long: ratchets up
    /// assert_eq!(hw.update(105.0, PositionSide::Long), 105.0);
    ///
    /// // Pullback while long: unchanged
    /// assert_eq!(hw.update(101.0, PositionSide::Long), 105.0);
    /// ```
    pub fn update(&mut self, close: f64, side: PositionSide) -> f64 {
        match side {
            PositionSide::Flat => self.level = close,
            PositionSide::Long if close > self.level => self.level = close,
            PositionSide::Short if close < self.level => self.level = close,
            _ => {}
        }
        self.level
    }

    pub fn level(&self) -> f64 {
        self.level
    }
}
