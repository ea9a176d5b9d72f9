use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Fast and slow moving-average values for one bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendSignal {
    pub fast: f64,
    pub slow: f64,
}

impl TrendSignal {
    pub fn new(fast: f64, slow: f64) -> Self {
        Self { fast, slow }
    }

    pub fn relation(&self) -> TrendRelation {
        match self.fast.partial_cmp(&self.slow) {
            Some(Ordering::Greater) => TrendRelation::Bullish,
            Some(Ordering::Less) => TrendRelation::Bearish,
            _ => TrendRelation::Neutral,
        }
    }
}

/// How the fast average sits relative to the slow one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrendRelation {
    /// fast > slow
    Bullish,
    /// fast < slow
    Bearish,
    /// fast == slow, or either side NaN. No signal.
    Neutral,
}
