use serde::{Deserialize, Serialize};

use crate::config::StrategyConfig;

/// Warmup state tracker
///
/// Counts bars seen so far. A bar is a warm-up bar if fewer than
/// `warmup_bars` bars were processed before it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarmupState {
    warmup_bars: usize,
    bars_processed: usize,
}

impl WarmupState {
    pub fn new(warmup_bars: usize) -> Self {
        Self {
            warmup_bars,
            bars_processed: 0,
        }
    }

    /// Warm-up length from the configured trend lookback.
    pub fn from_config(config: &StrategyConfig) -> Self {
        Self::new(config.warmup_bars())
    }

    pub fn warmup_bars(&self) -> usize {
        self.warmup_bars
    }

    pub fn process_bar(&mut self) {
        self.bars_processed += 1;
    }

    pub fn is_warm(&self) -> bool {
        self.bars_processed >= self.warmup_bars
    }

    pub fn bars_until_warm(&self) -> usize {
        self.warmup_bars.saturating_sub(self.bars_processed)
    }

    pub fn bars_processed(&self) -> usize {
        self.bars_processed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warmup_state() {
        let mut warmup = WarmupState::new(20);
        assert!(!warmup.is_warm());
        assert_eq!(warmup.bars_until_warm(), 20);

        for _ in 0..19 {
            warmup.process_bar();
        }
        assert!(!warmup.is_warm());
        assert_eq!(warmup.bars_until_warm(), 1);

        warmup.process_bar();
        assert!(warmup.is_warm());
        assert_eq!(warmup.bars_until_warm(), 0);
    }

    #[test]
    fn test_zero_warmup() {
        let warmup = WarmupState::new(0);
        assert!(warmup.is_warm());
        assert_eq!(warmup.bars_until_warm(), 0);
    }

    #[test]
    fn test_warmup_progress() {
        let mut warmup = WarmupState::new(10);

        for i in 1..=10 {
            warmup.process_bar();
            if i < 10 {
                assert!(!warmup.is_warm());
                assert_eq!(warmup.bars_until_warm(), 10 - i);
            } else {
                assert!(warmup.is_warm());
                assert_eq!(warmup.bars_until_warm(), 0);
            }
        }
        assert_eq!(warmup.bars_processed(), 10);
    }

    #[test]
    fn test_from_config_uses_slow_period() {
        let warmup = WarmupState::from_config(&StrategyConfig::default());
        assert_eq!(warmup.bars_until_warm(), 64);
    }
}
