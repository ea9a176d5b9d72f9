//! ReturnSeries: bounded window of recent closes and the simple returns between them.
//!
//! Samples are kept oldest-first. Once the window is full, each new close
//! evicts the oldest one.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::error::StrategyError;

/// Multiplier that annualizes daily volatility.
///
/// An approximation of the square root of the trading days in a year, kept
/// at exactly 16 so estimates line up with the reference system.
pub const ANNUALIZATION_FACTOR: f64 = 16.0;

/// Fewest closes that yield two returns, the minimum for a sample variance.
pub const MIN_SAMPLES: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawReturnSeries")]
pub struct ReturnSeries {
    capacity: usize,
    samples: VecDeque<f64>,
}

/// Wire form of [`ReturnSeries`], checked before it becomes one.
#[derive(Deserialize)]
struct RawReturnSeries {
    capacity: usize,
    samples: VecDeque<f64>,
}

impl TryFrom<RawReturnSeries> for ReturnSeries {
    type Error = StrategyError;

    fn try_from(raw: RawReturnSeries) -> Result<Self, Self::Error> {
        if raw.capacity < MIN_SAMPLES {
            return Err(StrategyError::Config(format!(
                "return window capacity must be >= {MIN_SAMPLES}, got {}",
                raw.capacity
            )));
        }
        if raw.samples.len() > raw.capacity {
            return Err(StrategyError::Config(format!(
                "return window holds {} closes, more than its capacity {}",
                raw.samples.len(),
                raw.capacity
            )));
        }
        Ok(Self {
            capacity: raw.capacity,
            samples: raw.samples,
        })
    }
}

impl ReturnSeries {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= MIN_SAMPLES, "ReturnSeries capacity must be >= 3");
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a close, evicting the oldest once full.
    pub fn add_sample(&mut self, price: f64) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(price);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() == self.capacity
    }

    /// Most recent close.
    pub fn latest(&self) -> Option<f64> {
        self.samples.back().copied()
    }

    /// Closes in the window, oldest first.
    pub fn samples(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }

    /// Simple one-period returns `(newer - older) / older` for every
    /// consecutive pair in the window, oldest pair first. Length is `len() - 1`.
    pub fn returns(&self) -> Vec<f64> {
        self.samples
            .iter()
            .zip(self.samples.iter().skip(1))
            .map(|(older, newer)| (newer - older) / older)
            .collect()
    }

    /// Annualized sample standard deviation of the window's returns.
    pub fn annualized_volatility(&self) -> Result<f64, StrategyError> {
        let returns = self.returns();
        sample_std_dev(&returns)
            .map(|sd| sd * ANNUALIZATION_FACTOR)
            .ok_or(StrategyError::InsufficientData {
                needed: MIN_SAMPLES,
                available: self.len(),
            })
    }
}

/// Sample standard deviation with Bessel's correction. `None` below two values.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / (n - 1) as f64;
    Some(variance.sqrt())
}
