//! Bar: one daily close of the traded instrument.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Market snapshot delivered once per bar.
///
/// Only the close drives decisions. A split notice is carried through so the
/// strategy can log it; no position or size adjustment is made for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split: Option<SplitNotice>,
}

impl Bar {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self {
            date,
            close,
            split: None,
        }
    }

    pub fn with_split(mut self, split: SplitNotice) -> Self {
        self.split = Some(split);
        self
    }

    /// Returns true if the close is NaN (void bar).
    pub fn is_void(&self) -> bool {
        self.close.is_nan()
    }

    /// A usable close: finite and strictly positive.
    pub fn is_sane(&self) -> bool {
        self.close.is_finite() && self.close > 0.0
    }
}

/// Whether a split is announced for the next session or has just happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitKind {
    Warning,
    Occurred,
}

/// Corporate-action notice attached to a bar by the data feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitNotice {
    pub kind: SplitKind,
    pub factor: f64,
    pub reference_price: f64,
}
