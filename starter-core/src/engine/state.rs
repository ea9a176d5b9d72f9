//! Strategy state: every mutable field of the state machine in one value.
//!
//! Serializable so a host can snapshot a running strategy and restore it
//! later, and so tests can set up any position directly.

use serde::{Deserialize, Serialize};

use crate::config::StrategyConfig;
use crate::domain::{IdGen, OrderId, PositionSide, PreviousPosition, RestingStop};
use crate::engine::warmup::WarmupState;
use crate::indicators::ReturnSeries;
use crate::position_management::HighWatermarkTracker;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyState {
    pub side: PositionSide,
    pub previous: PreviousPosition,
    pub high_watermark: HighWatermarkTracker,
    /// Protective stop resting at the gateway, if any.
    pub stop: Option<RestingStop>,
    /// Market order that opened the current position.
    pub entry_order: Option<OrderId>,
    pub ids: IdGen,
    pub warmup: WarmupState,
    pub returns: ReturnSeries,
}

impl StrategyState {
    /// Flat, no previous position, watermark 0, empty return window.
    pub fn initial(config: &StrategyConfig) -> Self {
        Self {
            side: PositionSide::Flat,
            previous: PreviousPosition::None,
            high_watermark: HighWatermarkTracker::default(),
            stop: None,
            entry_order: None,
            ids: IdGen::default(),
            warmup: WarmupState::from_config(config),
            returns: ReturnSeries::new(config.std_period),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
