//! Starter Core: a volatility-targeted trend-following decision engine.
//!
//! This crate contains the whole decision logic for one instrument:
//! - Domain types (bars, order intents, order events, position sides)
//! - Return window and annualized volatility estimate
//! - Volatility-target position sizing
//! - High watermark tracking and the volatility trailing stop
//! - FLAT / LONG / SHORT state machine driven by a fast/slow trend signal
//! - Session driver that forwards intents to an execution gateway
//!
//! Data feeds, order routing, and cash bookkeeping belong to the host.

pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod position_management;
pub mod sizers;

pub use config::{ConfigError, StrategyConfig};
pub use engine::{ExecutionGateway, PositionStateMachine, Session, StrategyState};
pub use error::StrategyError;
