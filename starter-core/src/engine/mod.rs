//! Decision engine: bar-by-bar state machine and the driver around it.
//!
//! Each bar runs four steps:
//!
//! 1. Record the close in the return window
//! 2. Gate on warm-up
//! 3. Update the high watermark
//! 4. Apply the transition table: enter, trail the stop, or hold

pub mod decision;
pub mod session;
pub mod state;
pub mod strategy;
pub mod warmup;

pub use decision::{decide, Transition};
pub use session::{dispatch, ExecutionGateway, RecordingGateway, Session, TrendSource};
pub use state::StrategyState;
pub use strategy::PositionStateMachine;
pub use warmup::WarmupState;
