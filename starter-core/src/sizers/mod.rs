//! Position Sizers: determine trade quantity
//!
//! Sizers translate capital and a risk budget into whole shares. They are
//! signal-agnostic: the same size applies to a long or a short entry.

pub mod vol_target;

pub use vol_target::{volatility_target_shares, VolTargetSizer};
