//! Transition table for the position state machine.
//!
//! Keyed by `(current side, previous position, trend relation)`. Entries are
//! only considered while flat; an open position only ever trails its stop.
//! Re-entry on the same side as the last stopped-out position is blocked, so
//! after a long is stopped out only a short can follow, and vice versa.

use serde::{Deserialize, Serialize};

use crate::domain::{PositionSide, PreviousPosition, TrendRelation};

/// What the strategy does on a warm bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    /// Flat and no eligible signal.
    Hold,
    EnterLong,
    EnterShort,
    /// In a position: recompute and move the resting stop.
    TrailStop,
}

pub fn decide(
    side: PositionSide,
    previous: PreviousPosition,
    relation: TrendRelation,
) -> Transition {
    use PositionSide as S;
    use PreviousPosition as P;
    use TrendRelation as T;

    match (side, previous, relation) {
        (S::Long | S::Short, _, _) => Transition::TrailStop,
        (S::Flat, P::None | P::Long, T::Bearish) => Transition::EnterShort,
        (S::Flat, P::None | P::Short, T::Bullish) => Transition::EnterLong,
        (S::Flat, _, _) => Transition::Hold,
    }
}
