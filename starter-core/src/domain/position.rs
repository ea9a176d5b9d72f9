use serde::{Deserialize, Serialize};

/// Side of the single open position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionSide {
    #[default]
    Flat,
    Long,
    Short,
}

impl PositionSide {
    pub fn is_flat(self) -> bool {
        self == PositionSide::Flat
    }

    /// Sign applied to an entry quantity: +1 long, -1 short, 0 flat.
    pub fn direction(self) -> i64 {
        match self {
            PositionSide::Long => 1,
            PositionSide::Short => -1,
            PositionSide::Flat => 0,
        }
    }
}

/// Side held before the most recent stop-out.
///
/// Only a confirmed stop fill changes this; entries never do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PreviousPosition {
    #[default]
    None,
    Long,
    Short,
}

impl From<PositionSide> for PreviousPosition {
    fn from(side: PositionSide) -> Self {
        match side {
            PositionSide::Long => PreviousPosition::Long,
            PositionSide::Short => PreviousPosition::Short,
            PositionSide::Flat => PreviousPosition::None,
        }
    }
}
