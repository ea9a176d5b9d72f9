use serde::{Deserialize, Serialize};
use std::fmt;

/// Client-side order ID, minted by the strategy for every order it requests.
///
/// The execution gateway echoes it back on order events, so stop fills can be
/// matched without waiting on a broker-assigned handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub u64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for OrderId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Monotonic order ID generator. Starts at 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdGen {
    next: u64,
}

impl Default for IdGen {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdGen {
    pub fn next_id(&mut self) -> OrderId {
        let id = OrderId(self.next);
        self.next += 1;
        id
    }

    /// The ID the next call to `next_id` will return.
    pub fn peek(&self) -> OrderId {
        OrderId(self.next)
    }
}
