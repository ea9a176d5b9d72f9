//! Order intents emitted to the execution gateway and order events coming back.

use super::ids::OrderId;
use serde::{Deserialize, Serialize};

/// A request to the execution gateway.
///
/// Quantities are signed: positive buys, negative sells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrderIntent {
    /// Market order for the entry.
    SubmitMarket { id: OrderId, quantity: i64 },
    /// Protective stop-market order, opposite-signed to the entry.
    SubmitStop {
        id: OrderId,
        quantity: i64,
        stop_price: f64,
    },
    /// Move the trigger of a resting stop.
    UpdateStop { id: OrderId, stop_price: f64 },
    /// Cancel a resting order.
    Cancel { id: OrderId },
}

impl OrderIntent {
    pub fn order_id(&self) -> OrderId {
        match self {
            OrderIntent::SubmitMarket { id, .. }
            | OrderIntent::SubmitStop { id, .. }
            | OrderIntent::UpdateStop { id, .. }
            | OrderIntent::Cancel { id } => *id,
        }
    }
}

/// Order lifecycle status reported by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Submitted,
    UpdateSubmitted,
    PartiallyFilled,
    Filled,
    Canceled,
    Invalid,
}

impl OrderStatus {
    /// No further events will follow for this order.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            OrderStatus::Filled | OrderStatus::Canceled | OrderStatus::Invalid
        )
    }
}

/// Asynchronous notification from the gateway about one order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderEvent {
    pub order_id: OrderId,
    pub status: OrderStatus,
    #[serde(default)]
    pub fill_price: Option<f64>,
}

impl OrderEvent {
    pub fn new(order_id: OrderId, status: OrderStatus) -> Self {
        Self {
            order_id,
            status,
            fill_price: None,
        }
    }

    pub fn filled(order_id: OrderId, fill_price: f64) -> Self {
        Self {
            order_id,
            status: OrderStatus::Filled,
            fill_price: Some(fill_price),
        }
    }
}

/// The protective stop currently resting at the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestingStop {
    pub id: OrderId,
    pub quantity: i64,
    pub stop_price: f64,
}
