//! Session driver: trend source + state machine + execution gateway.
//!
//! The host calls `on_bar` once per bar in date order and `on_order_event`
//! for each gateway notification, never concurrently. Intents emitted by the
//! state machine are forwarded to the gateway in emission order, so a cancel
//! always reaches the gateway before the entry that replaces it.

use std::convert::Infallible;

use serde::{Deserialize, Serialize};

use crate::config::StrategyConfig;
use crate::domain::{Bar, OrderEvent, OrderId, OrderIntent, TrendSignal};
use crate::engine::strategy::PositionStateMachine;
use crate::error::StrategyError;
use crate::indicators::Ema;

/// Order execution collaborator.
///
/// Quantities are signed (positive buys). IDs are minted by the strategy and
/// must be echoed back on order events.
pub trait ExecutionGateway {
    type Error;

    fn submit_market_order(&mut self, id: OrderId, quantity: i64) -> Result<(), Self::Error>;

    fn submit_stop_order(
        &mut self,
        id: OrderId,
        quantity: i64,
        stop_price: f64,
    ) -> Result<(), Self::Error>;

    fn update_stop_price(&mut self, id: OrderId, stop_price: f64) -> Result<(), Self::Error>;

    fn cancel_order(&mut self, id: OrderId) -> Result<(), Self::Error>;
}

/// Send each intent to the gateway, stopping at the first error.
pub fn dispatch<G: ExecutionGateway + ?Sized>(
    gateway: &mut G,
    intents: &[OrderIntent],
) -> Result<(), G::Error> {
    for intent in intents {
        match *intent {
            OrderIntent::SubmitMarket { id, quantity } => {
                gateway.submit_market_order(id, quantity)?
            }
            OrderIntent::SubmitStop {
                id,
                quantity,
                stop_price,
            } => gateway.submit_stop_order(id, quantity, stop_price)?,
            OrderIntent::UpdateStop { id, stop_price } => {
                gateway.update_stop_price(id, stop_price)?
            }
            OrderIntent::Cancel { id } => gateway.cancel_order(id)?,
        }
    }
    Ok(())
}

/// Gateway that only records what it was asked to do.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingGateway {
    pub intents: Vec<OrderIntent>,
}

impl ExecutionGateway for RecordingGateway {
    type Error = Infallible;

    fn submit_market_order(&mut self, id: OrderId, quantity: i64) -> Result<(), Infallible> {
        self.intents.push(OrderIntent::SubmitMarket { id, quantity });
        Ok(())
    }

    fn submit_stop_order(
        &mut self,
        id: OrderId,
        quantity: i64,
        stop_price: f64,
    ) -> Result<(), Infallible> {
        self.intents.push(OrderIntent::SubmitStop {
            id,
            quantity,
            stop_price,
        });
        Ok(())
    }

    fn update_stop_price(&mut self, id: OrderId, stop_price: f64) -> Result<(), Infallible> {
        self.intents.push(OrderIntent::UpdateStop { id, stop_price });
        Ok(())
    }

    fn cancel_order(&mut self, id: OrderId) -> Result<(), Infallible> {
        self.intents.push(OrderIntent::Cancel { id });
        Ok(())
    }
}

/// Fast/slow EMA pair standing in for the host's indicator pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSource {
    fast: Ema,
    slow: Ema,
}

impl TrendSource {
    pub fn new(fast_period: usize, slow_period: usize) -> Self {
        Self {
            fast: Ema::new(fast_period),
            slow: Ema::new(slow_period),
        }
    }

    pub fn from_config(config: &StrategyConfig) -> Self {
        Self::new(config.fast_period, config.slow_period)
    }

    /// Feed one close. `Some` once both averages are seeded.
    pub fn update(&mut self, close: f64) -> Option<TrendSignal> {
        let fast = self.fast.update(close);
        let slow = self.slow.update(close);
        Some(TrendSignal::new(fast?, slow?))
    }
}

pub struct Session<G: ExecutionGateway> {
    strategy: PositionStateMachine,
    trend: TrendSource,
    gateway: G,
}

impl<G: ExecutionGateway> Session<G> {
    pub fn new(config: StrategyConfig, gateway: G) -> Result<Self, StrategyError> {
        let strategy = PositionStateMachine::new(config)?;
        let trend = TrendSource::from_config(strategy.config());
        Ok(Self {
            strategy,
            trend,
            gateway,
        })
    }

    /// Process one bar and forward its intents to the gateway.
    ///
    /// State has already advanced when a gateway error is returned; the
    /// returned intents are the ones the strategy considers live.
    pub fn on_bar(&mut self, bar: &Bar) -> Result<Vec<OrderIntent>, G::Error> {
        let trend = if bar.is_sane() {
            self.trend.update(bar.close)
        } else {
            None
        };
        let intents = self.strategy.on_bar(bar, trend);
        dispatch(&mut self.gateway, &intents)?;
        Ok(intents)
    }

    pub fn on_order_event(&mut self, event: &OrderEvent) -> bool {
        self.strategy.on_order_event(event)
    }

    pub fn strategy(&self) -> &PositionStateMachine {
        &self.strategy
    }

    pub fn strategy_mut(&mut self) -> &mut PositionStateMachine {
        &mut self.strategy
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn gateway_mut(&mut self) -> &mut G {
        &mut self.gateway
    }

    pub fn into_gateway(self) -> G {
        self.gateway
    }
}
