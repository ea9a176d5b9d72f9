//! Position state machine: FLAT / LONG / SHORT with a volatility trailing stop.
//!
//! Per bar, in order:
//! 1. Append the close to the return window.
//! 2. Skip the bar while warming up.
//! 3. Update the high watermark for the current side.
//! 4. Look up the transition for `(side, previous, trend)` and act on it:
//!    size and place an entry with its stop, or move the resting stop.
//!
//! Order events are handled separately. Only a fill of the resting stop
//! changes state: the position goes flat and remembers which side it held.

use tracing::{debug, info, warn};

use crate::config::StrategyConfig;
use crate::domain::{
    Bar, OrderEvent, OrderIntent, OrderStatus, PositionSide, PreviousPosition, RestingStop,
    SplitKind, TrendRelation, TrendSignal,
};
use crate::engine::decision::{decide, Transition};
use crate::engine::state::StrategyState;
use crate::error::StrategyError;
use crate::indicators::VolatilityEstimator;
use crate::position_management::StopCalculator;
use crate::sizers::VolTargetSizer;

#[derive(Debug, Clone)]
pub struct PositionStateMachine {
    config: StrategyConfig,
    capital: f64,
    estimator: VolatilityEstimator,
    sizer: VolTargetSizer,
    stops: StopCalculator,
    state: StrategyState,
}

impl PositionStateMachine {
    pub fn new(config: StrategyConfig) -> Result<Self, StrategyError> {
        config.validate()?;
        let state = StrategyState::initial(&config);
        Self::restore(config, state)
    }

    /// Rebuild a strategy from a previously taken snapshot.
    pub fn restore(config: StrategyConfig, state: StrategyState) -> Result<Self, StrategyError> {
        config.validate()?;
        if state.returns.capacity() != config.std_period {
            return Err(StrategyError::Config(format!(
                "snapshot return window holds {} closes, config expects {}",
                state.returns.capacity(),
                config.std_period
            )));
        }
        if state.returns.len() > state.returns.capacity() {
            return Err(StrategyError::Config(format!(
                "snapshot return window holds {} closes, more than its capacity {}",
                state.returns.len(),
                state.returns.capacity()
            )));
        }
        if state.warmup.warmup_bars() != config.warmup_bars() {
            return Err(StrategyError::Config(format!(
                "snapshot warm-up is {} bars, config expects {}",
                state.warmup.warmup_bars(),
                config.warmup_bars()
            )));
        }
        Ok(Self {
            capital: config.capital,
            estimator: VolatilityEstimator::from_config(&config),
            sizer: VolTargetSizer::new(config.target_volatility),
            stops: StopCalculator::new(config.trading_speed_factor),
            config,
            state,
        })
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    pub fn state(&self) -> &StrategyState {
        &self.state
    }

    pub fn snapshot(&self) -> StrategyState {
        self.state.clone()
    }

    pub fn side(&self) -> PositionSide {
        self.state.side
    }

    pub fn previous_position(&self) -> PreviousPosition {
        self.state.previous
    }

    pub fn high_watermark(&self) -> f64 {
        self.state.high_watermark.level()
    }

    pub fn resting_stop(&self) -> Option<&RestingStop> {
        self.state.stop.as_ref()
    }

    pub fn capital(&self) -> f64 {
        self.capital
    }

    /// Capital at risk used to size the next entry.
    pub fn set_capital(&mut self, capital: f64) {
        self.capital = capital;
    }

    /// True once warm-up is over and the return window is full.
    pub fn is_warm(&self) -> bool {
        self.state.warmup.is_warm() && self.state.returns.is_full()
    }

    /// Volatility of the current return window, clamped per config.
    pub fn volatility(&self) -> Result<f64, StrategyError> {
        self.estimator.estimate(&self.state.returns)
    }

    /// Process one bar. `trend` is `None` while the trend source is not ready.
    pub fn on_bar(&mut self, bar: &Bar, trend: Option<TrendSignal>) -> Vec<OrderIntent> {
        if let Some(split) = &bar.split {
            match split.kind {
                SplitKind::Warning => warn!(
                    symbol = %self.config.symbol,
                    date = %bar.date,
                    "split announced for next session; position is not adjusted"
                ),
                SplitKind::Occurred => warn!(
                    symbol = %self.config.symbol,
                    date = %bar.date,
                    factor = split.factor,
                    reference_price = split.reference_price,
                    "split occurred; position is not adjusted"
                ),
            }
        }

        if !bar.is_sane() {
            warn!(date = %bar.date, close = bar.close, "skipping bar with unusable close");
            return Vec::new();
        }

        self.state.returns.add_sample(bar.close);
        let warming = !self.state.warmup.is_warm();
        self.state.warmup.process_bar();
        if warming || !self.state.returns.is_full() {
            return Vec::new();
        }

        self.state
            .high_watermark
            .update(bar.close, self.state.side);

        let relation = trend
            .map(|t| t.relation())
            .unwrap_or(TrendRelation::Neutral);

        match decide(self.state.side, self.state.previous, relation) {
            Transition::Hold => Vec::new(),
            Transition::EnterLong => self.enter(PositionSide::Long, bar),
            Transition::EnterShort => self.enter(PositionSide::Short, bar),
            Transition::TrailStop => self.trail_stop(bar),
        }
    }

    /// Handle an order event from the gateway.
    ///
    /// Returns true if the event was the resting stop filling, which closes
    /// the position. Every other event is ignored.
    pub fn on_order_event(&mut self, event: &OrderEvent) -> bool {
        if let Err(reason) = self.stop_fill_check(event) {
            let stop_lost = event.status.is_terminal()
                && self.state.stop.as_ref().is_some_and(|s| s.id == event.order_id);
            if stop_lost {
                warn!(
                    symbol = %self.config.symbol,
                    order_id = %event.order_id,
                    status = ?event.status,
                    "resting stop ended without a fill; position is unprotected"
                );
            } else {
                debug!(order_id = %event.order_id, status = ?event.status, %reason, "order event ignored");
            }
            return false;
        }

        let closed = self.state.side;
        info!(
            symbol = %self.config.symbol,
            side = ?closed,
            fill_price = ?event.fill_price,
            "stop triggered"
        );
        self.state.previous = PreviousPosition::from(closed);
        self.state.side = PositionSide::Flat;
        self.state.stop = None;
        self.state.entry_order = None;
        true
    }

    fn stop_fill_check(&self, event: &OrderEvent) -> Result<(), StrategyError> {
        let stop = self.state.stop.as_ref().ok_or_else(|| {
            StrategyError::InvalidOrderState("no resting stop".into())
        })?;
        if event.order_id != stop.id {
            let what = if Some(event.order_id) == self.state.entry_order {
                "entry order"
            } else {
                "unknown or stale order"
            };
            return Err(StrategyError::InvalidOrderState(what.into()));
        }
        if event.status != OrderStatus::Filled {
            return Err(StrategyError::InvalidOrderState(format!(
                "stop not filled ({:?})",
                event.status
            )));
        }
        if self.state.side.is_flat() {
            return Err(StrategyError::InvalidOrderState(
                "stop filled while flat".into(),
            ));
        }
        Ok(())
    }

    fn enter(&mut self, side: PositionSide, bar: &Bar) -> Vec<OrderIntent> {
        let volatility = match self.volatility() {
            Ok(v) => v,
            Err(e) => {
                warn!(date = %bar.date, error = %e, "entry skipped");
                return Vec::new();
            }
        };

        let shares = self.sizer.size(self.capital, volatility, bar.close);
        if shares <= 0 {
            warn!(
                date = %bar.date,
                capital = self.capital,
                volatility,
                close = bar.close,
                "entry skipped: position sizes to zero shares"
            );
            return Vec::new();
        }

        let watermark = self.state.high_watermark.level();
        let Some(stop_price) = self.stops.stop_for(side, watermark, volatility) else {
            return Vec::new();
        };

        let mut intents = Vec::with_capacity(3);
        if let Some(stale) = self.state.stop.take() {
            debug!(order_id = %stale.id, "cancelling stale stop before entry");
            intents.push(OrderIntent::Cancel { id: stale.id });
        }

        let quantity = side.direction() * shares;
        let entry_id = self.state.ids.next_id();
        let stop_id = self.state.ids.next_id();
        intents.push(OrderIntent::SubmitMarket {
            id: entry_id,
            quantity,
        });
        intents.push(OrderIntent::SubmitStop {
            id: stop_id,
            quantity: -quantity,
            stop_price,
        });

        info!(
            symbol = %self.config.symbol,
            date = %bar.date,
            side = ?side,
            close = bar.close,
            shares,
            volatility,
            stop_price,
            "entering position"
        );

        self.state.side = side;
        self.state.entry_order = Some(entry_id);
        self.state.stop = Some(RestingStop {
            id: stop_id,
            quantity: -quantity,
            stop_price,
        });
        intents
    }

    fn trail_stop(&mut self, bar: &Bar) -> Vec<OrderIntent> {
        let side = self.state.side;
        let watermark = self.state.high_watermark.level();
        let Some(stop) = self.state.stop.as_mut() else {
            debug!(side = ?side, "no resting stop to trail");
            return Vec::new();
        };

        let volatility = match self.estimator.estimate(&self.state.returns) {
            Ok(v) => v,
            Err(e) => {
                warn!(date = %bar.date, error = %e, "stop update skipped");
                return Vec::new();
            }
        };
        let Some(stop_price) = self.stops.stop_for(side, watermark, volatility) else {
            return Vec::new();
        };

        debug!(date = %bar.date, order_id = %stop.id, watermark, stop_price, "trailing stop");
        stop.stop_price = stop_price;
        vec![OrderIntent::UpdateStop {
            id: stop.id,
            stop_price,
        }]
    }
}
