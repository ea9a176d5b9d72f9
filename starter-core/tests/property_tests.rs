//! Property tests for engine invariants.
//!
//! Uses proptest to verify:
//! 1. Volatility: non-negative, scales linearly with the returns
//! 2. Sizing monotonicity: fewer shares for more volatility, more for more capital/target
//! 3. Stop placement: long stops below the watermark, short stops above
//! 4. Watermark monotonicity: never falls while long, never rises while short
//! 5. State machine: previous side only changes on a stop fill; no entry while open

use chrono::NaiveDate;
use proptest::prelude::*;
use starter_core::domain::{Bar, OrderEvent, OrderIntent, PositionSide, TrendSignal};
use starter_core::indicators::ReturnSeries;
use starter_core::position_management::{
    stop_price_for_long, stop_price_for_short, HighWatermarkTracker,
};
use starter_core::sizers::volatility_target_shares;
use starter_core::{PositionStateMachine, StrategyConfig};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_returns() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-0.05..0.05_f64, 3..30)
}

fn arb_price() -> impl Strategy<Value = f64> {
    (10.0..500.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

fn arb_prices() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(arb_price(), 1..80)
}

/// Closes whose consecutive simple returns are `returns`.
fn prices_from_returns(returns: &[f64]) -> ReturnSeries {
    let mut series = ReturnSeries::new(returns.len() + 1);
    let mut price = 100.0;
    series.add_sample(price);
    for r in returns {
        price *= 1.0 + r;
        series.add_sample(price);
    }
    series
}

#[derive(Debug, Clone)]
enum Step {
    Bar { close: f64, trend: i8 },
    StopFill,
    EntryFill,
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        6 => (arb_price(), -1i8..=1).prop_map(|(close, trend)| Step::Bar { close, trend }),
        1 => Just(Step::StopFill),
        1 => Just(Step::EntryFill),
    ]
}

fn small_config() -> StrategyConfig {
    StrategyConfig {
        std_period: 5,
        fast_period: 2,
        slow_period: 6,
        ..Default::default()
    }
}

// ── 1. Volatility ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn volatility_is_non_negative(returns in arb_returns()) {
        let series = prices_from_returns(&returns);
        let vol = series.annualized_volatility().unwrap();
        prop_assert!(vol >= 0.0);
    }

    /// Scaling every return by k scales the estimate by k.
    #[test]
    fn volatility_scales_linearly(returns in arb_returns(), k in 0.1..5.0_f64) {
        let base = prices_from_returns(&returns).annualized_volatility().unwrap();
        let scaled: Vec<f64> = returns.iter().map(|r| r * k).collect();
        let vol = prices_from_returns(&scaled).annualized_volatility().unwrap();
        prop_assert!(
            (vol - k * base).abs() <= 1e-9 + 1e-6 * k * base,
            "vol={} k*base={}", vol, k * base
        );
    }
}

// ── 2. Sizing monotonicity ───────────────────────────────────────────

proptest! {
    #[test]
    fn size_decreases_with_volatility(
        capital in 1_000.0..10_000_000.0_f64,
        target in 0.01..1.0_f64,
        vol in 0.01..2.0_f64,
        bump in 1.0..3.0_f64,
        price in arb_price(),
    ) {
        let calm = volatility_target_shares(capital, target, vol, price);
        let wild = volatility_target_shares(capital, target, vol * bump, price);
        prop_assert!(wild <= calm);
    }

    #[test]
    fn size_increases_with_capital_and_target(
        capital in 1_000.0..10_000_000.0_f64,
        target in 0.01..1.0_f64,
        vol in 0.01..2.0_f64,
        bump in 1.0..3.0_f64,
        price in arb_price(),
    ) {
        let base = volatility_target_shares(capital, target, vol, price);
        prop_assert!(volatility_target_shares(capital * bump, target, vol, price) >= base);
        prop_assert!(volatility_target_shares(capital, target * bump, vol, price) >= base);
    }
}

// ── 3. Stop placement ────────────────────────────────────────────────

proptest! {
    #[test]
    fn stops_sit_on_the_protective_side(
        hw in arb_price(),
        vol in 0.001..2.0_f64,
        speed in 0.01..2.0_f64,
    ) {
        prop_assert!(stop_price_for_long(hw, vol, speed) < hw);
        prop_assert!(stop_price_for_short(hw, vol, speed) > hw);
    }
}

// ── 4. Watermark monotonicity ────────────────────────────────────────

proptest! {
    #[test]
    fn long_watermark_never_decreases(start in arb_price(), prices in arb_prices()) {
        let mut hw = HighWatermarkTracker::default();
        hw.update(start, PositionSide::Flat);
        for p in prices {
            let before = hw.level();
            prop_assert!(hw.update(p, PositionSide::Long) >= before);
        }
    }

    #[test]
    fn short_watermark_never_increases(start in arb_price(), prices in arb_prices()) {
        let mut hw = HighWatermarkTracker::default();
        hw.update(start, PositionSide::Flat);
        for p in prices {
            let before = hw.level();
            prop_assert!(hw.update(p, PositionSide::Short) <= before);
        }
    }
}

// ── 5. State machine ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn previous_side_only_changes_on_stop_fill(
        steps in prop::collection::vec(arb_step(), 1..120),
    ) {
        let base = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
        let mut sm = PositionStateMachine::new(small_config()).unwrap();
        let mut day = 0i64;

        for step in steps {
            let previous = sm.previous_position();
            let side = sm.side();
            match step {
                Step::Bar { close, trend } => {
                    let signal = Some(TrendSignal::new(100.0 + trend as f64, 100.0));
                    let bar = Bar::new(base + chrono::Duration::days(day), close);
                    day += 1;
                    let intents = sm.on_bar(&bar, signal);

                    prop_assert_eq!(sm.previous_position(), previous);
                    let entries = intents
                        .iter()
                        .filter(|i| matches!(i, OrderIntent::SubmitMarket { .. }))
                        .count();
                    prop_assert!(entries <= 1);
                    if !side.is_flat() {
                        prop_assert_eq!(entries, 0);
                        prop_assert_eq!(sm.side(), side);
                    }
                }
                Step::StopFill => {
                    let stop = sm.resting_stop().map(|s| (s.id, s.stop_price));
                    let exited = match stop {
                        Some((id, price)) => sm.on_order_event(&OrderEvent::filled(id, price)),
                        None => false,
                    };
                    prop_assert_eq!(exited, stop.is_some() && !side.is_flat());
                    if exited {
                        prop_assert_eq!(sm.side(), PositionSide::Flat);
                        prop_assert_eq!(sm.previous_position(), side.into());
                    } else {
                        prop_assert_eq!(sm.previous_position(), previous);
                    }
                }
                Step::EntryFill => {
                    if let Some(id) = sm.state().entry_order {
                        prop_assert!(!sm.on_order_event(&OrderEvent::filled(id, 100.0)));
                    }
                    prop_assert_eq!(sm.previous_position(), previous);
                    prop_assert_eq!(sm.side(), side);
                }
            }
        }
    }
}
