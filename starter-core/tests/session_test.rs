//! End-to-end tests for the session driver.
//!
//! A test harness plays the host: it feeds bars in order, watches the
//! resting stop, and delivers a fill event when a close crosses it.

use chrono::NaiveDate;
use starter_core::domain::{Bar, OrderEvent, OrderIntent, PositionSide, PreviousPosition};
use starter_core::engine::{RecordingGateway, Session};
use starter_core::StrategyConfig;

fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let base = NaiveDate::from_ymd_opt(2010, 1, 4).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| Bar::new(base + chrono::Duration::days(i as i64), c))
        .collect()
}

/// Rise for 150 bars, then fall for 150, with a small oscillation on top.
fn rise_then_fall() -> Vec<f64> {
    (0..300)
        .map(|i| {
            let wobble = (i as f64 * 0.7).sin();
            let trend = if i < 150 {
                100.0 + 0.5 * i as f64
            } else {
                175.0 - 0.8 * (i - 150) as f64
            };
            trend + wobble
        })
        .collect()
}

struct Replay {
    entries: Vec<(usize, i64)>,
    exits: Vec<usize>,
    emitted: Vec<OrderIntent>,
}

/// Run the bars, filling the resting stop whenever a close crosses it.
fn replay(session: &mut Session<RecordingGateway>, bars: &[Bar]) -> Replay {
    let mut entries = Vec::new();
    let mut exits = Vec::new();
    let mut emitted = Vec::new();

    for (i, bar) in bars.iter().enumerate() {
        let intents = session.on_bar(bar).unwrap();
        for intent in &intents {
            if let OrderIntent::SubmitMarket { quantity, .. } = intent {
                entries.push((i, *quantity));
            }
        }
        emitted.extend(intents);

        let strategy = session.strategy();
        let crossed = strategy.resting_stop().and_then(|stop| {
            let hit = match strategy.side() {
                PositionSide::Long => bar.close <= stop.stop_price,
                PositionSide::Short => bar.close >= stop.stop_price,
                PositionSide::Flat => false,
            };
            hit.then(|| OrderEvent::filled(stop.id, stop.stop_price))
        });
        if let Some(fill) = crossed {
            assert!(session.on_order_event(&fill));
            exits.push(i);
        }
    }

    Replay {
        entries,
        exits,
        emitted,
    }
}

#[test]
fn warm_up_emits_nothing() {
    let bars = make_bars(&rise_then_fall()[..64]);
    let mut session = Session::new(StrategyConfig::default(), RecordingGateway::default()).unwrap();
    for bar in &bars {
        assert!(session.on_bar(bar).unwrap().is_empty());
    }
    assert!(session.gateway().intents.is_empty());
}

#[test]
fn gateway_receives_every_intent_in_order() {
    let bars = make_bars(&rise_then_fall());
    let mut session = Session::new(StrategyConfig::default(), RecordingGateway::default()).unwrap();
    let run = replay(&mut session, &bars);
    assert!(!run.emitted.is_empty());
    assert_eq!(session.gateway().intents, run.emitted);
}

#[test]
fn uptrend_long_then_stop_then_short() {
    let bars = make_bars(&rise_then_fall());
    let mut session = Session::new(StrategyConfig::default(), RecordingGateway::default()).unwrap();
    let run = replay(&mut session, &bars);

    assert!(run.entries.len() >= 2, "entries: {:?}", run.entries);
    let (first_bar, first_qty) = run.entries[0];
    assert_eq!(first_bar, 64, "first live bar enters");
    assert!(first_qty > 0, "uptrend goes long");

    let first_exit = run.exits[0];
    assert!(first_exit > 150, "long survives the uptrend, exited at {first_exit}");

    let (second_bar, second_qty) = run.entries[1];
    assert!(second_bar > first_exit);
    assert!(second_qty < 0, "after a long stop-out only a short can follow");
}

#[test]
fn one_open_position_at_a_time() {
    let bars = make_bars(&rise_then_fall());
    let mut session = Session::new(StrategyConfig::default(), RecordingGateway::default()).unwrap();
    let run = replay(&mut session, &bars);

    // Every entry after the first is preceded by an exit.
    for pair in run.entries.windows(2) {
        let (prev_entry, _) = pair[0];
        let (next_entry, _) = pair[1];
        assert!(
            run.exits.iter().any(|&x| x >= prev_entry && x < next_entry),
            "entry at {next_entry} without an exit since {prev_entry}"
        );
    }
}

#[test]
fn previous_position_tracks_last_stop_out() {
    let bars = make_bars(&rise_then_fall());
    let mut session = Session::new(StrategyConfig::default(), RecordingGateway::default()).unwrap();

    let mut previous = PreviousPosition::None;
    for bar in &bars {
        session.on_bar(bar).unwrap();
        // Bars alone never change the remembered side.
        assert_eq!(session.strategy().previous_position(), previous);

        let side = session.strategy().side();
        let fill = session.strategy().resting_stop().and_then(|stop| {
            let hit = match side {
                PositionSide::Long => bar.close <= stop.stop_price,
                PositionSide::Short => bar.close >= stop.stop_price,
                PositionSide::Flat => false,
            };
            hit.then(|| OrderEvent::filled(stop.id, bar.close))
        });
        if let Some(fill) = fill {
            session.on_order_event(&fill);
            previous = PreviousPosition::from(side);
            assert_eq!(session.strategy().previous_position(), previous);
        }
    }
}

#[test]
fn invalid_config_is_rejected() {
    let config = StrategyConfig {
        fast_period: 64,
        slow_period: 16,
        ..Default::default()
    };
    assert!(Session::new(config, RecordingGateway::default()).is_err());
}

#[test]
fn zero_fast_period_is_rejected() {
    let config = StrategyConfig {
        fast_period: 0,
        ..Default::default()
    };
    assert!(Session::new(config, RecordingGateway::default()).is_err());
}
