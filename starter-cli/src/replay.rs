//! Replay of recorded closes and order events through a session.
//!
//! Input:
//! - closes CSV with columns `date,close[,split_factor]`
//! - optional JSONL event log, each line an order event plus `after_bar`
//!
//! Output is JSON lines: one per emitted intent, then one summary line.

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use starter_core::domain::{Bar, OrderEvent, OrderId, OrderIntent, SplitKind, SplitNotice};
use starter_core::engine::{ExecutionGateway, Session};
use starter_core::{StrategyConfig, StrategyState};
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
struct CloseRow {
    date: NaiveDate,
    close: f64,
    #[serde(default)]
    split_factor: Option<f64>,
}

impl From<CloseRow> for Bar {
    fn from(row: CloseRow) -> Self {
        let bar = Bar::new(row.date, row.close);
        match row.split_factor {
            Some(factor) => bar.with_split(SplitNotice {
                kind: SplitKind::Occurred,
                factor,
                reference_price: row.close,
            }),
            None => bar,
        }
    }
}

/// Parse closes from any CSV reader. Rows must already be in date order.
pub fn read_bars<R: io::Read>(reader: R) -> Result<Vec<Bar>> {
    let mut csv = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut bars: Vec<Bar> = Vec::new();
    for (i, row) in csv.deserialize::<CloseRow>().enumerate() {
        let row = row.with_context(|| format!("closes row {}", i + 1))?;
        if let Some(last) = bars.last() {
            if row.date <= last.date {
                anyhow::bail!(
                    "closes row {}: date {} is not after {}",
                    i + 1,
                    row.date,
                    last.date
                );
            }
        }
        bars.push(row.into());
    }
    Ok(bars)
}

pub fn load_bars(path: &Path) -> Result<Vec<Bar>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening closes file {}", path.display()))?;
    read_bars(file).with_context(|| format!("reading {}", path.display()))
}

/// An order event from the host log, delivered after bar `after_bar`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub after_bar: usize,
    #[serde(flatten)]
    pub event: OrderEvent,
}

/// Parse a JSONL event log. Blank lines are skipped; events are ordered by bar.
pub fn read_events<R: BufRead>(reader: R) -> Result<Vec<ScheduledEvent>> {
    let mut events = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let event: ScheduledEvent = serde_json::from_str(&line)
            .with_context(|| format!("events line {}", i + 1))?;
        events.push(event);
    }
    events.sort_by_key(|e| e.after_bar);
    Ok(events)
}

pub fn load_events(path: &Path) -> Result<Vec<ScheduledEvent>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening events file {}", path.display()))?;
    read_events(io::BufReader::new(file)).with_context(|| format!("reading {}", path.display()))
}

#[derive(Serialize)]
struct IntentLine<'a> {
    bar: usize,
    date: NaiveDate,
    #[serde(flatten)]
    intent: &'a OrderIntent,
}

/// Gateway that writes each intent as a JSON line tagged with its bar.
pub struct JsonLinesGateway<W: Write> {
    out: W,
    bar: usize,
    date: Option<NaiveDate>,
    written: usize,
}

impl<W: Write> JsonLinesGateway<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            bar: 0,
            date: None,
            written: 0,
        }
    }

    /// Tag subsequent intents with this bar.
    pub fn begin_bar(&mut self, index: usize, date: NaiveDate) {
        self.bar = index;
        self.date = Some(date);
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, intent: OrderIntent) -> io::Result<()> {
        let date = self
            .date
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "intent outside of a bar"))?;
        let line = IntentLine {
            bar: self.bar,
            date,
            intent: &intent,
        };
        serde_json::to_writer(&mut self.out, &line)?;
        self.out.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }
}

impl<W: Write> ExecutionGateway for JsonLinesGateway<W> {
    type Error = io::Error;

    fn submit_market_order(&mut self, id: OrderId, quantity: i64) -> io::Result<()> {
        self.emit(OrderIntent::SubmitMarket { id, quantity })
    }

    fn submit_stop_order(&mut self, id: OrderId, quantity: i64, stop_price: f64) -> io::Result<()> {
        self.emit(OrderIntent::SubmitStop {
            id,
            quantity,
            stop_price,
        })
    }

    fn update_stop_price(&mut self, id: OrderId, stop_price: f64) -> io::Result<()> {
        self.emit(OrderIntent::UpdateStop { id, stop_price })
    }

    fn cancel_order(&mut self, id: OrderId) -> io::Result<()> {
        self.emit(OrderIntent::Cancel { id })
    }
}

/// Final line of a replay.
#[derive(Debug, Serialize)]
pub struct ReplaySummary {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub symbol: String,
    pub config_fingerprint: String,
    pub bars: usize,
    pub intents: usize,
    pub events_applied: usize,
    pub stops_filled: usize,
    pub state: StrategyState,
}

/// Run every bar through a session, writing intents to `out`.
pub fn run_replay<W: Write>(
    config: StrategyConfig,
    bars: &[Bar],
    events: &[ScheduledEvent],
    out: W,
) -> Result<ReplaySummary> {
    let fingerprint = config.fingerprint();
    let symbol = config.symbol.clone();
    let mut session = Session::new(config, JsonLinesGateway::new(out))?;
    info!(%symbol, bars = bars.len(), events = events.len(), %fingerprint, "replay started");

    let mut pending = events.iter().peekable();
    let mut events_applied = 0;
    let mut stops_filled = 0;

    for (index, bar) in bars.iter().enumerate() {
        session.gateway_mut().begin_bar(index, bar.date);
        session
            .on_bar(bar)
            .with_context(|| format!("writing intents for {}", bar.date))?;

        while let Some(scheduled) = pending.next_if(|e| e.after_bar == index) {
            events_applied += 1;
            if session.on_order_event(&scheduled.event) {
                stops_filled += 1;
            } else {
                debug!(order_id = %scheduled.event.order_id, "event did not change position");
            }
        }
    }

    let leftover = pending.count();
    if leftover > 0 {
        warn!(leftover, "events scheduled after the last bar were not delivered");
    }

    let intents = session.gateway().written();
    let summary = ReplaySummary {
        kind: "summary",
        symbol,
        config_fingerprint: fingerprint,
        bars: bars.len(),
        intents,
        events_applied,
        stops_filled,
        state: session.strategy().snapshot(),
    };

    let mut out = session.into_gateway().into_inner();
    serde_json::to_writer(&mut out, &summary)?;
    out.write_all(b"\n")?;
    out.flush()?;
    info!(intents, stops_filled, "replay finished");
    Ok(summary)
}
