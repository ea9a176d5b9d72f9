//! Starter CLI: replay daily closes through the trend-following engine.
//!
//! Commands:
//! - `run`: feed a closes CSV (and optionally a recorded order-event log)
//!   through a session and print every order intent as a JSON line
//! - `config`: print the default configuration as TOML

mod replay;

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use starter_core::StrategyConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "starter",
    about = "Starter CLI: volatility-targeted trend-following position manager"
)]
struct Cli {
    /// Log level when RUST_LOG is not set (logs go to stderr).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay closes and order events, printing order intents as JSON lines.
    Run {
        /// CSV with columns date,close[,split_factor].
        #[arg(long)]
        data: PathBuf,

        /// JSONL order-event log; each line carries `after_bar`.
        #[arg(long)]
        events: Option<PathBuf>,

        /// Path to a TOML config file. Missing keys take their defaults.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override capital at risk.
        #[arg(long)]
        capital: Option<f64>,

        /// Override target annualized volatility (e.g. 0.12).
        #[arg(long)]
        target_volatility: Option<f64>,

        /// Override trading speed factor for the trailing stop.
        #[arg(long)]
        speed: Option<f64>,
    },
    /// Print the default configuration as TOML.
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match cli.command {
        Commands::Run {
            data,
            events,
            config,
            capital,
            target_volatility,
            speed,
        } => {
            let overrides = Overrides {
                capital,
                target_volatility,
                speed,
            };
            run_cmd(data, events, config, overrides)
        }
        Commands::Config => {
            print!("{}", StrategyConfig::default().to_toml()?);
            Ok(())
        }
    }
}

fn init_logging(log_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

#[derive(Debug, Default)]
struct Overrides {
    capital: Option<f64>,
    target_volatility: Option<f64>,
    speed: Option<f64>,
}

impl Overrides {
    fn apply(self, config: &mut StrategyConfig) {
        if let Some(capital) = self.capital {
            config.capital = capital;
        }
        if let Some(tv) = self.target_volatility {
            config.target_volatility = tv;
        }
        if let Some(speed) = self.speed {
            config.trading_speed_factor = speed;
        }
    }
}

fn build_config(path: Option<PathBuf>, overrides: Overrides) -> Result<StrategyConfig> {
    let mut config = match path {
        Some(path) => StrategyConfig::from_file(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => StrategyConfig::default(),
    };
    overrides.apply(&mut config);
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn run_cmd(
    data: PathBuf,
    events: Option<PathBuf>,
    config_path: Option<PathBuf>,
    overrides: Overrides,
) -> Result<()> {
    let config = build_config(config_path, overrides)?;
    let bars = replay::load_bars(&data)?;
    let events = match events {
        Some(path) => replay::load_events(&path)?,
        None => Vec::new(),
    };

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    replay::run_replay(config, &bars, &events, &mut out)?;
    out.flush()?;
    Ok(())
}
