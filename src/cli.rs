//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};

use crate::adapters::csv_quote::CsvQuoteAdapter;
use crate::adapters::fear_greed::FearGreedAdapter;
use crate::adapters::fx::FxAdapter;
use crate::adapters::ini_config::IniConfigAdapter;
use crate::adapters::json_snapshot::JsonSnapshotAdapter;
use crate::adapters::telegram::TelegramAdapter;
use crate::adapters::yahoo_quote::YahooQuoteAdapter;
use crate::domain::analysis::{self, Batch, FxRate, FxSource, InstrumentClass};
use crate::domain::bar::BarSeries;
use crate::domain::config_validation::{build_app_config, AppConfig};
use crate::domain::error::TiercastError;
use crate::domain::gate::{self, GateDecision};
use crate::domain::report;
use crate::domain::snapshot::Snapshot;
use crate::ports::chat_port::ChatPort;
use crate::ports::fx_port::FxRatePort;
use crate::ports::quote_port::QuotePort;
use crate::ports::sentiment_port::SentimentIndexPort;
use crate::ports::snapshot_port::SnapshotPort;

#[derive(Parser, Debug)]
#[command(name = "tiercast", about = "Regime-aware tiered limit-order ladder advisor")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one analysis batch
    Run {
        #[arg(short, long)]
        config: PathBuf,
        /// Override the snapshot path from the config
        #[arg(long)]
        snapshot: Option<PathBuf>,
        /// Read bars from CSV files in this directory instead of the
        /// live quote provider
        #[arg(long)]
        csv_dir: Option<PathBuf>,
        /// Compute and persist but never deliver
        #[arg(long)]
        no_send: bool,
        /// Deliver even when nothing changed since the last snapshot
        #[arg(long)]
        force: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Run {
            config,
            snapshot,
            csv_dir,
            no_send,
            force,
        } => run_once(&config, snapshot.as_ref(), csv_dir.as_ref(), no_send, force),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<IniConfigAdapter, ExitCode> {
    IniConfigAdapter::from_file(path).map_err(|e| {
        let err = TiercastError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn run_once(
    config_path: &PathBuf,
    snapshot_override: Option<&PathBuf>,
    csv_dir: Option<&PathBuf>,
    no_send: bool,
    force: bool,
) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let mut app = match build_app_config(&adapter) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if let Some(path) = snapshot_override {
        app.snapshot_path = path.display().to_string();
    }

    let yahoo;
    let csv;
    let quotes: &dyn QuotePort = match csv_dir {
        Some(dir) => {
            csv = CsvQuoteAdapter::new(dir);
            &csv
        }
        None => {
            yahoo = match YahooQuoteAdapter::new() {
                Ok(a) => a,
                Err(e) => {
                    eprintln!("error: {e}");
                    return (&e).into();
                }
            };
            &yahoo
        }
    };

    let has_crypto = app
        .instruments
        .iter()
        .any(|i| i.class == InstrumentClass::Crypto);
    let fear_greed;
    let sentiment: Option<&dyn SentimentIndexPort> = if has_crypto {
        match FearGreedAdapter::new() {
            Ok(a) => {
                fear_greed = a;
                Some(&fear_greed)
            }
            Err(e) => {
                warn!("sentiment index unavailable: {e}");
                None
            }
        }
    } else {
        None
    };

    let fx = match FxAdapter::new() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let telegram;
    let chat: Option<&dyn ChatPort> = if app.telegram_enabled && !no_send {
        match TelegramAdapter::from_env() {
            Ok(Some(a)) => {
                telegram = a;
                Some(&telegram)
            }
            Ok(None) => {
                warn!("chat credentials absent, delivery disabled");
                None
            }
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        }
    } else {
        None
    };

    let snapshots = JsonSnapshotAdapter::new(&app.snapshot_path);

    let ports = BatchPorts {
        quotes,
        sentiment,
        fx: &fx,
        chat,
        snapshots: &snapshots,
    };
    match run_batch(&app, &ports, force) {
        Ok(summary) => {
            println!("{}", summary.message);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let app = match build_app_config(&adapter) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("\nInstruments:");
    for spec in &app.instruments {
        eprintln!(
            "  {} ({}, {}, tick {:?})",
            spec.name, spec.symbol, spec.class, spec.tick
        );
    }
    eprintln!("\nFX pair: {}/{}", app.fx.base, app.fx.quote);
    eprintln!("Snapshot: {}", app.snapshot_path);
    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

/// Collaborators for one batch run. Optional ports degrade gracefully:
/// no sentiment port means RSI-derived sentiment everywhere, no chat
/// port means the message is computed but not delivered.
pub struct BatchPorts<'a> {
    pub quotes: &'a dyn QuotePort,
    pub sentiment: Option<&'a dyn SentimentIndexPort>,
    pub fx: &'a dyn FxRatePort,
    pub chat: Option<&'a dyn ChatPort>,
    pub snapshots: &'a dyn SnapshotPort,
}

#[derive(Debug)]
pub struct RunSummary {
    pub message: String,
    pub decision: GateDecision,
    pub sent: bool,
    pub analyzed: usize,
    pub skipped: usize,
}

/// Runs one full batch: prior snapshot, per-instrument analysis, gate,
/// optional delivery, snapshot rewrite.
///
/// Instrument-level failures are logged and skipped so one bad feed
/// never takes down the batch. The snapshot is rewritten even when the
/// gate suppresses delivery.
pub fn run_batch(
    app: &AppConfig,
    ports: &BatchPorts,
    force: bool,
) -> Result<RunSummary, TiercastError> {
    let prior = match ports.snapshots.load() {
        Ok(p) => p,
        Err(e) => {
            warn!("ignoring unreadable snapshot: {e}");
            None
        }
    };

    let external_sentiment = ports.sentiment.and_then(|port| match port.fetch_index() {
        Ok(v) => Some(v),
        Err(e) => {
            warn!("sentiment index fetch failed: {e}");
            None
        }
    });

    let mut results = Vec::with_capacity(app.instruments.len());
    let mut skipped = 0usize;
    for spec in &app.instruments {
        let was_oversold = prior
            .as_ref()
            .is_some_and(|s| s.was_oversold(&spec.name));

        let outcome = ports
            .quotes
            .fetch_daily(&spec.symbol, app.engine.lookback_days)
            .and_then(|bars| BarSeries::new(&spec.symbol, bars))
            .map(|series| match app.engine.period {
                Some(period) => series.resample(period),
                None => series,
            })
            .and_then(|series| {
                analysis::analyze_instrument(
                    spec,
                    &series,
                    &app.engine.params,
                    external_sentiment,
                    was_oversold,
                )
            });

        match outcome {
            Ok(result) => results.push(result),
            Err(e) if e.is_recoverable() => {
                warn!("skipping {}: {e}", spec.name);
                skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    let fx = ports
        .fx
        .fetch_rate(&app.fx.base, &app.fx.quote)
        .unwrap_or_else(|e| {
            warn!("FX providers failed, using configured default: {e}");
            FxRate {
                pair: format!("{}/{}", app.fx.base, app.fx.quote),
                value: app.fx.default_rate,
                source: FxSource::Default,
            }
        });

    let batch = Batch {
        results,
        fx,
        generated_at: chrono::Utc::now(),
    };

    let decision = gate::decide(&batch, prior.as_ref());
    let message = report::render_message(&batch);

    let deliver = (decision.notify || force) && !batch.results.is_empty();
    let sent = match (deliver, ports.chat) {
        (true, Some(chat)) => match chat.send_text(&message) {
            Ok(()) => true,
            Err(e) => {
                // Delivery is best effort; the snapshot must still land.
                warn!("delivery failed: {e}");
                false
            }
        },
        _ => false,
    };

    ports.snapshots.store(&Snapshot::from_batch(&batch))?;

    info!(
        analyzed = batch.results.len(),
        skipped,
        state = ?decision.state,
        sent,
        "batch complete"
    );

    Ok(RunSummary {
        message,
        decision,
        sent,
        analyzed: batch.results.len(),
        skipped,
    })
}
