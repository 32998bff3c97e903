//! Bandscope
//!
//! Reports which 4G/5G band a modem is really on and what kind of 5G that
//! is, from recorded or live telemetry.
//!
//! - `classify` evaluates a single channel number
//! - `replay` and `watch` merge telemetry events per SIM slot
//! - `channel-config` summarises EN-DC / carrier aggregation from a radio log

mod config;
mod events;
mod output;
mod state;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use bandscope_core::channel_config::{summarize, ParseError};
use bandscope_core::{
    classify, ChannelConfigSummary, ChannelConfigUpdate, DataNetworkType, LogcatLine,
    OperatorInfo, OverrideNetworkType, ResolvedBand, TelemetrySnapshot,
};
use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use config::{MonitorConfig, OutputFormat};
use events::TelemetryEvent;
use state::{NetworkStatus, TelemetryTracker};

/// Radio log messages worth parsing.
const CHANNEL_CONFIG_MARKER: &str = "physical channel configs updated";

/// Cellular band and 5G type inspector.
#[derive(Parser, Debug)]
#[command(name = "bandscope", about = "Cellular band and 5G connection type inspector")]
struct Cli {
    /// TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format (overrides the config file).
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify a single serving cell.
    Classify(ClassifyArgs),
    /// Replay a JSON-lines telemetry recording.
    Replay {
        /// Recording, one telemetry event per line.
        file: PathBuf,
    },
    /// Read telemetry events from stdin and re-evaluate on every poll tick.
    Watch,
    /// Summarise EN-DC and carrier aggregation from a radio log dump.
    ChannelConfig {
        /// Log file, or `-` for stdin.
        input: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Rat {
    Lte,
    Nr,
}

#[derive(Args, Debug)]
struct ClassifyArgs {
    /// Radio technology of the serving cell.
    #[arg(long, value_enum)]
    rat: Rat,

    /// EARFCN (LTE) or NR-ARFCN (NR).
    #[arg(long)]
    channel: u32,

    /// PLMN of the registered operator, e.g. 44010.
    #[arg(long, conflicts_with_all = ["mcc", "mnc"])]
    plmn: Option<String>,

    #[arg(long, default_value = "")]
    mcc: String,

    #[arg(long, default_value = "")]
    mnc: String,

    /// Operator display name.
    #[arg(long, default_value = "")]
    operator_name: String,

    /// Band reported by the modem, e.g. n78.
    #[arg(long)]
    hint: Option<String>,

    /// Physical cell id.
    #[arg(long)]
    pci: Option<u32>,

    /// Status-bar override network type (none, lte-ca, lte-advanced-pro, nr-nsa, nr-advanced).
    #[arg(long = "override")]
    override_network_type: Option<OverrideNetworkType>,

    /// Data network type (lte, nr, other).
    #[arg(long)]
    data_network: Option<DataNetworkType>,

    /// NR signal strength is reported without an NR cell.
    #[arg(long, default_value_t = false)]
    nr_signal_only: bool,

    /// SIM slot shown in the output.
    #[arg(long, default_value_t = 0)]
    slot: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => MonitorConfig::default(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let format = cli.format.unwrap_or(config.format);
    tracing::debug!(
        config_version = config.version,
        ?format,
        poll_interval = ?config.polling.poll_interval,
        "bandscope starting"
    );

    match cli.command {
        Command::Classify(args) => run_classify(args, format),
        Command::Replay { file } => run_replay(&file, &config, format).await,
        Command::Watch => run_watch(&config, format).await,
        Command::ChannelConfig { input } => run_channel_config(&input, format).await,
    }
}

fn load_config(path: &Path) -> anyhow::Result<MonitorConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    MonitorConfig::from_toml_str(&text).with_context(|| format!("loading config {}", path.display()))
}

// ─── classify ───────────────────────────────────────────────────────────────

fn run_classify(args: ClassifyArgs, format: OutputFormat) -> anyhow::Result<()> {
    let operator = match &args.plmn {
        Some(plmn) => OperatorInfo::from_plmn(plmn, &args.operator_name)
            .with_context(|| format!("invalid PLMN {plmn:?}"))?,
        None => OperatorInfo {
            mcc: args.mcc,
            mnc: args.mnc,
            name: args.operator_name,
        },
    };

    let band = match args.rat {
        Rat::Lte => ResolvedBand::lte(args.channel, &operator.name, args.pci),
        Rat::Nr => {
            let hint = args.hint.map(|h| {
                if h.starts_with('n') {
                    h
                } else {
                    format!("n{h}")
                }
            });
            ResolvedBand::nr(&operator, args.channel, hint.as_deref(), args.pci)
        }
    };
    if !band.is_known() {
        tracing::warn!(channel = args.channel, rat = ?args.rat, "channel number matches no band");
    }

    let snapshot = TelemetrySnapshot {
        resolved_band: Some(band),
        override_network_type: args.override_network_type,
        has_nr_signal_strength_only: args.nr_signal_only,
        data_network_type: args.data_network,
    };
    let status = NetworkStatus {
        slot: args.slot,
        classification: classify(&snapshot),
        band: snapshot.resolved_band,
        data_slot: None,
    };
    println!("{}", output::render_status(&status, format)?);
    Ok(())
}

// ─── replay / watch ─────────────────────────────────────────────────────────

/// Parse and apply one JSON line. Malformed lines are logged and skipped.
fn ingest_line(
    tracker: &mut TelemetryTracker,
    line: &str,
    line_no: usize,
) -> Vec<NetworkStatus> {
    let line = line.trim();
    if line.is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<TelemetryEvent>(line) {
        Ok(event) => tracker.apply(&event),
        Err(e) => {
            tracing::warn!(line = line_no, error = %e, "skipping malformed telemetry event");
            Vec::new()
        }
    }
}

async fn run_replay(file: &Path, config: &MonitorConfig, format: OutputFormat) -> anyhow::Result<()> {
    let text = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("reading {}", file.display()))?;

    let mut tracker = TelemetryTracker::new(config.polling.stale_after);
    for (idx, line) in text.lines().enumerate() {
        for status in ingest_line(&mut tracker, line, idx + 1) {
            println!("{}", output::render_status(&status, format)?);
        }
    }
    for (slot, reading) in tracker.last_known() {
        tracing::info!(
            slot,
            at = %reading.at,
            final_type = %reading.status.classification.final_type,
            "last status"
        );
    }
    tracing::info!(slots = tracker.slot_count(), "replay finished");
    Ok(())
}

async fn run_watch(config: &MonitorConfig, format: OutputFormat) -> anyhow::Result<()> {
    let mut tracker = TelemetryTracker::new(config.polling.stale_after);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut poll = tokio::time::interval(config.polling.poll_interval);
    poll.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let mut line_no = 0;

    tracing::info!(poll_interval = ?config.polling.poll_interval, "watching stdin");
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("received SIGINT, shutting down");
                break;
            }
            line = lines.next_line() => {
                let Some(line) = line.context("reading stdin")? else {
                    tracing::info!("stdin closed");
                    break;
                };
                line_no += 1;
                for status in ingest_line(&mut tracker, &line, line_no) {
                    println!("{}", output::render_status(&status, format)?);
                }
            }
            _ = poll.tick() => {
                for status in tracker.tick(Utc::now()) {
                    println!("{}", output::render_status(&status, format)?);
                }
            }
        }
    }
    Ok(())
}

// ─── channel-config ─────────────────────────────────────────────────────────

async fn run_channel_config(input: &str, format: OutputFormat) -> anyhow::Result<()> {
    let text = if input == "-" {
        let mut buf = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .context("reading stdin")?;
        buf
    } else {
        tokio::fs::read_to_string(input)
            .await
            .with_context(|| format!("reading {input}"))?
    };

    let mut latest: BTreeMap<u32, ChannelConfigSummary> = BTreeMap::new();
    for (idx, line) in text.lines().enumerate() {
        if !line.to_ascii_lowercase().contains(CHANNEL_CONFIG_MARKER) {
            continue;
        }
        let message = LogcatLine::parse(line).map_or(line, |l| l.message);
        let update = match ChannelConfigUpdate::parse(message) {
            Ok(update) => update,
            Err(ParseError::NotAnUpdate) => continue,
            Err(e) => {
                tracing::warn!(line = idx + 1, error = %e, "skipping malformed channel config");
                continue;
            }
        };

        // An update without a usable primary cell keeps the previous summary.
        let Some(summary) = summarize(&update.configs, &[]) else {
            continue;
        };
        if latest.get(&update.phone_id) == Some(&summary) {
            continue;
        }
        println!("{}", output::render_summary(update.phone_id, &summary, format)?);
        latest.insert(update.phone_id, summary);
    }
    tracing::info!(phones = latest.len(), "channel config scan finished");
    Ok(())
}
