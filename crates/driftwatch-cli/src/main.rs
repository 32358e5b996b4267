//! `driftwatch` — one-shot buoy fleet monitor.
//!
//! Reads `driftwatch.toml` (or the path given with `--config`), ingests
//! any batches waiting in the spool directory, evaluates drift and silence
//! alerts, and refreshes the latest-position file for the map renderer.
//!
//! The external scheduler runs the binary periodically and must not start
//! two instances concurrently; a non-zero exit marks a failed run.

mod outbox;
mod settings;
mod spool;

use std::fs;

use anyhow::Context as _;
use chrono::Utc;
use clap::{Parser, Subcommand};
use driftwatch_core::home::HomeRegistry;
use driftwatch_pipeline::{AlertEngine, Pipeline};
use driftwatch_store_file::{CsvRecordLog, JsonAlertState, write_latest_view};
use outbox::OutboxNotifier;
use settings::Settings;
use spool::SpoolSource;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "driftwatch", about = "Drifting-buoy fleet monitor")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "driftwatch.toml")]
  config: std::path::PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Ingest pending batches, alert, and refresh the latest view (default).
  Run,
  /// Recompute the latest-position file from the existing log only.
  RebuildView,
}

fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings: Settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("DRIFTWATCH"))
    .build()
    .context("failed to read configuration")?
    .try_deserialize()
    .context("failed to deserialise Settings")?;

  match cli.command.unwrap_or(Command::Run) {
    Command::Run => run(&settings),
    Command::RebuildView => rebuild_view(&settings),
  }
}

/// Load and validate the home-position registry. Any failure here is a
/// configuration error and aborts before a single batch is touched.
fn load_registry(settings: &Settings) -> anyhow::Result<HomeRegistry> {
  let path = settings.home_path();
  let text = fs::read_to_string(&path)
    .with_context(|| format!("home registry {} not readable", path.display()))?;
  let rows = driftwatch_csv::read_homes(&text)
    .with_context(|| format!("home registry {} is malformed", path.display()))?;
  let registry = HomeRegistry::from_rows(rows)
    .with_context(|| format!("home registry {} is inconsistent", path.display()))?;
  info!(buoys = registry.len(), "home registry loaded");
  Ok(registry)
}

fn build_pipeline(
  settings: &Settings,
) -> anyhow::Result<Pipeline<CsvRecordLog, JsonAlertState>> {
  let registry = load_registry(settings)?;
  Ok(Pipeline::new(
    CsvRecordLog::new(settings.log_path()),
    JsonAlertState::new(settings.state_path()),
    registry,
    AlertEngine::new(settings.threshold_m),
  ))
}

fn run(settings: &Settings) -> anyhow::Result<()> {
  let mut pipeline = build_pipeline(settings)?;

  let mut source =
    SpoolSource::new(settings.spool_dir(), settings.processed_dir())
      .context("failed to open spool directory")?;
  let mut notifier =
    OutboxNotifier::new(settings.outbox_dir(), settings.recipient.clone())
      .context("failed to open outbox directory")?;

  let outcome = pipeline
    .run(&mut source, &mut notifier, Utc::now())
    .context("run aborted")?;

  if let Some(view) = &outcome.view {
    write_latest_view(&settings.latest_path(), view)
      .context("failed to write latest-position file")?;
    info!(buoys = view.len(), "latest view refreshed");
  }

  let summary = outcome.summary;
  info!(
    processed = summary.batches_processed,
    skipped = summary.batches_skipped,
    appended = summary.records_appended,
    dropped = summary.rows_dropped,
    alerts = summary.alerts_sent,
    "run complete"
  );
  Ok(())
}

fn rebuild_view(settings: &Settings) -> anyhow::Result<()> {
  let pipeline = build_pipeline(settings)?;
  let view = pipeline.rebuild_view().context("failed to rebuild view")?;
  write_latest_view(&settings.latest_path(), &view)
    .context("failed to write latest-position file")?;
  info!(buoys = view.len(), "latest view rebuilt");
  Ok(())
}
