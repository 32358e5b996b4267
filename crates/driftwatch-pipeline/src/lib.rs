//! The ingestion-reconciliation-alerting pipeline.
//!
//! Wires the admission filter, the alert engine, and the latest-view
//! reduction over any [`RecordStore`] / [`AlertStateStore`] pair. Transport
//! and notification stay behind the [`BatchSource`] and [`Notifier`]
//! traits; this crate never opens a file or a socket itself.
//!
//! A run is strictly sequential: each batch completes its
//! decode → filter → append → evaluate → persist-state → notify →
//! mark-consumed sequence before the next batch starts. The surrounding
//! orchestration must guarantee single-instance execution.

pub mod dispatch;
pub mod engine;
pub mod error;
pub mod filter;
pub mod source;


use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use driftwatch_core::{
  home::HomeRegistry,
  record::BuoyId,
  store::{AlertStateStore, RecordStore},
  view::LatestView,
};
use tracing::{info, warn};

pub use dispatch::Notifier;
pub use engine::{AlertEngine, DEFAULT_ALERT_THRESHOLD_M};
pub use error::{Error, Result};
pub use source::{BatchSource, RawBatch};

// ─── Run results ─────────────────────────────────────────────────────────────

/// Counters for one run, for operator logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
  pub batches_processed: usize,
  /// Batches skipped because their body failed to decode.
  pub batches_skipped:   usize,
  pub records_appended:  usize,
  pub rows_dropped:      usize,
  pub alerts_sent:       usize,
}

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
  pub summary: RunSummary,
  /// The freshly reduced latest-position view, present when at least one
  /// batch was processed. The caller hands it to the renderer/publication
  /// side.
  pub view:    Option<LatestView>,
}

// ─── Pipeline ────────────────────────────────────────────────────────────────

/// One fleet's processing pipeline for a single run.
pub struct Pipeline<R, A> {
  log:      R,
  state:    A,
  registry: HomeRegistry,
  engine:   AlertEngine,
}

impl<R, A> Pipeline<R, A>
where
  R: RecordStore,
  A: AlertStateStore,
{
  pub fn new(
    log: R,
    state: A,
    registry: HomeRegistry,
    engine: AlertEngine,
  ) -> Self {
    Self {
      log,
      state,
      registry,
      engine,
    }
  }

  /// Process everything `source` has pending, oldest batch first.
  ///
  /// A batch that fails to decode is skipped with a warning and the run
  /// continues; a log or state-store failure aborts the run immediately,
  /// leaving already-committed batches committed and the failing batch
  /// unconsumed so a restarted run picks it up again.
  pub fn run<S, N>(
    &mut self,
    source: &mut S,
    notifier: &mut N,
    now: DateTime<Utc>,
  ) -> Result<RunOutcome>
  where
    S: BatchSource,
    N: Notifier,
  {
    let mut alert_state =
      self.state.load().map_err(|e| Error::State(Box::new(e)))?;
    let batches = source
      .fetch()
      .map_err(|e| Error::Transport(Box::new(e)))?;

    if batches.is_empty() {
      info!("no new batches");
      return Ok(RunOutcome {
        summary: RunSummary::default(),
        view:    None,
      });
    }

    let mut summary = RunSummary::default();
    let mut reporting: BTreeSet<BuoyId> = BTreeSet::new();

    for batch in batches {
      let raw = match driftwatch_csv::read_reports(&batch.body) {
        Ok(raw) => raw,
        Err(err) => {
          warn!(batch = %batch.batch_id, %err, "skipping undecodable batch");
          summary.batches_skipped += 1;
          continue;
        }
      };

      let filtered = filter::filter(raw, &self.registry);
      if filtered.dropped_unknown + filtered.dropped_preactivation > 0 {
        info!(
          batch = %batch.batch_id,
          unknown = filtered.dropped_unknown,
          pre_activation = filtered.dropped_preactivation,
          "dropped rows during admission"
        );
      }

      self
        .log
        .append(&filtered.records)
        .map_err(|e| Error::Log(Box::new(e)))?;

      let events = self.engine.evaluate(
        &mut alert_state,
        &filtered,
        &self.registry,
        batch.arrived_at,
        now,
      );
      self
        .state
        .save(&alert_state)
        .map_err(|e| Error::State(Box::new(e)))?;

      summary.alerts_sent += dispatch::dispatch(&events, notifier);

      // Only now is the batch fully processed; a failure to acknowledge
      // means redelivery, which evaluate() tolerates.
      if let Err(err) = source.mark_consumed(&batch.batch_id) {
        warn!(batch = %batch.batch_id, %err, "failed to mark batch consumed");
      }

      reporting.extend(filtered.seen.iter().cloned());
      summary.batches_processed += 1;
      summary.records_appended += filtered.records.len();
      summary.rows_dropped +=
        filtered.dropped_unknown + filtered.dropped_preactivation;
      info!(
        batch = %batch.batch_id,
        appended = filtered.records.len(),
        "batch processed"
      );
    }

    let view = if summary.batches_processed > 0 {
      Some(self.build_view(&reporting)?)
    } else {
      None
    };

    Ok(RunOutcome { summary, view })
  }

  /// Reduce the full log to the latest-position view without ingesting
  /// anything. With no batch context, every known buoy present in the log
  /// counts as reporting.
  pub fn rebuild_view(&self) -> Result<LatestView> {
    self.build_view(&self.registry.known_ids())
  }

  fn build_view(&self, reporting: &BTreeSet<BuoyId>) -> Result<LatestView> {
    let records = self.log.scan().map_err(|e| Error::Log(Box::new(e)))?;
    Ok(LatestView::build(&records, &self.registry, reporting))
  }
}
