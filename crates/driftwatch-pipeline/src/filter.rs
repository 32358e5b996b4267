//! Admission filtering of an incoming batch.

use std::collections::BTreeSet;

use driftwatch_core::{
  home::HomeRegistry,
  record::{BuoyId, BuoyRecord},
};
use tracing::warn;

/// The admitted remainder of a raw batch, plus what was dropped and who
/// transmitted.
#[derive(Debug, Clone)]
pub struct FilteredBatch {
  /// Records admitted to the log, in their original relative order.
  pub records: Vec<BuoyRecord>,
  /// Every buoy id present in the raw batch, including ids whose rows were
  /// all dropped. A buoy that transmitted pre-activation noise still
  /// transmitted, so silence detection works from this set.
  pub seen:    BTreeSet<BuoyId>,
  pub dropped_unknown:       usize,
  pub dropped_preactivation: usize,
}

/// Drop rows for unknown buoys and rows observed at or before the buoy's
/// activation time. Pure; never deduplicates against log history, since
/// admission idempotency belongs to the batch-consumption contract.
pub fn filter(raw: Vec<BuoyRecord>, registry: &HomeRegistry) -> FilteredBatch {
  let mut records = Vec::with_capacity(raw.len());
  let mut seen = BTreeSet::new();
  let mut dropped_unknown = 0;
  let mut dropped_preactivation = 0;

  for record in raw {
    seen.insert(record.buoy_id.clone());

    let Some(home) = registry.get(&record.buoy_id) else {
      warn!(buoy = %record.buoy_id, "dropping row for unknown buoy");
      dropped_unknown += 1;
      continue;
    };
    if record.observed_at <= home.activated_at {
      dropped_preactivation += 1;
      continue;
    }
    records.push(record);
  }

  FilteredBatch {
    records,
    seen,
    dropped_unknown,
    dropped_preactivation,
  }
}
