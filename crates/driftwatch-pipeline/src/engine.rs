//! The stateful alert evaluator.
//!
//! Each buoy carries two independent state machines, one per
//! [`AlertCondition`]: `Nominal` (condition absent from [`AlertState`]) and
//! `Alerting` (present). Arming emits an event; staying armed is a no-op,
//! so one continuous excursion produces exactly one notification.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use driftwatch_core::{
  alert::{AlertCondition, AlertEvent, AlertState},
  distance::haversine_m,
  home::HomeRegistry,
  record::{BuoyId, BuoyRecord},
};
use tracing::info;

use crate::filter::FilteredBatch;

/// Drift distance above which a buoy is considered off-station.
pub const DEFAULT_ALERT_THRESHOLD_M: f64 = 50.0;

/// Evaluates one batch against home positions and the persisted alert
/// state. Holds no per-run state itself; everything stateful lives in the
/// [`AlertState`] passed to [`AlertEngine::evaluate`].
#[derive(Debug, Clone)]
pub struct AlertEngine {
  threshold_m: f64,
}

impl Default for AlertEngine {
  fn default() -> Self {
    Self {
      threshold_m: DEFAULT_ALERT_THRESHOLD_M,
    }
  }
}

impl AlertEngine {
  pub fn new(threshold_m: f64) -> Self { Self { threshold_m } }

  /// Evaluate `batch`, mutating `state` and returning the events for the
  /// nominal → alerting transitions that occurred.
  ///
  /// `batch_time` is the batch's external arrival timestamp (quoted in
  /// silence notifications); `now` becomes `first_alerted_at` for newly
  /// armed conditions.
  pub fn evaluate(
    &self,
    state: &mut AlertState,
    batch: &FilteredBatch,
    registry: &HomeRegistry,
    batch_time: DateTime<Utc>,
    now: DateTime<Utc>,
  ) -> Vec<AlertEvent> {
    let mut events = Vec::new();

    // ── Drift ─────────────────────────────────────────────────────────
    for (buoy_id, record) in current_positions(&batch.records) {
      let Some(home) = registry.get(buoy_id) else {
        // The filter admits only known buoys; nothing to measure against.
        continue;
      };
      let distance_m = haversine_m(
        home.latitude,
        home.longitude,
        record.latitude,
        record.longitude,
      );

      if distance_m > self.threshold_m {
        if state.arm(buoy_id, AlertCondition::Drift, now) {
          events.push(AlertEvent::Drift {
            buoy_id:     buoy_id.clone(),
            distance_m,
            home:        (home.latitude, home.longitude),
            position:    (record.latitude, record.longitude),
            observed_at: record.observed_at,
          });
        }
      } else if state.clear(buoy_id, AlertCondition::Drift) {
        info!(buoy = %buoy_id, distance_m, "buoy back within threshold");
      }
    }

    // ── Silence ───────────────────────────────────────────────────────
    for buoy_id in registry.known_ids() {
      if batch.seen.contains(&buoy_id) {
        if state.clear(&buoy_id, AlertCondition::Silence) {
          info!(buoy = %buoy_id, "buoy transmitting again");
        }
      } else if state.arm(&buoy_id, AlertCondition::Silence, now) {
        events.push(AlertEvent::Silence {
          buoy_id,
          batch_time,
        });
      }
    }

    events
  }
}

/// The batch's current position per buoy: the record with the greatest
/// `observed_at`, later rows winning ties.
fn current_positions(
  records: &[BuoyRecord],
) -> BTreeMap<&BuoyId, &BuoyRecord> {
  let mut current: BTreeMap<&BuoyId, &BuoyRecord> = BTreeMap::new();
  for record in records {
    match current.get(&record.buoy_id) {
      Some(kept) if kept.observed_at > record.observed_at => {}
      _ => {
        current.insert(&record.buoy_id, record);
      }
    }
  }
  current
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;
  use driftwatch_core::{home::HomePosition, record::BatteryState};

  use super::*;
  use crate::filter::filter;

  fn at(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, minute, 0).unwrap()
  }

  fn registry(ids: &[&str]) -> HomeRegistry {
    HomeRegistry::from_rows(
      ids
        .iter()
        .map(|id| HomePosition {
          buoy_id:      BuoyId::new(id),
          latitude:     54.0,
          longitude:    8.0,
          activated_at: at(0),
        })
        .collect(),
    )
    .unwrap()
  }

  fn report(id: &str, minute: u32, latitude: f64) -> BuoyRecord {
    BuoyRecord {
      buoy_id:     BuoyId::new(id),
      observed_at: at(minute),
      latitude,
      longitude:   8.0,
      battery:     BatteryState::Good,
    }
  }

  fn batch(
    registry: &HomeRegistry,
    records: Vec<BuoyRecord>,
  ) -> FilteredBatch {
    filter(records, registry)
  }

  #[test]
  fn drift_alert_fires_once_per_excursion() {
    let registry = registry(&["D1"]);
    let engine = AlertEngine::default();
    let mut state = AlertState::default();

    // 54.0005 vs home 54.0000 is ~55.6 m, past the 50 m threshold.
    let events = engine.evaluate(
      &mut state,
      &batch(&registry, vec![report("D1", 10, 54.0005)]),
      &registry,
      at(10),
      at(10),
    );
    assert_eq!(events.len(), 1);
    let AlertEvent::Drift { distance_m, .. } = &events[0] else {
      panic!("expected drift event");
    };
    assert!((distance_m - 55.6).abs() < 0.5);

    // Still out: no second notification.
    let events = engine.evaluate(
      &mut state,
      &batch(&registry, vec![report("D1", 20, 54.0005)]),
      &registry,
      at(20),
      at(20),
    );
    assert!(events.is_empty());
    assert!(state.is_armed(&BuoyId::new("D1"), AlertCondition::Drift));

    // Back home: state clears silently.
    let events = engine.evaluate(
      &mut state,
      &batch(&registry, vec![report("D1", 30, 54.0)]),
      &registry,
      at(30),
      at(30),
    );
    assert!(events.is_empty());
    assert!(state.is_empty());

    // A fresh excursion notifies again.
    let events = engine.evaluate(
      &mut state,
      &batch(&registry, vec![report("D1", 40, 54.0005)]),
      &registry,
      at(40),
      at(40),
    );
    assert_eq!(events.len(), 1);
  }

  #[test]
  fn silence_alert_fires_once_and_clears_on_reappearance() {
    let registry = registry(&["D1", "D2"]);
    let engine = AlertEngine::default();
    let mut state = AlertState::default();

    // D2 missing from the batch.
    let events = engine.evaluate(
      &mut state,
      &batch(&registry, vec![report("D1", 10, 54.0)]),
      &registry,
      at(10),
      at(10),
    );
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].condition(), AlertCondition::Silence);
    assert_eq!(events[0].buoy_id(), &BuoyId::new("D2"));

    // Still missing: no repeat.
    let events = engine.evaluate(
      &mut state,
      &batch(&registry, vec![report("D1", 20, 54.0)]),
      &registry,
      at(20),
      at(20),
    );
    assert!(events.is_empty());

    // Reappears: silence clears, no event.
    let events = engine.evaluate(
      &mut state,
      &batch(&registry, vec![report("D1", 30, 54.0), report("D2", 30, 54.0)]),
      &registry,
      at(30),
      at(30),
    );
    assert!(events.is_empty());
    assert!(state.is_empty());
  }

  #[test]
  fn drift_and_silence_arm_independently() {
    let registry = registry(&["D1"]);
    let engine = AlertEngine::default();
    let mut state = AlertState::default();

    // Drifted, then silent: both conditions end up armed, one event each.
    let events = engine.evaluate(
      &mut state,
      &batch(&registry, vec![report("D1", 10, 54.0005)]),
      &registry,
      at(10),
      at(10),
    );
    assert_eq!(events.len(), 1);

    let events = engine.evaluate(
      &mut state,
      &batch(&registry, vec![]),
      &registry,
      at(20),
      at(20),
    );
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].condition(), AlertCondition::Silence);

    let buoy = BuoyId::new("D1");
    assert!(state.is_armed(&buoy, AlertCondition::Drift));
    assert!(state.is_armed(&buoy, AlertCondition::Silence));

    // It comes back on station: both clear, still no events.
    let events = engine.evaluate(
      &mut state,
      &batch(&registry, vec![report("D1", 30, 54.0)]),
      &registry,
      at(30),
      at(30),
    );
    assert!(events.is_empty());
    assert!(state.is_empty());
  }

  #[test]
  fn replaying_a_batch_does_not_double_alert() {
    let registry = registry(&["D1", "D2"]);
    let engine = AlertEngine::default();
    let mut state = AlertState::default();

    let records = vec![report("D1", 10, 54.0005)];
    let first = engine.evaluate(
      &mut state,
      &batch(&registry, records.clone()),
      &registry,
      at(10),
      at(10),
    );
    assert_eq!(first.len(), 2); // drift for D1, silence for D2

    // Crash before consumption-marking: the same batch arrives again.
    let replay = engine.evaluate(
      &mut state,
      &batch(&registry, records),
      &registry,
      at(10),
      at(15),
    );
    assert!(replay.is_empty());
  }

  #[test]
  fn latest_record_in_batch_decides_drift() {
    let registry = registry(&["D1"]);
    let engine = AlertEngine::default();
    let mut state = AlertState::default();

    // An older off-station fix followed by a newer on-station one: the
    // newer position wins and no alert fires.
    let events = engine.evaluate(
      &mut state,
      &batch(
        &registry,
        vec![report("D1", 10, 54.0005), report("D1", 20, 54.0)],
      ),
      &registry,
      at(20),
      at(20),
    );
    assert!(events.is_empty());
    assert!(state.is_empty());
  }
}
