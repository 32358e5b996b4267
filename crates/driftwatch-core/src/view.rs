//! The latest-position view — the computed read model for one buoy fleet.
//!
//! Never stored incrementally, always derived: the full log is reduced to
//! one most-recent record per buoy each time, so the view self-heals from
//! any inconsistency upstream.

use std::collections::{BTreeMap, BTreeSet};

use crate::{
  distance::haversine_m,
  home::HomeRegistry,
  record::{BuoyId, BuoyRecord},
};

/// Whether the buoy was heard from in the most recent run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransmissionStatus {
  Reporting,
  Missing,
}

impl TransmissionStatus {
  pub fn as_wire(&self) -> &'static str {
    match self {
      Self::Reporting => "reporting",
      Self::Missing => "missing",
    }
  }
}

/// One buoy's most recent record, annotated for downstream rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct LatestEntry {
  pub record:     BuoyRecord,
  /// Distance from home, via the shared haversine metric.
  pub distance_m: f64,
  pub status:     TransmissionStatus,
}

/// Most-recent-record-per-buoy projection over the full log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LatestView {
  entries: BTreeMap<BuoyId, LatestEntry>,
}

impl LatestView {
  /// Reduce `records` (in storage order) to the latest record per buoy.
  ///
  /// The maximum `observed_at` wins; on equal timestamps the record seen
  /// later in storage order is kept. Buoys without a home entry are
  /// excluded. `reporting` is the set of buoys heard from in the most
  /// recent run; any known buoy outside it is marked
  /// [`TransmissionStatus::Missing`].
  pub fn build(
    records: &[BuoyRecord],
    registry: &HomeRegistry,
    reporting: &BTreeSet<BuoyId>,
  ) -> Self {
    let mut latest: BTreeMap<BuoyId, &BuoyRecord> = BTreeMap::new();
    for record in records {
      match latest.get(&record.buoy_id) {
        Some(kept) if kept.observed_at > record.observed_at => {}
        _ => {
          latest.insert(record.buoy_id.clone(), record);
        }
      }
    }

    let entries = latest
      .into_iter()
      .filter_map(|(id, record)| {
        let home = registry.get(&id)?;
        let distance_m = haversine_m(
          home.latitude,
          home.longitude,
          record.latitude,
          record.longitude,
        );
        let status = if reporting.contains(&id) {
          TransmissionStatus::Reporting
        } else {
          TransmissionStatus::Missing
        };
        Some((id, LatestEntry {
          record: record.clone(),
          distance_m,
          status,
        }))
      })
      .collect();

    Self { entries }
  }

  pub fn get(&self, id: &BuoyId) -> Option<&LatestEntry> {
    self.entries.get(id)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&BuoyId, &LatestEntry)> {
    self.entries.iter()
  }

  pub fn len(&self) -> usize { self.entries.len() }

  pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

#[cfg(test)]
mod tests {
  use chrono::{DateTime, TimeZone, Utc};

  use super::*;
  use crate::{home::HomePosition, record::BatteryState};

  fn at(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, minute, 0).unwrap()
  }

  fn record(id: &str, minute: u32, latitude: f64) -> BuoyRecord {
    BuoyRecord {
      buoy_id: BuoyId::new(id),
      observed_at: at(minute),
      latitude,
      longitude: 8.0,
      battery: BatteryState::Good,
    }
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

  #[test]
  fn latest_timestamp_wins_per_buoy() {
    let records = vec![record("D1", 30, 54.2), record("D1", 10, 54.1)];
    let registry = registry(&["D1"]);
    let reporting = registry.known_ids();

    let view = LatestView::build(&records, &registry, &reporting);
    let entry = view.get(&BuoyId::new("D1")).unwrap();
    assert_eq!(entry.record.latitude, 54.2);
  }

  #[test]
  fn equal_timestamps_keep_the_later_row() {
    let records = vec![record("D1", 10, 54.1), record("D1", 10, 54.3)];
    let registry = registry(&["D1"]);
    let reporting = registry.known_ids();

    let view = LatestView::build(&records, &registry, &reporting);
    assert_eq!(view.get(&BuoyId::new("D1")).unwrap().record.latitude, 54.3);
  }

  #[test]
  fn rebuild_is_idempotent() {
    let records = vec![
      record("D1", 10, 54.1),
      record("D2", 20, 54.2),
      record("D1", 30, 54.3),
    ];
    let registry = registry(&["D1", "D2"]);
    let reporting = registry.known_ids();

    let first = LatestView::build(&records, &registry, &reporting);
    let second = LatestView::build(&records, &registry, &reporting);
    assert_eq!(first, second);
  }

  #[test]
  fn buoys_without_a_home_are_excluded() {
    let records = vec![record("D1", 10, 54.1), record("D9", 10, 54.1)];
    let registry = registry(&["D1"]);
    let reporting = registry.known_ids();

    let view = LatestView::build(&records, &registry, &reporting);
    assert_eq!(view.len(), 1);
    assert!(view.get(&BuoyId::new("D9")).is_none());
  }

  #[test]
  fn silent_buoys_keep_their_last_record_but_read_missing() {
    let records = vec![record("D1", 10, 54.1), record("D2", 10, 54.2)];
    let registry = registry(&["D1", "D2"]);
    let reporting = [BuoyId::new("D1")].into_iter().collect();

    let view = LatestView::build(&records, &registry, &reporting);
    let silent = view.get(&BuoyId::new("D2")).unwrap();
    assert_eq!(silent.status, TransmissionStatus::Missing);
    assert_eq!(silent.record.latitude, 54.2);
    assert_eq!(
      view.get(&BuoyId::new("D1")).unwrap().status,
      TransmissionStatus::Reporting
    );
  }

  #[test]
  fn distance_uses_the_shared_metric() {
    let records = vec![record("D1", 10, 54.0005)];
    let registry = registry(&["D1"]);
    let reporting = registry.known_ids();

    let view = LatestView::build(&records, &registry, &reporting);
    let entry = view.get(&BuoyId::new("D1")).unwrap();
    assert!((entry.distance_m - 55.6).abs() < 0.5, "got {}", entry.distance_m);
  }
}
