//! Alert state and alert events.
//!
//! State is tracked per buoy *per condition*: a buoy can be drift-armed and
//! silence-armed independently, so one unresolved condition can never mask
//! the onset of the other. An armed condition means a notification has
//! already gone out and not yet cleared; arming is therefore the only
//! transition that produces an event.

use std::{collections::BTreeMap, fmt};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::record::BuoyId;

// ─── Conditions ──────────────────────────────────────────────────────────────

/// The two alertable conditions.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AlertCondition {
  /// Distance from home exceeded the threshold.
  Drift,
  /// The buoy failed to report in a batch.
  Silence,
}

impl fmt::Display for AlertCondition {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Drift => f.write_str("drift"),
      Self::Silence => f.write_str("silence"),
    }
  }
}

// ─── Persisted state ─────────────────────────────────────────────────────────

/// Which conditions are currently armed, per buoy.
///
/// Serialises as `{"D1234": {"drift": "2024-06-01T12:00:00Z"}}` where the
/// timestamp is when the condition first fired. Entries disappear when the
/// condition clears; an empty inner map is pruned so absence always means
/// "nominal".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlertState {
  armed: BTreeMap<BuoyId, BTreeMap<AlertCondition, DateTime<Utc>>>,
}

impl AlertState {
  /// Arm `condition` for `buoy`. Returns `true` only on the nominal →
  /// alerting transition; re-arming an armed condition is a no-op, which is
  /// what suppresses repeat notifications for an ongoing excursion.
  pub fn arm(
    &mut self,
    buoy: &BuoyId,
    condition: AlertCondition,
    at: DateTime<Utc>,
  ) -> bool {
    let conditions = self.armed.entry(buoy.clone()).or_default();
    if conditions.contains_key(&condition) {
      return false;
    }
    conditions.insert(condition, at);
    true
  }

  /// Clear `condition` for `buoy`. Returns `true` if it was armed.
  pub fn clear(&mut self, buoy: &BuoyId, condition: AlertCondition) -> bool {
    let Some(conditions) = self.armed.get_mut(buoy) else {
      return false;
    };
    let was_armed = conditions.remove(&condition).is_some();
    if conditions.is_empty() {
      self.armed.remove(buoy);
    }
    was_armed
  }

  pub fn is_armed(&self, buoy: &BuoyId, condition: AlertCondition) -> bool {
    self
      .armed
      .get(buoy)
      .is_some_and(|conditions| conditions.contains_key(&condition))
  }

  /// Number of buoys with at least one armed condition.
  pub fn len(&self) -> usize { self.armed.len() }

  pub fn is_empty(&self) -> bool { self.armed.is_empty() }
}

// ─── Events ──────────────────────────────────────────────────────────────────

/// An alert raised by the engine during one batch.
///
/// The engine returns events instead of talking to the notification channel
/// itself; a separate dispatcher renders and delivers them.
#[derive(Debug, Clone, PartialEq)]
pub enum AlertEvent {
  Drift {
    buoy_id:     BuoyId,
    distance_m:  f64,
    home:        (f64, f64),
    position:    (f64, f64),
    observed_at: DateTime<Utc>,
  },
  Silence {
    buoy_id:    BuoyId,
    batch_time: DateTime<Utc>,
  },
}

impl AlertEvent {
  pub fn buoy_id(&self) -> &BuoyId {
    match self {
      Self::Drift { buoy_id, .. } | Self::Silence { buoy_id, .. } => buoy_id,
    }
  }

  pub fn condition(&self) -> AlertCondition {
    match self {
      Self::Drift { .. } => AlertCondition::Drift,
      Self::Silence { .. } => AlertCondition::Silence,
    }
  }

  /// Notification subject line.
  pub fn subject(&self) -> String {
    match self {
      Self::Drift {
        buoy_id,
        distance_m,
        ..
      } => format!("Alert: Buoy {buoy_id} moved {distance_m:.1} m"),
      Self::Silence {
        buoy_id,
        batch_time,
      } => format!(
        "Alert: Buoy {buoy_id} missing in batch {}",
        batch_time.format("%Y-%m-%d %H:%M:%S")
      ),
    }
  }

  /// Notification body.
  pub fn body(&self) -> String {
    match self {
      Self::Drift {
        buoy_id,
        distance_m,
        home,
        position,
        ..
      } => format!(
        "Buoy ID: {buoy_id}\n\
         Distance moved: {distance_m:.1} m\n\
         Home pos: ({:.5},{:.5})\n\
         Current: ({:.5},{:.5})",
        home.0, home.1, position.0, position.1
      ),
      Self::Silence {
        buoy_id,
        batch_time,
      } => format!(
        "Buoy {buoy_id} did not transmit this batch.\n\
         Batch time: {}",
        batch_time.format("%Y-%m-%d %H:%M:%S")
      ),
    }
  }
}
