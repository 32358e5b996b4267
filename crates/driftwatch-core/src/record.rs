//! Position reports — the fundamental unit of the driftwatch log.
//!
//! A record is an immutable observation of one buoy at a point in time.
//! Records are never updated; the log they are appended to is append-only.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Identity ────────────────────────────────────────────────────────────────

/// A buoy's stable `D_number` identifier.
///
/// Construction normalises the raw text (whitespace trimmed), so lookups
/// against the home registry cannot miss on incidental padding. The inner
/// value stays a string throughout; numeric-looking identifiers are never
/// coerced.
#[derive(
  Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BuoyId(String);

impl BuoyId {
  pub fn new(raw: impl AsRef<str>) -> Self {
    Self(raw.as_ref().trim().to_owned())
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for BuoyId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

// ─── Battery ─────────────────────────────────────────────────────────────────

/// The reported battery condition, as transmitted in the `batteryState`
/// column. Values outside the known vocabulary are preserved verbatim in
/// [`BatteryState::Other`] so the log re-serialises losslessly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BatteryState {
  Good,
  Low,
  #[default]
  Unknown,
  Other(String),
}

impl BatteryState {
  /// Parse the raw column value; matching is case-insensitive and
  /// whitespace-tolerant.
  pub fn parse(raw: &str) -> Self {
    let trimmed = raw.trim();
    match trimmed.to_ascii_uppercase().as_str() {
      "GOOD" => Self::Good,
      "LOW" => Self::Low,
      "" | "UNKNOWN" => Self::Unknown,
      _ => Self::Other(trimmed.to_owned()),
    }
  }

  /// The exact text written back to the log.
  pub fn as_wire(&self) -> &str {
    match self {
      Self::Good => "GOOD",
      Self::Low => "LOW",
      Self::Unknown => "UNKNOWN",
      Self::Other(raw) => raw,
    }
  }
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// One position report from one buoy. Immutable once appended to the log.
///
/// Identity is not unique per buoy — a buoy produces many records over time.
#[derive(Debug, Clone, PartialEq)]
pub struct BuoyRecord {
  pub buoy_id:     BuoyId,
  /// Observation timestamp, always UTC (the `date_UTC` column).
  pub observed_at: DateTime<Utc>,
  pub latitude:    f64,
  pub longitude:   f64,
  pub battery:     BatteryState,
}
