//! Runtime configuration.
//!
//! All tunables (file names, directories, the drift threshold, the
//! notification recipient) live in one immutable structure loaded at
//! startup. Components receive what they need at construction; nothing
//! reads ambient globals.

use std::path::{Path, PathBuf};

use driftwatch_pipeline::DEFAULT_ALERT_THRESHOLD_M;
use serde::Deserialize;

/// Shape of the TOML configuration file, with `DRIFTWATCH_*` environment
/// overrides layered on top. Every field has a default so an empty file is
/// a valid configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
  /// Directory all relative file names below are resolved against.
  pub data_dir:      PathBuf,
  /// Where the transport layer drops incoming batch attachments.
  pub spool_dir:     String,
  /// Where consumed batch files are moved.
  pub processed_dir: String,
  /// Where rendered alert messages are left for the external mailer.
  pub outbox_dir:    String,
  pub home_file:     String,
  pub log_file:      String,
  pub latest_file:   String,
  pub state_file:    String,
  /// Drift distance in meters above which a buoy is off-station.
  pub threshold_m:   f64,
  /// Recipient line stamped into outbox messages.
  pub recipient:     String,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      data_dir:      PathBuf::from("."),
      spool_dir:     "spool".to_owned(),
      processed_dir: "spool/processed".to_owned(),
      outbox_dir:    "outbox".to_owned(),
      home_file:     "home_positions.csv".to_owned(),
      log_file:      "drifters.csv".to_owned(),
      latest_file:   "latest_positions.csv".to_owned(),
      state_file:    "alerted.json".to_owned(),
      threshold_m:   DEFAULT_ALERT_THRESHOLD_M,
      recipient:     String::new(),
    }
  }
}

impl Settings {
  fn resolve(&self, name: &str) -> PathBuf {
    let path = Path::new(name);
    if path.is_absolute() {
      path.to_owned()
    } else {
      self.data_dir.join(path)
    }
  }

  pub fn spool_dir(&self) -> PathBuf { self.resolve(&self.spool_dir) }

  pub fn processed_dir(&self) -> PathBuf { self.resolve(&self.processed_dir) }

  pub fn outbox_dir(&self) -> PathBuf { self.resolve(&self.outbox_dir) }

  pub fn home_path(&self) -> PathBuf { self.resolve(&self.home_file) }

  pub fn log_path(&self) -> PathBuf { self.resolve(&self.log_file) }

  pub fn latest_path(&self) -> PathBuf { self.resolve(&self.latest_file) }

  pub fn state_path(&self) -> PathBuf { self.resolve(&self.state_file) }
}
