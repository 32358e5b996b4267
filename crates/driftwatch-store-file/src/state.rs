//! [`JsonAlertState`] — alert state persisted as a small JSON document.

use std::{
  fs,
  io::Write as _,
  path::{Path, PathBuf},
};

use driftwatch_core::{alert::AlertState, store::AlertStateStore};

use crate::{Error, Result, replace::write_replace};

/// Stores the per-buoy armed-condition map between runs.
///
/// An absent file reads as an empty state; saving replaces the document
/// atomically after every batch.
#[derive(Debug, Clone)]
pub struct JsonAlertState {
  path: PathBuf,
}

impl JsonAlertState {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path { &self.path }
}

impl AlertStateStore for JsonAlertState {
  type Error = Error;

  fn load(&self) -> Result<AlertState> {
    if !self.path.exists() {
      return Ok(AlertState::default());
    }
    let text = fs::read_to_string(&self.path)?;
    Ok(serde_json::from_str(&text)?)
  }

  fn save(&mut self, state: &AlertState) -> Result<()> {
    let text = serde_json::to_string_pretty(state)?;
    write_replace(&self.path, |tmp| {
      tmp.write_all(text.as_bytes())?;
      Ok(())
    })
  }
}
