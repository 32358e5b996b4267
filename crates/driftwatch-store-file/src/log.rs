//! [`CsvRecordLog`] — the flat-file implementation of [`RecordStore`].

use std::{
  fs,
  path::{Path, PathBuf},
};

use driftwatch_core::{record::BuoyRecord, store::RecordStore};

use crate::{Error, Result, replace::write_replace};

/// An append-only position log backed by a single CSV file.
///
/// Appending rewrites the file through a temp-file rename, so a batch is
/// recorded all-or-nothing even if the process dies mid-write. The first
/// append creates the file and its header.
#[derive(Debug, Clone)]
pub struct CsvRecordLog {
  path: PathBuf,
}

impl CsvRecordLog {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path { &self.path }
}

impl RecordStore for CsvRecordLog {
  type Error = Error;

  fn append(&mut self, batch: &[BuoyRecord]) -> Result<()> {
    if batch.is_empty() {
      return Ok(());
    }

    let mut records = self.scan()?;
    records.extend_from_slice(batch);

    write_replace(&self.path, |tmp| {
      driftwatch_csv::write_records(&mut *tmp, &records)?;
      Ok(())
    })
  }

  fn scan(&self) -> Result<Vec<BuoyRecord>> {
    if !self.path.exists() {
      return Ok(Vec::new());
    }
    let text = fs::read_to_string(&self.path)?;
    if text.trim().is_empty() {
      // Touched but never written to; same as no log at all.
      return Ok(Vec::new());
    }
    Ok(driftwatch_csv::read_reports(&text)?)
  }

  fn exists(&self) -> Result<bool> {
    Ok(self.path.exists())
  }
}
