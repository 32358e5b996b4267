//! Filesystem stand-in for the batch transport.
//!
//! The real transport (mail retrieval and attachment download) runs
//! elsewhere and drops one CSV file per batch into a spool directory.
//! Consumption is acknowledged by moving the file into the processed
//! directory, so a crash mid-run leaves unfinished batches in place for
//! the next run.

use std::{fs, io, path::PathBuf, time::SystemTime};

use chrono::{DateTime, Utc};
use driftwatch_pipeline::{BatchSource, RawBatch};

pub struct SpoolSource {
  spool_dir:     PathBuf,
  processed_dir: PathBuf,
}

impl SpoolSource {
  pub fn new(spool_dir: PathBuf, processed_dir: PathBuf) -> io::Result<Self> {
    fs::create_dir_all(&spool_dir)?;
    fs::create_dir_all(&processed_dir)?;
    Ok(Self {
      spool_dir,
      processed_dir,
    })
  }
}

impl BatchSource for SpoolSource {
  type Error = io::Error;

  fn fetch(&mut self) -> io::Result<Vec<RawBatch>> {
    let mut entries: Vec<(SystemTime, String, PathBuf)> = Vec::new();

    for entry in fs::read_dir(&self.spool_dir)? {
      let entry = entry?;
      let path = entry.path();
      let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
      if !path.is_file() || !is_csv {
        continue;
      }
      let modified = entry.metadata()?.modified()?;
      let name = entry.file_name().to_string_lossy().into_owned();
      entries.push((modified, name, path));
    }

    // Oldest first; the file name breaks mtime ties deterministically.
    entries.sort_by(|a, b| (a.0, &a.1).cmp(&(b.0, &b.1)));

    entries
      .into_iter()
      .map(|(modified, name, path)| {
        Ok(RawBatch {
          batch_id:   name,
          arrived_at: DateTime::<Utc>::from(modified),
          body:       fs::read_to_string(&path)?,
        })
      })
      .collect()
  }

  fn mark_consumed(&mut self, batch_id: &str) -> io::Result<()> {
    fs::rename(
      self.spool_dir.join(batch_id),
      self.processed_dir.join(batch_id),
    )
  }
}

#[cfg(test)]
mod tests {
  use tempfile::TempDir;

  use super::*;

  fn source(dir: &TempDir) -> SpoolSource {
    SpoolSource::new(
      dir.path().join("spool"),
      dir.path().join("spool/processed"),
    )
    .unwrap()
  }

  #[test]
  fn fetch_returns_only_csv_files() {
    let dir = TempDir::new().unwrap();
    let mut spool = source(&dir);
    fs::write(dir.path().join("spool/b1.csv"), "data").unwrap();
    fs::write(dir.path().join("spool/notes.txt"), "skip").unwrap();

    let batches = spool.fetch().unwrap();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].batch_id, "b1.csv");
    assert_eq!(batches[0].body, "data");
  }

  #[test]
  fn mark_consumed_moves_the_file() {
    let dir = TempDir::new().unwrap();
    let mut spool = source(&dir);
    fs::write(dir.path().join("spool/b1.csv"), "data").unwrap();

    spool.mark_consumed("b1.csv").unwrap();
    assert!(!dir.path().join("spool/b1.csv").exists());
    assert!(dir.path().join("spool/processed/b1.csv").exists());
    assert!(spool.fetch().unwrap().is_empty());
  }
}
