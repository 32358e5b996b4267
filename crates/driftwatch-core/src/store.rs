//! Storage traits implemented by backends (e.g. `driftwatch-store-file`).
//!
//! Higher layers (`driftwatch-pipeline`, `driftwatch-cli`) depend on these
//! abstractions, not on any concrete backend. All operations are
//! synchronous; a run is a single sequential process and the surrounding
//! orchestration guarantees single-instance execution.

use crate::{alert::AlertState, record::BuoyRecord};

/// The append-only position log — the single source of truth for
/// latest-position queries.
pub trait RecordStore {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Durably record a batch. Atomic with respect to the batch: after a
  /// crash the log contains either none or all of its records, never a
  /// prefix. The first append establishes the log's header.
  fn append(&mut self, batch: &[BuoyRecord]) -> Result<(), Self::Error>;

  /// The full log in storage order (arrival order, not necessarily
  /// timestamp order across appends).
  fn scan(&self) -> Result<Vec<BuoyRecord>, Self::Error>;

  /// Whether the log has been created yet.
  fn exists(&self) -> Result<bool, Self::Error>;
}

/// Persistence for [`AlertState`] between runs.
pub trait AlertStateStore {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Load the persisted state; an absent backing document is an empty
  /// state, not an error.
  fn load(&self) -> Result<AlertState, Self::Error>;

  /// Replace the persisted state. Called after every batch so a crash
  /// mid-run cannot re-notify already-handled buoys on restart.
  fn save(&mut self, state: &AlertState) -> Result<(), Self::Error>;
}
