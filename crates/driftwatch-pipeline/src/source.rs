//! The inbound edge of the pipeline.
//!
//! Batch discovery and retrieval (mail polling, attachment download,
//! read-state bookkeeping) live outside the core; a [`BatchSource`]
//! implementation hands over raw batch bodies and is told when a batch has
//! been fully processed.

use chrono::{DateTime, Utc};

/// One externally delivered group of position reports, still in wire form.
#[derive(Debug, Clone)]
pub struct RawBatch {
  /// Opaque identifier the source understands (message id, file name).
  pub batch_id:   String,
  /// Externally assigned arrival timestamp; sources must order their
  /// batches oldest to newest by this value.
  pub arrived_at: DateTime<Utc>,
  /// The raw CSV attachment body.
  pub body:       String,
}

/// Supplier of batches for one run.
pub trait BatchSource {
  type Error: std::error::Error + Send + Sync + 'static;

  /// All batches awaiting processing, ordered oldest to newest by arrival.
  fn fetch(&mut self) -> Result<Vec<RawBatch>, Self::Error>;

  /// Acknowledge a fully processed batch so it is not delivered again.
  /// The pipeline calls this only after the batch's records and the alert
  /// state have both been durably persisted; if the call fails the batch
  /// is redelivered next run, which the pipeline tolerates.
  fn mark_consumed(&mut self, batch_id: &str) -> Result<(), Self::Error>;
}
