//! Error types for the driftwatch-csv codec.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("missing required column: {0}")]
  MissingColumn(&'static str),

  #[error("row {row}: invalid timestamp {value:?} (expected %Y-%m-%d %H:%M:%S)")]
  InvalidTimestamp { row: usize, value: String },

  #[error("row {row}: invalid {column} value {value:?}")]
  InvalidNumber {
    row:    usize,
    column: &'static str,
    value:  String,
  },

  #[error("CSV error: {0}")]
  Csv(#[from] csv::Error),

  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
