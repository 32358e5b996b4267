//! Error type for `driftwatch-store-file`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),

  #[error("codec error: {0}")]
  Codec(#[from] driftwatch_csv::Error),

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),
}

impl From<tempfile::PersistError> for Error {
  fn from(err: tempfile::PersistError) -> Self { Self::Io(err.error) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
