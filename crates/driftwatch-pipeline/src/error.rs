//! Pipeline error type.
//!
//! Row- and batch-local problems (malformed rows, unknown buoys) are
//! handled inline and never surface here; these variants are the fatal
//! conditions that abort the remainder of a run. Batches committed before
//! the failure stay committed.

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
  #[error("transport error: {0}")]
  Transport(#[source] BoxError),

  #[error("record log error: {0}")]
  Log(#[source] BoxError),

  #[error("alert state error: {0}")]
  State(#[source] BoxError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
