//! Error types for `driftwatch-core`.

use thiserror::Error;

use crate::record::BuoyId;

#[derive(Debug, Error)]
pub enum Error {
  #[error("duplicate home position for buoy {0}")]
  DuplicateHome(BuoyId),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
