//! File-backed storage for the driftwatch pipeline.
//!
//! The position log is a flat append-only CSV file, the alert state a small
//! JSON document, and the latest-position view a derived CSV regenerated
//! wholesale each run. Every write goes through a same-directory temp file
//! and an atomic rename, so an interrupted run leaves each file either
//! untouched or fully written.

mod latest;
mod log;
mod replace;
mod state;

pub mod error;

pub use error::{Error, Result};
pub use latest::write_latest_view;
pub use log::CsvRecordLog;
pub use state::JsonAlertState;
