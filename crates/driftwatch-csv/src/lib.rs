//! CSV codec for the driftwatch wire format.
//!
//! Converts between the tabular text format carried by buoy report
//! attachments and [`driftwatch_core`] domain types. Pure synchronous; no
//! filesystem or network dependencies.
//!
//! The format is a fixed header `D_number,date_UTC,Latitude,Longitude,
//! batteryState` with timestamps in strict `%Y-%m-%d %H:%M:%S` (UTC).
//! Decoding tolerates a UTF-8 byte-order mark and incidental whitespace,
//! both of which the upstream transmitters produce.

mod decode;
mod encode;

pub mod error;

pub use error::{Error, Result};

use std::io::Write;

use driftwatch_core::{
  home::HomePosition, record::BuoyRecord, view::LatestView,
};

/// Decode a batch of position reports. A malformed row fails the whole
/// document; parse failures are batch-scoped.
pub fn read_reports(input: &str) -> Result<Vec<BuoyRecord>> {
  decode::read_reports(input)
}

/// Decode the home-position registry document.
pub fn read_homes(input: &str) -> Result<Vec<HomePosition>> {
  decode::read_homes(input)
}

/// Encode records with the fixed log header.
pub fn write_records<W: Write>(
  writer: W,
  records: &[BuoyRecord],
) -> Result<()> {
  encode::write_records(writer, records)
}

/// Encode the latest-position view (log columns plus `distance_m` and
/// `status`) for the downstream renderer.
pub fn write_latest<W: Write>(writer: W, view: &LatestView) -> Result<()> {
  encode::write_latest(writer, view)
}

// ─── Round-trip test ─────────────────────────────────────────────────────────
