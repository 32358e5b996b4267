//! Encoding of core types back into the tabular wire format.

use std::io::Write;

use driftwatch_core::{record::BuoyRecord, view::LatestView};

use crate::{Result, decode::DATE_FORMAT};

const RECORD_HEADER: [&str; 5] =
  ["D_number", "date_UTC", "Latitude", "Longitude", "batteryState"];

fn record_fields(record: &BuoyRecord) -> [String; 5] {
  [
    record.buoy_id.as_str().to_owned(),
    record.observed_at.format(DATE_FORMAT).to_string(),
    record.latitude.to_string(),
    record.longitude.to_string(),
    record.battery.as_wire().to_owned(),
  ]
}

/// Write `records` with the fixed log header.
pub fn write_records<W: Write>(
  writer: W,
  records: &[BuoyRecord],
) -> Result<()> {
  let mut out = csv::Writer::from_writer(writer);
  out.write_record(RECORD_HEADER)?;
  for record in records {
    out.write_record(record_fields(record))?;
  }
  out.flush()?;
  Ok(())
}

/// Write the latest-position view for the downstream renderer: the log
/// columns plus `distance_m` (one decimal) and `status`.
pub fn write_latest<W: Write>(writer: W, view: &LatestView) -> Result<()> {
  let mut out = csv::Writer::from_writer(writer);
  out.write_record(RECORD_HEADER.iter().copied().chain(["distance_m", "status"]))?;
  for (_, entry) in view.iter() {
    let mut fields = record_fields(&entry.record).to_vec();
    fields.push(format!("{:.1}", entry.distance_m));
    fields.push(entry.status.as_wire().to_owned());
    out.write_record(&fields)?;
  }
  out.flush()?;
  Ok(())
}
