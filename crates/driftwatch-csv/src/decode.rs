//! Decoding of the tabular wire format into core types.

use chrono::{DateTime, NaiveDateTime, Utc};
use driftwatch_core::{
  home::HomePosition,
  record::{BatteryState, BuoyId, BuoyRecord},
};

use crate::{Error, Result};

/// The exact textual timestamp pattern used throughout the format.
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const COL_ID: &str = "D_number";
const COL_DATE: &str = "date_UTC";
const COL_LAT: &str = "Latitude";
const COL_LON: &str = "Longitude";
const COL_BATTERY: &str = "batteryState";

/// Column positions resolved from a header row. Header names are matched
/// after trimming, so a byte-order mark or stray padding cannot hide a
/// column.
struct Columns {
  id:        usize,
  date:      usize,
  latitude:  usize,
  longitude: usize,
  battery:   Option<usize>,
}

fn position(headers: &csv::StringRecord, name: &str) -> Option<usize> {
  headers.iter().position(|h| h.trim() == name)
}

impl Columns {
  fn resolve(headers: &csv::StringRecord) -> Result<Self> {
    Ok(Self {
      id:       position(headers, COL_ID)
        .ok_or(Error::MissingColumn(COL_ID))?,
      date:     position(headers, COL_DATE)
        .ok_or(Error::MissingColumn(COL_DATE))?,
      latitude: position(headers, COL_LAT)
        .ok_or(Error::MissingColumn(COL_LAT))?,
      longitude: position(headers, COL_LON)
        .ok_or(Error::MissingColumn(COL_LON))?,
      battery:  position(headers, COL_BATTERY),
    })
  }
}

/// Strip a UTF-8 byte-order mark; the upstream transmitters write one.
fn without_bom(input: &str) -> &str {
  input.strip_prefix('\u{feff}').unwrap_or(input)
}

fn reader(input: &str) -> csv::Reader<&[u8]> {
  csv::ReaderBuilder::new()
    .trim(csv::Trim::All)
    .flexible(true)
    .from_reader(without_bom(input).as_bytes())
}

fn field<'r>(row: &'r csv::StringRecord, index: usize) -> &'r str {
  row.get(index).unwrap_or_default()
}

fn parse_timestamp(value: &str, row: usize) -> Result<DateTime<Utc>> {
  NaiveDateTime::parse_from_str(value, DATE_FORMAT)
    .map(|naive| naive.and_utc())
    .map_err(|_| Error::InvalidTimestamp {
      row,
      value: value.to_owned(),
    })
}

fn parse_number(value: &str, column: &'static str, row: usize) -> Result<f64> {
  value.parse().map_err(|_| Error::InvalidNumber {
    row,
    column,
    value: value.to_owned(),
  })
}

/// Decode a batch of position reports.
///
/// Any malformed row fails the whole document; the caller treats that as a
/// batch-scoped parse failure and skips the batch.
pub fn read_reports(input: &str) -> Result<Vec<BuoyRecord>> {
  let mut reader = reader(input);
  let columns = Columns::resolve(reader.headers()?)?;

  let mut records = Vec::new();
  for (index, row) in reader.records().enumerate() {
    let row = row?;
    // Header is line 1; data rows are reported 1-based below it.
    let line = index + 2;

    let battery = match columns.battery {
      Some(i) => BatteryState::parse(field(&row, i)),
      None => BatteryState::Unknown,
    };

    records.push(BuoyRecord {
      buoy_id: BuoyId::new(field(&row, columns.id)),
      observed_at: parse_timestamp(field(&row, columns.date), line)?,
      latitude: parse_number(field(&row, columns.latitude), COL_LAT, line)?,
      longitude: parse_number(field(&row, columns.longitude), COL_LON, line)?,
      battery,
    });
  }
  Ok(records)
}

/// Decode the home-position registry document.
///
/// Shares the report column names; the `date_UTC` column holds each buoy's
/// activation timestamp. Registries exported without that exact header name
/// carry the activation time in their last column instead.
pub fn read_homes(input: &str) -> Result<Vec<HomePosition>> {
  let mut reader = reader(input);
  let headers = reader.headers()?.clone();

  let id = position(&headers, COL_ID).ok_or(Error::MissingColumn(COL_ID))?;
  let latitude =
    position(&headers, COL_LAT).ok_or(Error::MissingColumn(COL_LAT))?;
  let longitude =
    position(&headers, COL_LON).ok_or(Error::MissingColumn(COL_LON))?;
  let date = match position(&headers, COL_DATE) {
    Some(i) => i,
    None if headers.len() > 3 => headers.len() - 1,
    None => return Err(Error::MissingColumn(COL_DATE)),
  };

  let mut homes = Vec::new();
  for (index, row) in reader.records().enumerate() {
    let row = row?;
    let line = index + 2;

    homes.push(HomePosition {
      buoy_id:      BuoyId::new(field(&row, id)),
      latitude:     parse_number(field(&row, latitude), COL_LAT, line)?,
      longitude:    parse_number(field(&row, longitude), COL_LON, line)?,
      activated_at: parse_timestamp(field(&row, date), line)?,
    });
  }
  Ok(homes)
}
