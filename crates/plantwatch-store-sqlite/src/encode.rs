//! Encoding and decoding helpers between domain types and the plain values
//! stored in SQLite columns.
//!
//! Dates are stored as `YYYY-MM-DD` text. Row structs hold the raw column
//! values read inside the connection thread; conversion to domain types, which
//! can fail, happens outside it.

use chrono::NaiveDate;
use plantwatch_core::record::{Facility, FacilityRecord, ResearchUnit};

use crate::{Error, Result};

// ─── NaiveDate ───────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(date: NaiveDate) -> String {
  date.format(DATE_FORMAT).to_string()
}

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

fn decode_opt_date(s: Option<String>) -> Result<Option<NaiveDate>> {
  s.as_deref().map(decode_date).transpose()
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values from a `generators` row.
pub struct RawGenerator {
  pub facility_id:             i64,
  pub facility_name:           String,
  pub generator_id:            String,
  pub state:                   String,
  pub capacity_mw:             Option<f64>,
  pub fuel_type:               String,
  pub operational_status:      String,
  pub planned_retirement_date: Option<String>,
  pub actual_retirement_date:  Option<String>,
}

impl RawGenerator {
  pub const COLUMNS: &'static str = "facility_id, facility_name, generator_id, \
     state, capacity_mw, fuel_type, operational_status, \
     planned_retirement_date, actual_retirement_date";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      facility_id:             row.get(0)?,
      facility_name:           row.get(1)?,
      generator_id:            row.get(2)?,
      state:                   row.get(3)?,
      capacity_mw:             row.get(4)?,
      fuel_type:               row.get(5)?,
      operational_status:      row.get(6)?,
      planned_retirement_date: row.get(7)?,
      actual_retirement_date:  row.get(8)?,
    })
  }

  pub fn into_record(self) -> Result<FacilityRecord> {
    Ok(FacilityRecord {
      facility_id:             self.facility_id,
      facility_name:           self.facility_name,
      generator_id:            self.generator_id,
      state:                   self.state,
      capacity_mw:             self.capacity_mw,
      fuel_type:               self.fuel_type,
      operational_status:      self.operational_status,
      planned_retirement_date: decode_opt_date(self.planned_retirement_date)?,
      actual_retirement_date:  decode_opt_date(self.actual_retirement_date)?,
    })
  }
}

pub const FACILITY_COLUMNS: &str =
  "facility_id, name, state, county, city, latitude, longitude";

pub fn facility_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Facility> {
  Ok(Facility {
    facility_id: row.get(0)?,
    name:        row.get(1)?,
    state:       row.get(2)?,
    county:      row.get(3)?,
    city:        row.get(4)?,
    latitude:    row.get(5)?,
    longitude:   row.get(6)?,
  })
}

pub const RESEARCH_COLUMNS: &str = "facility_name, facility_slug, unit_name, \
   status, fuel_type, capacity_mw, planned_retirement_year, \
   actual_retirement_year, state, county, owner";

pub fn research_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ResearchUnit> {
  Ok(ResearchUnit {
    facility_name:           row.get(0)?,
    facility_slug:           row.get(1)?,
    unit_name:               row.get(2)?,
    status:                  row.get(3)?,
    fuel_type:               row.get(4)?,
    capacity_mw:             row.get(5)?,
    planned_retirement_year: row.get(6)?,
    actual_retirement_year:  row.get(7)?,
    state:                   row.get(8)?,
    county:                  row.get(9)?,
    owner:                   row.get(10)?,
  })
}
