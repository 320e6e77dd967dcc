//! [`SqliteStore`]: the SQLite implementation of [`RetirementSources`].

use std::{collections::HashMap, path::Path};

use chrono::NaiveDate;
use rusqlite::OptionalExtension as _;

use plantwatch_core::{
  filter::Filters,
  record::{Facility, FacilityRecord, ResearchUnit},
  source::RetirementSources,
};

use crate::{
  encode::{
    decode_date, encode_date, facility_from_row, research_from_row, RawGenerator,
    FACILITY_COLUMNS, RESEARCH_COLUMNS,
  },
  schema::SCHEMA,
  Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// Plantwatch source datasets backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Import ────────────────────────────────────────────────────────────

  /// Replace the filing snapshot for `report_date` with `records`.
  ///
  /// Runs in one transaction, so readers see either the old snapshot or the
  /// new one. Returns the number of rows written.
  pub async fn insert_snapshot(
    &self,
    report_date: NaiveDate,
    records: Vec<FacilityRecord>,
  ) -> Result<usize> {
    let date = encode_date(report_date);

    let written = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "DELETE FROM generators WHERE report_date = ?1",
          rusqlite::params![date],
        )?;
        {
          let mut stmt = tx.prepare(
            "INSERT OR REPLACE INTO generators
               (report_date, facility_id, generator_id, facility_name, state,
                capacity_mw, fuel_type, operational_status,
                planned_retirement_date, actual_retirement_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          )?;
          for r in &records {
            stmt.execute(rusqlite::params![
              date,
              r.facility_id,
              r.generator_id,
              r.facility_name,
              r.state,
              r.capacity_mw,
              r.fuel_type,
              r.operational_status,
              r.planned_retirement_date.map(encode_date),
              r.actual_retirement_date.map(encode_date),
            ])?;
          }
        }
        tx.commit()?;
        Ok(records.len())
      })
      .await?;

    Ok(written)
  }

  /// Insert or update facility location rows keyed by `facility_id`.
  pub async fn upsert_facilities(&self, facilities: Vec<Facility>) -> Result<usize> {
    let written = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO facilities
               (facility_id, name, state, county, city, latitude, longitude)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(facility_id) DO UPDATE SET
               name = excluded.name,
               state = excluded.state,
               county = excluded.county,
               city = excluded.city,
               latitude = excluded.latitude,
               longitude = excluded.longitude",
          )?;
          for f in &facilities {
            stmt.execute(rusqlite::params![
              f.facility_id,
              f.name,
              f.state,
              f.county,
              f.city,
              f.latitude,
              f.longitude,
            ])?;
          }
        }
        tx.commit()?;
        Ok(facilities.len())
      })
      .await?;

    Ok(written)
  }

  /// Insert or update research units keyed by `(facility_slug, unit_name)`.
  ///
  /// An updated unit keeps its original position in read order.
  pub async fn upsert_research_units(&self, units: Vec<ResearchUnit>) -> Result<usize> {
    let written = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO research_units
               (facility_slug, unit_name, facility_name, status, fuel_type,
                capacity_mw, planned_retirement_year, actual_retirement_year,
                state, county, owner)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
             ON CONFLICT(facility_slug, unit_name) DO UPDATE SET
               facility_name = excluded.facility_name,
               status = excluded.status,
               fuel_type = excluded.fuel_type,
               capacity_mw = excluded.capacity_mw,
               planned_retirement_year = excluded.planned_retirement_year,
               actual_retirement_year = excluded.actual_retirement_year,
               state = excluded.state,
               county = excluded.county,
               owner = excluded.owner",
          )?;
          for u in &units {
            stmt.execute(rusqlite::params![
              u.facility_slug,
              u.unit_name,
              u.facility_name,
              u.status,
              u.fuel_type,
              u.capacity_mw,
              u.planned_retirement_year,
              u.actual_retirement_year,
              u.state,
              u.county,
              u.owner,
            ])?;
          }
        }
        tx.commit()?;
        Ok(units.len())
      })
      .await?;

    Ok(written)
  }

  /// Every report date with at least one generator row, newest first.
  pub async fn report_dates(&self) -> Result<Vec<NaiveDate>> {
    let raw: Vec<String> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT DISTINCT report_date FROM generators ORDER BY report_date DESC",
        )?;
        let rows = stmt
          .query_map([], |r| r.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(rows)
      })
      .await?;

    raw.iter().map(|s| decode_date(s)).collect()
  }
}

// ─── RetirementSources impl ──────────────────────────────────────────────────

impl RetirementSources for SqliteStore {
  type Error = crate::Error;

  async fn latest_report_date(&self) -> Result<Option<NaiveDate>> {
    let raw: Option<String> = self
      .conn
      .call(|conn| {
        let date = conn
          .query_row("SELECT MAX(report_date) FROM generators", [], |r| {
            r.get::<_, Option<String>>(0)
          })
          .optional()?
          .flatten();
        Ok(date)
      })
      .await?;

    raw.as_deref().map(decode_date).transpose()
  }

  async fn fetch_generators(
    &self,
    report_date: NaiveDate,
    filters: &Filters,
  ) -> Result<Vec<FacilityRecord>> {
    let date = encode_date(report_date);
    let state = filters.state.clone();
    let fuel = filters.fuel_type.clone();

    let raws: Vec<RawGenerator> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {} FROM generators
           WHERE report_date = ?1
             AND (?2 IS NULL OR upper(trim(state)) = ?2)
             AND (?3 IS NULL OR lower(trim(fuel_type)) = lower(trim(?3)))
           ORDER BY facility_id, generator_id",
          RawGenerator::COLUMNS,
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![date, state, fuel], RawGenerator::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawGenerator::into_record).collect()
  }

  async fn fetch_facilities(&self, ids: Vec<i64>) -> Result<HashMap<i64, Facility>> {
    let facilities = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {FACILITY_COLUMNS} FROM facilities WHERE facility_id = ?1");
        let mut stmt = conn.prepare(&sql)?;
        let mut found = HashMap::with_capacity(ids.len());
        for id in ids {
          if let Some(f) = stmt
            .query_row(rusqlite::params![id], facility_from_row)
            .optional()?
          {
            found.insert(id, f);
          }
        }
        Ok(found)
      })
      .await?;

    Ok(facilities)
  }

  async fn fetch_research_units(&self, filters: &Filters) -> Result<Vec<ResearchUnit>> {
    let state = filters.state.clone();
    let fuel = filters.fuel_type.clone();

    let units = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {RESEARCH_COLUMNS} FROM research_units
           WHERE (?1 IS NULL OR upper(trim(state)) = ?1)
             AND (?2 IS NULL OR instr(lower(fuel_type), lower(trim(?2))) > 0)
           ORDER BY rowid",
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![state, fuel], research_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(units)
  }
}
