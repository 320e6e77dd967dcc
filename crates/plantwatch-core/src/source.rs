//! The `RetirementSources` trait: read access to the authoritative and
//! research datasets.
//!
//! Implemented by storage backends (e.g. `plantwatch-store-sqlite`). The
//! reconciliation core never calls it; the API layer fetches a
//! [`SourceSnapshot`](crate::reconcile::SourceSnapshot) through it and hands
//! the snapshot to the core.

use std::{collections::HashMap, future::Future};

use chrono::NaiveDate;

use crate::{
  filter::Filters,
  record::{Facility, FacilityRecord, ResearchUnit},
};

/// Abstraction over the source datasets.
///
/// Backends may push the state and fuel filters down into their queries; the
/// core applies them again, so a backend that ignores them is still correct.
/// An empty result is a valid answer for every method.
pub trait RetirementSources: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Authoritative filings ─────────────────────────────────────────────

  /// The report date of the newest filing snapshot, or `None` when no
  /// snapshot has been loaded.
  fn latest_report_date(
    &self,
  ) -> impl Future<Output = Result<Option<NaiveDate>, Self::Error>> + Send + '_;

  /// All generators in the snapshot for `report_date`.
  fn fetch_generators<'a>(
    &'a self,
    report_date: NaiveDate,
    filters: &'a Filters,
  ) -> impl Future<Output = Result<Vec<FacilityRecord>, Self::Error>> + Send + 'a;

  /// Location metadata for the given facility ids. Unknown ids are absent
  /// from the map.
  fn fetch_facilities(
    &self,
    ids: Vec<i64>,
  ) -> impl Future<Output = Result<HashMap<i64, Facility>, Self::Error>> + Send + '_;

  // ── Research wiki ─────────────────────────────────────────────────────

  /// All research units matching `filters`.
  fn fetch_research_units<'a>(
    &'a self,
    filters: &'a Filters,
  ) -> impl Future<Output = Result<Vec<ResearchUnit>, Self::Error>> + Send + 'a;
}
