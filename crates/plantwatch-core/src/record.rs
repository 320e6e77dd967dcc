//! Record types for the three input sources and the merged output.
//!
//! Every source keeps its own shape. The merge engine is the only place the
//! three are combined, into a [`MergedRecord`].

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Build the `YYYY-12-31` date used to approximate a year-granularity claim.
pub fn year_end(year: i32) -> Option<NaiveDate> {
  NaiveDate::from_ymd_opt(year, 12, 31)
}

/// Longest bounded delay a citation may state, in years.
pub const MAX_DELAY_YEARS: i32 = 1000;

// ─── Provenance ──────────────────────────────────────────────────────────────

/// Which source contributed to a merged record.
///
/// The declaration order is the serialisation order inside
/// [`MergedRecord::data_sources`].
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
  /// The regulator-filed generator inventory.
  Authoritative,
  /// The crowd-curated wiki dataset.
  Research,
  /// A hand-curated delay citation.
  Manual,
}

// ─── Source a: authoritative filings ─────────────────────────────────────────

/// One generating unit from the most recent authoritative filing snapshot.
///
/// Identity is `(facility_id, generator_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityRecord {
  pub facility_id:             i64,
  pub facility_name:           String,
  pub generator_id:            String,
  pub state:                   String,
  pub capacity_mw:             Option<f64>,
  pub fuel_type:               String,
  pub operational_status:      String,
  pub planned_retirement_date: Option<NaiveDate>,
  pub actual_retirement_date:  Option<NaiveDate>,
}

impl FacilityRecord {
  /// A unit with an actual retirement date is history, not a plan.
  pub fn is_retired(&self) -> bool { self.actual_retirement_date.is_some() }
}

/// Location metadata for an authoritative facility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facility {
  pub facility_id: i64,
  pub name:        String,
  pub state:       String,
  pub county:      Option<String>,
  pub city:        Option<String>,
  pub latitude:    Option<f64>,
  pub longitude:   Option<f64>,
}

// ─── Source b: research wiki ─────────────────────────────────────────────────

/// One unit from the research wiki. Dates are year granularity only.
///
/// Identity is `(facility_slug, unit_name)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchUnit {
  pub facility_name:           String,
  pub facility_slug:           String,
  pub unit_name:               String,
  pub status:                  String,
  pub fuel_type:               String,
  pub capacity_mw:             Option<f64>,
  pub planned_retirement_year: Option<i32>,
  pub actual_retirement_year:  Option<i32>,
  pub state:                   String,
  pub county:                  Option<String>,
  pub owner:                   Option<String>,
}

impl ResearchUnit {
  pub fn is_retired(&self) -> bool {
    self.status.trim().eq_ignore_ascii_case("retired")
  }

  /// The year-end date implied by the planned retirement year, unless the
  /// unit is already retired.
  pub fn planned_date(&self) -> Option<NaiveDate> {
    if self.is_retired() {
      return None;
    }
    self.planned_retirement_year.and_then(year_end)
  }
}

// ─── Source c: manual citations ──────────────────────────────────────────────

/// A hand-verified retirement delay, cited to a news or regulatory source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelayCitation {
  pub facility_name:   String,
  pub state:           String,
  pub operator:        Option<String>,
  pub original_year:   i32,
  #[serde(default)]
  pub revised_year:    Option<i32>,
  #[serde(default)]
  pub delay_years:     Option<i32>,
  #[serde(default)]
  pub indefinite:      bool,
  #[serde(default)]
  pub emergency_order: bool,
  pub source_label:    String,
  pub source_url:      String,
}

/// What a citation says happened to the retirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Revision {
  /// Pushed to a concrete year.
  Revised(i32),
  /// Postponed with no new date.
  Indefinite,
  /// Kept running under an emergency order.
  EmergencyOrder,
  /// The citation records the original plan only.
  Unchanged,
}

impl DelayCitation {
  /// Reject citations whose flags contradict each other or whose years fall
  /// outside the representable date range.
  pub fn validate(&self) -> Result<()> {
    if self.facility_name.trim().is_empty() || self.state.trim().is_empty() {
      return Err(Error::CitationMissingIdentity);
    }
    let flags = [
      self.revised_year.is_some(),
      self.indefinite,
      self.emergency_order,
    ];
    if flags.iter().filter(|f| **f).count() > 1 {
      return Err(Error::ConflictingCitationFlags {
        facility: self.facility_name.clone(),
        state:    self.state.clone(),
      });
    }
    if self.is_unbounded() && self.delay_years.is_some() {
      return Err(Error::BoundedUnboundedDelay {
        facility: self.facility_name.clone(),
        state:    self.state.clone(),
      });
    }
    let years_in_range = year_end(self.original_year).is_some()
      && self.revised_year.is_none_or(|y| year_end(y).is_some());
    let delay_in_range = self
      .delay_years
      .is_none_or(|d| (0..=MAX_DELAY_YEARS).contains(&d));
    if !years_in_range || !delay_in_range {
      return Err(Error::CitationOutOfRange {
        facility: self.facility_name.clone(),
        state:    self.state.clone(),
      });
    }
    Ok(())
  }

  pub fn revision(&self) -> Revision {
    match (self.revised_year, self.indefinite, self.emergency_order) {
      (Some(year), ..) => Revision::Revised(year),
      (None, true, _) => Revision::Indefinite,
      (None, false, true) => Revision::EmergencyOrder,
      (None, false, false) => Revision::Unchanged,
    }
  }

  pub fn is_unbounded(&self) -> bool { self.indefinite || self.emergency_order }

  /// The delay in whole years: the stated value, or the gap between the
  /// original and revised years. `None` when the delay is unbounded or not
  /// positive.
  pub fn effective_delay_years(&self) -> Option<i32> {
    if self.is_unbounded() {
      return None;
    }
    self
      .delay_years
      .or_else(|| {
        self.revised_year.and_then(|r| r.checked_sub(self.original_year))
      })
      .filter(|years| *years > 0)
  }

  /// Whether the citation reports any postponement at all.
  pub fn reports_delay(&self) -> bool {
    match self.revision() {
      Revision::Revised(year) => {
        year > self.original_year || self.effective_delay_years().is_some()
      }
      Revision::Indefinite | Revision::EmergencyOrder => true,
      Revision::Unchanged => self.effective_delay_years().is_some(),
    }
  }
}

// ─── Merged output ───────────────────────────────────────────────────────────

/// One generator after reconciliation.
///
/// Every optional field serialises as an explicit `null`; the front end
/// renders a placeholder for each key and must never find one missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedRecord {
  /// Authoritative facility id; `None` for research-only records.
  pub facility_id:           Option<i64>,
  pub facility_name:         String,
  /// Authoritative generator id, or the research unit name for
  /// research-only records.
  pub generator_id:          String,
  /// The research unit this generator was matched to, if any.
  pub unit_name:             Option<String>,
  pub research_slug:         Option<String>,
  pub state:                 String,
  pub county:                Option<String>,
  pub city:                  Option<String>,
  pub latitude:              Option<f64>,
  pub longitude:             Option<f64>,
  pub capacity_mw:           Option<f64>,
  pub fuel_type:             String,
  pub operational_status:    Option<String>,
  pub owner:                 Option<String>,
  pub operator:              Option<String>,

  pub data_sources:          BTreeSet<DataSource>,
  pub resolved_planned_date: Option<NaiveDate>,
  pub authoritative_date:    Option<NaiveDate>,
  pub research_date:         Option<NaiveDate>,
  pub delay_months:          Option<i32>,
  pub delay_years:           Option<i32>,
  pub original_planned_year: Option<i32>,
  pub revised_planned_year:  Option<i32>,
  pub indefinite_delay:      bool,
  pub emergency_order:       bool,
  pub extended:              bool,
  pub citation_source:       Option<String>,
  pub citation_url:          Option<String>,
}

impl MergedRecord {
  pub fn has_source(&self, source: DataSource) -> bool {
    self.data_sources.contains(&source)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn citation() -> DelayCitation {
    DelayCitation {
      facility_name:   "Gaston Station".into(),
      state:           "AL".into(),
      operator:        Some("Alabama Power".into()),
      original_year:   2028,
      revised_year:    None,
      delay_years:     None,
      indefinite:      false,
      emergency_order: false,
      source_label:    "Utility IRP".into(),
      source_url:      "https://example.com/irp".into(),
    }
  }

  #[test]
  fn year_end_is_december_31() {
    assert_eq!(year_end(2030), NaiveDate::from_ymd_opt(2030, 12, 31));
  }

  #[test]
  fn retired_research_unit_has_no_planned_date() {
    let unit = ResearchUnit {
      facility_name:           "Gaston".into(),
      facility_slug:           "gaston".into(),
      unit_name:               "Unit 1".into(),
      status:                  "Retired".into(),
      fuel_type:               "coal".into(),
      capacity_mw:             None,
      planned_retirement_year: Some(2028),
      actual_retirement_year:  None,
      state:                   "AL".into(),
      county:                  None,
      owner:                   None,
    };
    assert_eq!(unit.planned_date(), None);
  }

  #[test]
  fn conflicting_flags_are_rejected() {
    let c = DelayCitation {
      revised_year: Some(2035),
      indefinite: true,
      ..citation()
    };
    assert!(matches!(
      c.validate(),
      Err(Error::ConflictingCitationFlags { .. })
    ));
  }

  #[test]
  fn bounded_delay_on_indefinite_is_rejected() {
    let c = DelayCitation {
      indefinite: true,
      delay_years: Some(3),
      ..citation()
    };
    assert!(matches!(
      c.validate(),
      Err(Error::BoundedUnboundedDelay { .. })
    ));
  }

  #[test]
  fn delay_years_derived_from_revised_year() {
    let c = DelayCitation { revised_year: Some(2035), ..citation() };
    assert_eq!(c.effective_delay_years(), Some(7));
    assert!(c.reports_delay());
  }

  #[test]
  fn stated_delay_wins_over_derived() {
    let c = DelayCitation {
      revised_year: Some(2035),
      delay_years: Some(5),
      ..citation()
    };
    assert_eq!(c.effective_delay_years(), Some(5));
  }

  #[test]
  fn oversized_delay_is_rejected() {
    let c = DelayCitation { delay_years: Some(200_000_000), ..citation() };
    assert!(matches!(
      c.validate(),
      Err(Error::CitationOutOfRange { .. })
    ));
    let negative = DelayCitation { delay_years: Some(-1), ..citation() };
    assert!(negative.validate().is_err());
    let max = DelayCitation { delay_years: Some(MAX_DELAY_YEARS), ..citation() };
    assert!(max.validate().is_ok());
  }

  #[test]
  fn years_outside_date_range_are_rejected() {
    let revised = DelayCitation { revised_year: Some(i32::MAX), ..citation() };
    assert!(matches!(
      revised.validate(),
      Err(Error::CitationOutOfRange { .. })
    ));
    let original = DelayCitation { original_year: i32::MIN, ..citation() };
    assert!(matches!(
      original.validate(),
      Err(Error::CitationOutOfRange { .. })
    ));
  }

  #[test]
  fn derived_delay_does_not_overflow() {
    let c = DelayCitation {
      original_year: i32::MIN,
      revised_year: Some(i32::MAX),
      ..citation()
    };
    assert_eq!(c.effective_delay_years(), None);
  }

  #[test]
  fn unchanged_citation_reports_no_delay() {
    assert_eq!(citation().revision(), Revision::Unchanged);
    assert!(!citation().reports_delay());
  }

  #[test]
  fn merged_record_serialises_nulls_explicitly() {
    let record = MergedRecord {
      facility_id:           None,
      facility_name:         "Gaston".into(),
      generator_id:          "1".into(),
      unit_name:             None,
      research_slug:         None,
      state:                 "AL".into(),
      county:                None,
      city:                  None,
      latitude:              None,
      longitude:             None,
      capacity_mw:           None,
      fuel_type:             "coal".into(),
      operational_status:    None,
      owner:                 None,
      operator:              None,
      data_sources:          BTreeSet::from([DataSource::Research]),
      resolved_planned_date: None,
      authoritative_date:    None,
      research_date:         None,
      delay_months:          None,
      delay_years:           None,
      original_planned_year: None,
      revised_planned_year:  None,
      indefinite_delay:      false,
      emergency_order:       false,
      extended:              false,
      citation_source:       None,
      citation_url:          None,
    };
    let json = serde_json::to_value(&record).unwrap();
    assert!(json.get("resolvedPlannedDate").unwrap().is_null());
    assert!(json.get("facilityId").unwrap().is_null());
    assert_eq!(json["dataSources"], serde_json::json!(["research"]));
  }
}
