//! The merge and delay engine.
//!
//! Turns matched source records into [`MergedRecord`]s: resolves the planned
//! retirement date, measures the delay between sources, and tags provenance.

use std::collections::{BTreeSet, HashMap};

use chrono::{Datelike, NaiveDate};

use crate::{
  manual::ManualDelayIndex,
  matcher::{ConsumedGroups, Matcher, ResearchIndex},
  record::{
    DataSource, DelayCitation, Facility, FacilityRecord, MergedRecord,
    ResearchUnit, Revision, year_end,
  },
};

// ─── Date arithmetic ─────────────────────────────────────────────────────────

/// Whole calendar months from `earlier` to `later`, counting a partial month
/// as a full one. Positive whenever `later > earlier`; zero when equal.
pub fn months_between(earlier: NaiveDate, later: NaiveDate) -> i32 {
  if later <= earlier {
    return 0;
  }
  let mut months = (later.year() - earlier.year()) * 12
    + later.month() as i32
    - earlier.month() as i32;
  if later.day() > earlier.day() {
    months += 1;
  }
  months
}

// ─── Resolution ──────────────────────────────────────────────────────────────

/// The date-related fields of a merged record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DateResolution {
  pub resolved:      Option<NaiveDate>,
  pub delay_months:  Option<i32>,
  pub delay_years:   Option<i32>,
  pub original_year: Option<i32>,
  pub revised_year:  Option<i32>,
  pub indefinite:    bool,
  pub emergency:     bool,
  pub extended:      bool,
}

/// Combine an authoritative date, a research date and a citation.
///
/// - The later of the two dates wins.
/// - A citation's revised year overrides both unconditionally.
/// - An indefinite or emergency-order citation supplies its original year
///   when nothing else is known.
/// - The citation's delay is reported in preference to the cross-source
///   delta.
pub fn resolve_dates(
  authoritative: Option<NaiveDate>,
  research: Option<NaiveDate>,
  citation: Option<&DelayCitation>,
) -> DateResolution {
  let mut out = DateResolution {
    resolved: match (authoritative, research) {
      (Some(a), Some(r)) => Some(a.max(r)),
      (a, r) => a.or(r),
    },
    ..DateResolution::default()
  };

  let cross_source = match (authoritative, research) {
    (Some(a), Some(r)) if a != r => {
      let (earlier, later) = (a.min(r), a.max(r));
      Some((earlier, later, months_between(earlier, later)))
    }
    _ => None,
  }
  .filter(|(_, _, months)| *months > 0);

  if let Some((earlier, later, months)) = cross_source {
    out.delay_months = Some(months);
    out.delay_years = Some(months / 12).filter(|y| *y > 0);
    out.original_year = Some(earlier.year());
    out.revised_year = Some(later.year());
  }

  if let Some(c) = citation {
    out.original_year = Some(c.original_year);
    out.indefinite = c.indefinite;
    out.emergency = c.emergency_order;

    match c.revision() {
      Revision::Revised(year) => {
        out.revised_year = Some(year);
        if let Some(date) = year_end(year) {
          out.resolved = Some(date);
        }
      }
      Revision::Indefinite | Revision::EmergencyOrder => {
        out.revised_year = None;
        if out.resolved.is_none() {
          out.resolved = year_end(c.original_year);
        }
      }
      Revision::Unchanged => {}
    }

    if let Some(years) = c.effective_delay_years() {
      out.delay_years = Some(years);
      out.delay_months = years.checked_mul(12);
    }
  }

  out.extended =
    out.delay_months.is_some() || citation.is_some_and(DelayCitation::reports_delay);
  out
}

// ─── Engine ──────────────────────────────────────────────────────────────────

/// Everything the engine reads while merging one run. All borrowed, nothing
/// mutated.
#[derive(Debug, Clone, Copy)]
pub struct MergeEngine<'a> {
  pub matcher:    Matcher<'a>,
  pub citations:  &'a ManualDelayIndex,
  pub facilities: &'a HashMap<i64, Facility>,
}

impl MergeEngine<'_> {
  /// Merge every authoritative record, then every research unit that no
  /// authoritative record claimed. Output order follows input order.
  pub fn merge(
    &self,
    records: &[FacilityRecord],
    index: &ResearchIndex,
  ) -> Vec<MergedRecord> {
    let mut consumed = ConsumedGroups::default();
    let mut merged: Vec<MergedRecord> = records
      .iter()
      .filter_map(|r| self.merge_authoritative(r, index, &mut consumed))
      .collect();

    for (id, group) in index.groups() {
      if consumed.contains(id) {
        continue;
      }
      merged.extend(group.units.iter().filter_map(|u| self.merge_research_only(u)));
    }
    merged
  }

  /// Merge one authoritative record with its research match and citation.
  ///
  /// Returns `None` for retired units, for records without a name, and for
  /// records with neither a date nor a citation.
  pub fn merge_authoritative(
    &self,
    record: &FacilityRecord,
    index: &ResearchIndex,
    consumed: &mut ConsumedGroups,
  ) -> Option<MergedRecord> {
    if record.is_retired() || record.facility_name.trim().is_empty() {
      return None;
    }

    let matched = self.matcher.find_and_consume(record, index, consumed);
    let unit = matched.map(|m| m.unit);
    let research_date = unit.and_then(ResearchUnit::planned_date);
    let citation = self.citations.lookup(&record.facility_name, &record.state);

    let dates =
      resolve_dates(record.planned_retirement_date, research_date, citation);
    if dates.resolved.is_none() && citation.is_none() {
      return None;
    }

    let mut sources = BTreeSet::from([DataSource::Authoritative]);
    if unit.is_some() {
      sources.insert(DataSource::Research);
    }
    if citation.is_some() {
      sources.insert(DataSource::Manual);
    }

    let location = self.facilities.get(&record.facility_id);

    Some(MergedRecord {
      facility_id:           Some(record.facility_id),
      facility_name:         record.facility_name.clone(),
      generator_id:          record.generator_id.clone(),
      unit_name:             unit.map(|u| u.unit_name.clone()),
      research_slug:         unit.map(|u| u.facility_slug.clone()),
      state:                 record.state.clone(),
      county:                location
        .and_then(|l| l.county.clone())
        .or_else(|| unit.and_then(|u| u.county.clone())),
      city:                  location.and_then(|l| l.city.clone()),
      latitude:              location.and_then(|l| l.latitude),
      longitude:             location.and_then(|l| l.longitude),
      capacity_mw:           record
        .capacity_mw
        .or_else(|| unit.and_then(|u| u.capacity_mw)),
      fuel_type:             record.fuel_type.clone(),
      operational_status:    Some(record.operational_status.clone()),
      owner:                 unit.and_then(|u| u.owner.clone()),
      operator:              citation.and_then(|c| c.operator.clone()),
      data_sources:          sources,
      resolved_planned_date: dates.resolved,
      authoritative_date:    record.planned_retirement_date,
      research_date,
      delay_months:          dates.delay_months,
      delay_years:           dates.delay_years,
      original_planned_year: dates.original_year,
      revised_planned_year:  dates.revised_year,
      indefinite_delay:      dates.indefinite,
      emergency_order:       dates.emergency,
      extended:              dates.extended,
      citation_source:       citation.map(|c| c.source_label.clone()),
      citation_url:          citation.map(|c| c.source_url.clone()),
    })
  }

  /// Merge a research unit that no authoritative record matched.
  ///
  /// Retired units and units without a planned year carry no signal and
  /// return `None`.
  pub fn merge_research_only(&self, unit: &ResearchUnit) -> Option<MergedRecord> {
    if unit.facility_name.trim().is_empty() {
      return None;
    }
    let research_date = unit.planned_date()?;
    let citation = self.citations.lookup(&unit.facility_name, &unit.state);
    let dates = resolve_dates(None, Some(research_date), citation);

    let mut sources = BTreeSet::from([DataSource::Research]);
    if citation.is_some() {
      sources.insert(DataSource::Manual);
    }

    Some(MergedRecord {
      facility_id:           None,
      facility_name:         unit.facility_name.clone(),
      generator_id:          unit.unit_name.clone(),
      unit_name:             Some(unit.unit_name.clone()),
      research_slug:         Some(unit.facility_slug.clone()),
      state:                 unit.state.clone(),
      county:                unit.county.clone(),
      city:                  None,
      latitude:              None,
      longitude:             None,
      capacity_mw:           unit.capacity_mw,
      fuel_type:             unit.fuel_type.clone(),
      operational_status:    Some(unit.status.clone()),
      owner:                 unit.owner.clone(),
      operator:              citation.and_then(|c| c.operator.clone()),
      data_sources:          sources,
      resolved_planned_date: dates.resolved,
      authoritative_date:    None,
      research_date:         Some(research_date),
      delay_months:          dates.delay_months,
      delay_years:           dates.delay_years,
      original_planned_year: dates.original_year,
      revised_planned_year:  dates.revised_year,
      indefinite_delay:      dates.indefinite,
      emergency_order:       dates.emergency,
      extended:              dates.extended,
      citation_source:       citation.map(|c| c.source_label.clone()),
      citation_url:          citation.map(|c| c.source_url.clone()),
    })
  }
}
