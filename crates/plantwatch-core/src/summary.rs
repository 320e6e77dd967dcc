//! Aggregate statistics over a reconciled set.

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::record::{DataSource, MergedRecord};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCounts {
  pub authoritative: usize,
  pub research:      usize,
  pub manual:        usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
  pub total:             usize,
  pub extended:          usize,
  pub indefinite:        usize,
  pub emergency_orders:  usize,
  /// Records with each source among their provenance.
  pub by_source:         SourceCounts,
  pub total_capacity_mw: f64,
  /// Record count per resolved retirement year.
  pub by_year:           BTreeMap<i32, usize>,
  /// Records without a resolved date.
  pub undated:           usize,
}

pub fn summarize(records: &[MergedRecord]) -> Summary {
  let mut summary = Summary { total: records.len(), ..Summary::default() };

  for r in records {
    summary.extended += usize::from(r.extended);
    summary.indefinite += usize::from(r.indefinite_delay);
    summary.emergency_orders += usize::from(r.emergency_order);
    summary.by_source.authoritative +=
      usize::from(r.has_source(DataSource::Authoritative));
    summary.by_source.research += usize::from(r.has_source(DataSource::Research));
    summary.by_source.manual += usize::from(r.has_source(DataSource::Manual));
    summary.total_capacity_mw += r.capacity_mw.unwrap_or(0.0);

    match r.resolved_planned_date {
      Some(date) => *summary.by_year.entry(date.year()).or_default() += 1,
      None => summary.undated += 1,
    }
  }
  summary
}
