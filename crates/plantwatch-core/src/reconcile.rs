//! The reconciliation entry point.
//!
//! A [`Reconciler`] owns the immutable reference data (alias table, manual
//! citations) and configuration. Each call to [`Reconciler::reconcile`] works
//! on its own collections, so one reconciler can serve any number of
//! concurrent requests.
//!
//! Pipeline: filter → match and merge → dedupe → sort → (paginate).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
  alias::AliasTable,
  dedup::{DedupKeyPolicy, dedupe},
  filter::{Filters, authoritative_fuel_matches, research_fuel_matches},
  manual::ManualDelayIndex,
  matcher::{Matcher, ResearchIndex},
  merge::MergeEngine,
  page::{Page, paginate, sort_by_planned_date},
  record::{Facility, FacilityRecord, MergedRecord, ResearchUnit},
  summary::{Summary, summarize},
};

pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Tunables for a [`Reconciler`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
  pub page_size:     usize,
  pub dedup_key:     DedupKeyPolicy,
  /// Fuel labels of interest. Empty means every fuel. Matched per source the
  /// same way as the `fuelType` filter.
  pub tracked_fuels: Vec<String>,
}

impl Default for ReconcileConfig {
  fn default() -> Self {
    Self {
      page_size:     DEFAULT_PAGE_SIZE,
      dedup_key:     DedupKeyPolicy::default(),
      tracked_fuels: Vec::new(),
    }
  }
}

/// The fetched inputs of one reconciliation run.
#[derive(Debug, Clone, Default)]
pub struct SourceSnapshot {
  /// Generators from the newest authoritative snapshot.
  pub generators: Vec<FacilityRecord>,
  pub facilities: HashMap<i64, Facility>,
  pub research:   Vec<ResearchUnit>,
}

#[derive(Debug, Clone, Default)]
pub struct Reconciler {
  aliases:   AliasTable,
  citations: ManualDelayIndex,
  config:    ReconcileConfig,
}

impl Reconciler {
  pub fn new(
    aliases: AliasTable,
    citations: ManualDelayIndex,
    config: ReconcileConfig,
  ) -> Self {
    Self { aliases, citations, config }
  }

  pub fn citations(&self) -> &ManualDelayIndex { &self.citations }

  pub fn config(&self) -> &ReconcileConfig { &self.config }

  fn tracks_authoritative(&self, record: &FacilityRecord) -> bool {
    self.config.tracked_fuels.is_empty()
      || self
        .config
        .tracked_fuels
        .iter()
        .any(|f| authoritative_fuel_matches(&record.fuel_type, f))
  }

  fn tracks_research(&self, unit: &ResearchUnit) -> bool {
    self.config.tracked_fuels.is_empty()
      || self
        .config
        .tracked_fuels
        .iter()
        .any(|f| research_fuel_matches(&unit.fuel_type, f))
  }

  /// Produce the full merged, deduplicated and sorted record set.
  ///
  /// Deterministic: the same snapshot and filters always give the same
  /// records in the same order.
  pub fn reconcile(
    &self,
    snapshot: &SourceSnapshot,
    filters: &Filters,
  ) -> Vec<MergedRecord> {
    let generators: Vec<FacilityRecord> = snapshot
      .generators
      .iter()
      .filter(|r| self.tracks_authoritative(r) && filters.matches_authoritative(r))
      .cloned()
      .collect();

    let index = ResearchIndex::build(
      snapshot
        .research
        .iter()
        .filter(|u| self.tracks_research(u) && filters.matches_research(u))
        .cloned(),
    );

    let engine = MergeEngine {
      matcher:    Matcher::new(&self.aliases),
      citations:  &self.citations,
      facilities: &snapshot.facilities,
    };
    let merged = engine.merge(&generators, &index);
    let merged_count = merged.len();

    let mut records = dedupe(merged, self.config.dedup_key);
    sort_by_planned_date(&mut records);

    tracing::debug!(
      generators = generators.len(),
      research_groups = index.len(),
      research_dropped = index.dropped(),
      merged = merged_count,
      kept = records.len(),
      "reconciled sources"
    );
    records
  }

  /// Reconcile and slice the page named in `filters`.
  pub fn page(&self, snapshot: &SourceSnapshot, filters: &Filters) -> Page {
    paginate(
      self.reconcile(snapshot, filters),
      filters.page,
      self.config.page_size,
    )
  }

  /// Reconcile and aggregate the full set.
  pub fn summary(&self, snapshot: &SourceSnapshot, filters: &Filters) -> Summary {
    summarize(&self.reconcile(snapshot, filters))
  }
}
