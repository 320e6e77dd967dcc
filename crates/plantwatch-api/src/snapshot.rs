//! Fetching a [`SourceSnapshot`] for one request.
//!
//! A failing source is logged and treated as empty so the request can still be
//! answered from the others. Only when both primary sources fail does the
//! request fail.

use std::collections::BTreeSet;

use plantwatch_core::{
  SourceSnapshot,
  filter::{FilterAdjustment, Filters},
  record::FacilityRecord,
  source::RetirementSources,
};
use tracing::{debug, error, warn};

use crate::{ApiError, ApiState};

/// Log every filter value that was replaced by its default.
pub fn log_adjustments(filters: &Filters) {
  for adjustment in &filters.adjustments {
    match adjustment {
      FilterAdjustment::State(raw) => {
        warn!(state = %raw, "ignoring invalid state filter");
      }
      FilterAdjustment::Page(raw) => {
        warn!(page = %raw, "invalid page number, using page 1");
      }
    }
  }
}

impl<S> ApiState<S>
where
  S: RetirementSources,
{
  /// Read all three inputs of a reconciliation run.
  pub async fn snapshot(&self, filters: &Filters) -> Result<SourceSnapshot, ApiError> {
    let store = self.store.as_ref();

    let (generators, research) = tokio::join!(
      load_generators(store, filters),
      store.fetch_research_units(filters),
    );

    let generators = generators
      .inspect_err(|e| warn!(error = %e, "authoritative source unavailable"));
    let research =
      research.inspect_err(|e| warn!(error = %e, "research source unavailable"));

    let (generators, research) = match (generators, research) {
      (Err(_), Err(_)) => {
        error!("no primary source could be read");
        return Err(ApiError::SourcesUnavailable {
          page:  filters.page,
          limit: self.reconciler.config().page_size,
        });
      }
      (g, r) => (g.unwrap_or_default(), r.unwrap_or_default()),
    };

    if research.is_empty() {
      warn!("research source returned no units");
    }

    let ids: BTreeSet<i64> = generators.iter().map(|g| g.facility_id).collect();
    let facilities = if ids.is_empty() {
      Default::default()
    } else {
      store
        .fetch_facilities(ids.into_iter().collect())
        .await
        .inspect_err(|e| warn!(error = %e, "facility locations unavailable"))
        .unwrap_or_default()
    };

    debug!(
      generators = generators.len(),
      facilities = facilities.len(),
      research = research.len(),
      "fetched sources"
    );

    Ok(SourceSnapshot { generators, facilities, research })
  }
}

/// Generators from the newest filing snapshot. No snapshot at all is an
/// empty source, not a failure.
async fn load_generators<S>(
  store: &S,
  filters: &Filters,
) -> Result<Vec<FacilityRecord>, S::Error>
where
  S: RetirementSources,
{
  let Some(report_date) = store.latest_report_date().await? else {
    warn!("no authoritative snapshot loaded");
    return Ok(Vec::new());
  };
  let generators = store.fetch_generators(report_date, filters).await?;
  debug!(%report_date, count = generators.len(), "fetched generators");
  Ok(generators)
}
