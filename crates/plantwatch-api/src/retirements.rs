//! Handler for `GET /retirements`.
//!
//! Query params: `state` (two letters), `fuelType`, `page`. Invalid values fall
//! back to their defaults instead of being rejected.

use axum::{
  Json,
  extract::{Query, State},
};
use plantwatch_core::{filter::FilterParams, page::Page, source::RetirementSources};
use tracing::debug;

use crate::{ApiError, ApiState, snapshot::log_adjustments};

/// `GET /retirements[?state=..][&fuelType=..][&page=..]`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<FilterParams>,
) -> Result<Json<Page>, ApiError>
where
  S: RetirementSources,
{
  let filters = params.sanitize();
  log_adjustments(&filters);

  let snapshot = state.snapshot(&filters).await?;
  let page = state.reconciler.page(&snapshot, &filters);
  debug!(
    page = page.pagination.page,
    total = page.pagination.total,
    returned = page.data.len(),
    "served retirements page"
  );
  Ok(Json(page))
}
