//! Handler for `GET /summary`: aggregate counts over the full reconciled set.

use axum::{
  Json,
  extract::{Query, State},
};
use plantwatch_core::{filter::FilterParams, source::RetirementSources, summary::Summary};

use crate::{ApiError, ApiState, snapshot::log_adjustments};

/// `GET /summary[?state=..][&fuelType=..]`. `page` is accepted and ignored.
pub async fn handler<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<FilterParams>,
) -> Result<Json<Summary>, ApiError>
where
  S: RetirementSources,
{
  let filters = params.sanitize();
  log_adjustments(&filters);

  let snapshot = state.snapshot(&filters).await?;
  Ok(Json(state.reconciler.summary(&snapshot, &filters)))
}
