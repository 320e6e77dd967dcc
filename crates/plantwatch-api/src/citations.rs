//! Handler for `GET /citations`.

use axum::{Json, extract::State};
use plantwatch_core::{record::DelayCitation, source::RetirementSources};

use crate::ApiState;

/// `GET /citations`: the loaded delay citations, in file order.
pub async fn list<S>(State(state): State<ApiState<S>>) -> Json<Vec<DelayCitation>>
where
  S: RetirementSources,
{
  Json(state.reconciler.citations().citations().to_vec())
}
