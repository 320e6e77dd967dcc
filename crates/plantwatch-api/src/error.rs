//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use plantwatch_core::page::Page;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// Neither the authoritative nor the research source could be read.
  #[error("every primary source is unavailable")]
  SourcesUnavailable { page: usize, limit: usize },
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::SourcesUnavailable { page, limit } => {
        // Details stay in the server log; clients get the page shape back.
        let empty = Page::empty(page, limit);
        let body = json!({
          "data":       empty.data,
          "pagination": empty.pagination,
          "error":      "internal server error",
        });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
      }
    }
  }
}
