//! Error types and axum `IntoResponse` implementation.

use std::path::PathBuf;

use axum::{
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unauthorized")]
  Unauthorized,

  #[error("failed to read {path:?}: {source}")]
  ReadReference {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("invalid reference data: {0}")]
  Reference(#[from] plantwatch_core::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::Unauthorized => {
        let mut res = (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
        res.headers_mut().insert(
          header::WWW_AUTHENTICATE,
          HeaderValue::from_static("Basic realm=\"plantwatch\""),
        );
        res
      }
      Error::ReadReference { .. } | Error::Reference(_) => {
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
      }
    }
  }
}
