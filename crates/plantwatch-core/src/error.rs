//! Error types for `plantwatch-core`.
//!
//! The reconciliation pipeline itself is total: it never fails on record data.
//! Errors here are reserved for reference data (aliases, citations) that is
//! rejected when the lookup tables are constructed.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error(
    "citation for {facility:?} ({state}) sets more than one of revised year, \
     indefinite, emergency order"
  )]
  ConflictingCitationFlags { facility: String, state: String },

  #[error(
    "citation for {facility:?} ({state}) has a bounded delay on an unbounded \
     revision"
  )]
  BoundedUnboundedDelay { facility: String, state: String },

  #[error(
    "citation for {facility:?} ({state}) has a year or delay outside the \
     supported range"
  )]
  CitationOutOfRange { facility: String, state: String },

  #[error("citation has an empty facility name or state")]
  CitationMissingIdentity,

  #[error("alias pair has an empty side: {0:?} <-> {1:?}")]
  EmptyAlias(String, String),

  #[error("reference data error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
