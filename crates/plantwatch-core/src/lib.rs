//! Core types and the reconciliation engine for Plantwatch.
//!
//! This crate is deliberately free of HTTP and database dependencies. It turns
//! three disagreeing views of power-plant retirements (authoritative filings,
//! a research wiki, hand-curated delay citations) into one merged,
//! deduplicated, source-annotated record set.

pub mod alias;
pub mod dedup;
pub mod error;
pub mod filter;
pub mod manual;
pub mod matcher;
pub mod merge;
pub mod normalize;
pub mod page;
pub mod reconcile;
pub mod record;
pub mod source;
pub mod summary;

pub use error::{Error, Result};
pub use reconcile::{ReconcileConfig, Reconciler, SourceSnapshot};
