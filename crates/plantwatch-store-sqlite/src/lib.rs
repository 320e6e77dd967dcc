//! SQLite backend for the Plantwatch source datasets.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Implements
//! [`plantwatch_core::source::RetirementSources`] for reads and offers bulk
//! import methods for loading snapshots.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
