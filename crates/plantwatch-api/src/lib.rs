//! JSON REST API for Plantwatch.
//!
//! Exposes an axum [`Router`] backed by any
//! [`plantwatch_core::source::RetirementSources`]. Auth, TLS, and transport
//! concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", plantwatch_api::api_router(store.clone(), reconciler.clone()))
//! ```

pub mod citations;
pub mod error;
pub mod retirements;
pub mod snapshot;
pub mod summary;

use std::sync::Arc;

use axum::{Router, routing::get};
use plantwatch_core::{Reconciler, source::RetirementSources};

pub use error::ApiError;

/// Shared state for every API handler.
pub struct ApiState<S> {
  pub store:      Arc<S>,
  pub reconciler: Arc<Reconciler>,
}

// Manual impl: `S` itself need not be `Clone`.
impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store:      Arc::clone(&self.store),
      reconciler: Arc::clone(&self.reconciler),
    }
  }
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>, reconciler: Arc<Reconciler>) -> Router<()>
where
  S: RetirementSources + 'static,
{
  Router::new()
    .route("/retirements", get(retirements::list::<S>))
    .route("/summary", get(summary::handler::<S>))
    .route("/citations", get(citations::list::<S>))
    .with_state(ApiState { store, reconciler })
}

#[cfg(test)]
mod tests;
