//! HTTP server wiring for Plantwatch.
//!
//! Mounts the JSON API under `/api` behind the passphrase gate, adds an
//! unauthenticated `/health` check, and wraps everything in request tracing.

pub mod auth;
pub mod error;
pub mod reference;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, middleware, routing::get};
use plantwatch_core::{
  Reconciler,
  dedup::DedupKeyPolicy,
  reconcile::{DEFAULT_PAGE_SIZE, ReconcileConfig},
  source::RetirementSources,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::{AuthConfig, require_passphrase};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `plantwatch.toml` and
/// `PLANTWATCH_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:            String,
  #[serde(default = "default_port")]
  pub port:            u16,
  pub store_path:      PathBuf,
  /// argon2 PHC string of the shared passphrase.
  pub passphrase_hash: String,
  #[serde(default = "default_page_size")]
  pub page_size:       usize,
  #[serde(default)]
  pub dedup_key:       DedupKeyPolicy,
  /// Fuel types of interest; empty keeps every fuel.
  #[serde(default)]
  pub tracked_fuels:   Vec<String>,
  pub aliases_path:    Option<PathBuf>,
  pub citations_path:  Option<PathBuf>,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 8080 }

fn default_page_size() -> usize { DEFAULT_PAGE_SIZE }

impl ServerConfig {
  pub fn reconcile_config(&self) -> ReconcileConfig {
    ReconcileConfig {
      page_size:     self.page_size,
      dedup_key:     self.dedup_key,
      tracked_fuels: self.tracked_fuels.clone(),
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Everything the router needs, shared across requests.
pub struct AppState<S> {
  pub store:      Arc<S>,
  pub reconciler: Arc<Reconciler>,
  pub auth:       Arc<AuthConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

pub fn router<S>(state: AppState<S>) -> Router
where
  S: RetirementSources + 'static,
{
  let api = plantwatch_api::api_router(state.store, state.reconciler)
    .layer(middleware::from_fn_with_state(state.auth, require_passphrase));

  Router::new()
    .route("/health", get(health))
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
}

async fn health() -> &'static str { "ok" }

// ─── Integration tests ────────────────────────────────────────────────────────
