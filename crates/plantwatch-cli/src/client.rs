//! Async HTTP client wrapping the Plantwatch JSON API.

use anyhow::{Context, Result, anyhow};
use plantwatch_core::{filter::FilterParams, page::Page, summary::Summary};
use reqwest::Client;
use std::time::Duration;

/// Connection settings for the Plantwatch API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url:   String,
  /// Shared passphrase; empty sends no credentials.
  pub passphrase: String,
}

/// Async HTTP client for the Plantwatch JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    if self.config.passphrase.is_empty() {
      req
    } else {
      // The server ignores the user name.
      req.basic_auth("plantwatch", Some(&self.config.passphrase))
    }
  }

  /// `GET /api/retirements?state=..&fuelType=..&page=..`
  pub async fn list_retirements(&self, filters: &FilterParams) -> Result<Page> {
    let resp = self
      .auth(self.client.get(self.url("/retirements")))
      .query(filters)
      .send()
      .await
      .context("GET /retirements failed")?;

    if !resp.status().is_success() {
      return Err(anyhow!("GET /retirements → {}", resp.status()));
    }
    resp.json().await.context("deserialising retirements page")
  }

  /// `GET /api/summary?state=..&fuelType=..`
  pub async fn summary(&self, filters: &FilterParams) -> Result<Summary> {
    let resp = self
      .auth(self.client.get(self.url("/summary")))
      .query(filters)
      .send()
      .await
      .context("GET /summary failed")?;

    if !resp.status().is_success() {
      return Err(anyhow!("GET /summary → {}", resp.status()));
    }
    resp.json().await.context("deserialising summary")
  }
}
