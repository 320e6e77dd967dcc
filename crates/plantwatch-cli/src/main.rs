//! `plantwatch`: command-line companion to the Plantwatch server.
//!
//! # Usage
//!
//! ```
//! plantwatch import --store plantwatch.db --report-date 2024-06-01 --generators generators.json
//! plantwatch --url http://localhost:8080 --passphrase secret list --state AL --fuel Coal
//! plantwatch --config ~/.config/plantwatch/cli.toml summary
//! ```

mod client;
mod import;
mod table;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use import::ImportPlan;
use plantwatch_core::filter::FilterParams;
use plantwatch_store_sqlite::SqliteStore;
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "plantwatch", about = "Power-plant retirement tracker")]
struct Args {
  /// Path to a TOML config file (url, passphrase).
  #[arg(short, long, value_name = "FILE", global = true)]
  config: Option<PathBuf>,

  /// Base URL of the plantwatch server (default: http://localhost:8080).
  #[arg(long, env = "PLANTWATCH_URL", global = true)]
  url: Option<String>,

  /// Shared API passphrase (plaintext).
  #[arg(long, env = "PLANTWATCH_PASSPHRASE", global = true, hide_env_values = true)]
  passphrase: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Load JSON datasets into a local SQLite store.
  Import {
    /// SQLite file to write (created if missing).
    #[arg(long)]
    store: PathBuf,

    /// Filing date of the generators snapshot.
    #[arg(long, requires = "generators")]
    report_date: Option<NaiveDate>,

    /// JSON array of authoritative generator records.
    #[arg(long, requires = "report_date")]
    generators: Option<PathBuf>,

    /// JSON array of facility locations.
    #[arg(long)]
    facilities: Option<PathBuf>,

    /// JSON array of research wiki units.
    #[arg(long)]
    research: Option<PathBuf>,
  },

  /// Print one page of reconciled retirements.
  List {
    #[arg(long)]
    state: Option<String>,
    #[arg(long)]
    fuel:  Option<String>,
    #[arg(long)]
    page:  Option<usize>,
  },

  /// Print aggregate counts over the reconciled set.
  Summary {
    #[arg(long)]
    state: Option<String>,
    #[arg(long)]
    fuel:  Option<String>,
  },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:        String,
  #[serde(default)]
  passphrase: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  match args.command {
    Command::Import { store, report_date, generators, facilities, research } => {
      let plan = ImportPlan {
        generators: report_date.zip(generators),
        facilities,
        research,
      };
      let db = SqliteStore::open(&store)
        .await
        .with_context(|| format!("opening store {}", store.display()))?;
      let report = import::run(&db, &plan).await?;
      println!(
        "imported {} generators, {} facilities, {} research units",
        report.generators, report.facilities, report.research
      );
    }

    Command::List { state, fuel, page } => {
      let client = connect(args.config, args.url, args.passphrase)?;
      let params = FilterParams {
        state,
        fuel_type: fuel,
        page: page.map(|p| p.to_string()),
      };
      let page = client.list_retirements(&params).await?;
      print!("{}", table::render_page(&page));
    }

    Command::Summary { state, fuel } => {
      let client = connect(args.config, args.url, args.passphrase)?;
      let params = FilterParams { state, fuel_type: fuel, page: None };
      let summary = client.summary(&params).await?;
      print!("{}", table::render_summary(&summary));
    }
  }

  Ok(())
}

/// CLI flags override the config file, which overrides defaults.
fn connect(
  config: Option<PathBuf>,
  url: Option<String>,
  passphrase: Option<String>,
) -> Result<ApiClient> {
  let file_cfg: ConfigFile = if let Some(path) = &config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  ApiClient::new(ApiConfig {
    base_url:   url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| "http://localhost:8080".to_string()),
    passphrase: passphrase
      .or_else(|| (!file_cfg.passphrase.is_empty()).then(|| file_cfg.passphrase.clone()))
      .unwrap_or_default(),
  })
}
