//! plantwatch-server binary.
//!
//! Reads `plantwatch.toml` (or the path given with `--config`), opens the
//! SQLite store, loads the alias and citation files, and serves the API over
//! HTTP.
//!
//! # Passphrase hash generation
//!
//! To generate the argon2 PHC string for `passphrase_hash`:
//!
//! ```
//! cargo run -p plantwatch-server -- --hash-passphrase
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use clap::Parser;
use plantwatch_core::Reconciler;
use plantwatch_server::{
  AppState, ServerConfig,
  auth::AuthConfig,
  reference::{load_aliases, load_citations},
};
use plantwatch_store_sqlite::SqliteStore;
use rand_core::OsRng;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Plantwatch retirement tracker server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "plantwatch.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a passphrase entered on stdin and exit.
  #[arg(long)]
  hash_passphrase: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  if cli.hash_passphrase {
    let passphrase = read_passphrase()?;
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(passphrase.as_bytes(), &salt)
      .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?
      .to_string();
    println!("{hash}");
    return Ok(());
  }

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(
      config::Environment::with_prefix("PLANTWATCH")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("tracked_fuels"),
    )
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let aliases_path = server_cfg.aliases_path.as_deref().map(expand_tilde);
  let aliases = load_aliases(aliases_path.as_deref())
    .context("failed to load name aliases")?;

  let citations_path = server_cfg.citations_path.as_deref().map(expand_tilde);
  let citations = load_citations(citations_path.as_deref())
    .context("failed to load delay citations")?;

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let snapshots = store
    .report_dates()
    .await
    .context("failed to list generator snapshots")?;
  match snapshots.first() {
    Some(latest) => tracing::info!(
      snapshots = snapshots.len(),
      %latest,
      "opened store at {store_path:?}"
    ),
    None => tracing::warn!("store at {store_path:?} has no generator snapshot"),
  }

  let state = AppState {
    store:      Arc::new(store),
    reconciler: Arc::new(Reconciler::new(
      aliases,
      citations,
      server_cfg.reconcile_config(),
    )),
    auth:       Arc::new(AuthConfig {
      passphrase_hash: server_cfg.passphrase_hash.clone(),
    }),
  };

  let app = plantwatch_server::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!(
    page_size = server_cfg.page_size,
    dedup_key = ?server_cfg.dedup_key,
    "Listening on http://{address}"
  );
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Read a passphrase from stdin.
fn read_passphrase() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  print!("Passphrase: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(line.trim_end_matches(['\n', '\r']).to_string())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
