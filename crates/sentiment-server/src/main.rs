//! sentiment-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the SQLite
//! vote store, and either serves the HTTP API or runs a maintenance command.
//!
//! ```
//! sentiment-server                          # serve
//! sentiment-server seed --count 97          # insert synthetic votes
//! sentiment-server purge --before 2024-01-01
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use sentiment_api::AppState;
use sentiment_server::{SeedOptions, ServerConfig};
use sentiment_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Market sentiment voting server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the HTTP API (the default).
  Serve,
  /// Insert synthetic votes, each from a distinct throwaway identity.
  Seed {
    #[arg(long, default_value_t = 97)]
    count:  usize,
    /// Centre of the progress distribution.
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u8).range(0..=100))]
    center: u8,
    /// Maximum distance from the centre; results are clamped to 0..=100.
    #[arg(long, default_value_t = 15, value_parser = clap::value_parser!(u8).range(0..=100))]
    spread: u8,
  },
  /// Delete every vote cast before midnight UTC of the given day.
  Purge {
    /// Cutoff day, `YYYY-MM-DD`.
    #[arg(long)]
    before: NaiveDate,
  },
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
  let server_cfg = ServerConfig::load(&cli.config)?;

  let store = SqliteStore::open(&server_cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", server_cfg.store_path))?;

  match cli.command.unwrap_or(Command::Serve) {
    Command::Serve => serve(store, &server_cfg).await,
    Command::Seed { count, center, spread } => {
      let recorded = sentiment_server::seed(&store, SeedOptions { count, center, spread })
        .await
        .context("failed to seed votes")?;
      println!("seeded {recorded} votes");
      Ok(())
    }
    Command::Purge { before } => {
      let removed = sentiment_server::purge(&store, before)
        .await
        .context("failed to purge votes")?;
      println!("removed {removed} votes");
      Ok(())
    }
  }
}

async fn serve(store: SqliteStore, server_cfg: &ServerConfig) -> anyhow::Result<()> {
  // The store stamps votes and the handlers compute day windows; both must
  // read the same clock.
  let clock = store.clock();
  let state = AppState::new(Arc::new(store), clock);

  let app = sentiment_server::app(state);
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
