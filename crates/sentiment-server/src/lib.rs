//! Server wiring for the sentiment voting service: configuration, the HTTP
//! application, and the offline maintenance commands.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use axum::Router;
use chrono::NaiveDate;
use rand_core::{OsRng, RngCore as _};
use sentiment_api::AppState;
use sentiment_core::{
  clock::midnight,
  identity::SubmitterIdentity,
  store::VoteStore,
  vote::{CastOutcome, NewVote, Progress},
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `SENTIMENT_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

impl ServerConfig {
  /// Layer defaults, the optional TOML file at `path`, then the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .set_default("host", "0.0.0.0")?
      .set_default("port", 3000)?
      .set_default("store_path", "sentiment.sqlite3")?
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("SENTIMENT"))
      .build()
      .context("failed to read config file")?;

    let mut cfg: ServerConfig = settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")?;
    cfg.store_path = expand_tilde(&cfg.store_path);
    Ok(cfg)
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Application ──────────────────────────────────────────────────────────────

/// The full HTTP application: the JSON API under `/api`, with request tracing.
pub fn app<S>(state: AppState<S>) -> Router
where
  S: VoteStore + 'static,
{
  Router::new()
    .nest("/api", sentiment_api::api_router(state))
    .layer(TraceLayer::new_for_http())
}

// ─── Maintenance ──────────────────────────────────────────────────────────────

/// Parameters for [`seed`].
#[derive(Debug, Clone, Copy)]
pub struct SeedOptions {
  pub count:  usize,
  pub center: u8,
  pub spread: u8,
}

impl Default for SeedOptions {
  fn default() -> Self { Self { count: 97, center: 50, spread: 15 } }
}

/// Insert `count` synthetic votes spread uniformly over `center ± spread`,
/// clamped to `0..=100`. Each vote gets its own throwaway identity.
///
/// Returns the number of votes recorded.
pub async fn seed<S>(store: &S, opts: SeedOptions) -> Result<usize, S::Error>
where
  S: VoteStore,
{
  let width = 2 * u32::from(opts.spread) + 1;
  let mut recorded = 0;

  for _ in 0..opts.count {
    let offset = i64::from(OsRng.next_u32() % width) - i64::from(opts.spread);
    let progress = Progress::saturating(i64::from(opts.center) + offset);
    let submitter = SubmitterIdentity::new(format!("seed_{}", uuid::Uuid::new_v4()));

    if let CastOutcome::Recorded(_) = store.create(NewVote::new(progress, submitter)).await? {
      recorded += 1;
    }
  }

  tracing::info!(requested = opts.count, recorded, "seeded votes");
  Ok(recorded)
}

/// Delete every vote cast before midnight UTC at the start of `before`.
pub async fn purge<S>(store: &S, before: NaiveDate) -> Result<usize, S::Error>
where
  S: VoteStore,
{
  let cutoff = midnight(before);
  let removed = store.delete_before(cutoff).await?;
  tracing::info!(%cutoff, removed, "purged votes");
  Ok(removed)
}
