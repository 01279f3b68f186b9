//! JSON REST API for the sentiment voting service.
//!
//! Exposes an axum [`Router`] backed by any [`sentiment_core::store::VoteStore`].
//! TLS and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", sentiment_api::api_router(state))
//! ```

pub mod error;
pub mod identity;
pub mod phases;
pub mod sentiment;

use std::sync::Arc;

use axum::{Router, routing::get};
use sentiment_core::{clock::Clock, store::VoteStore};

pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers. The clock is the single source
/// of "now" for the dedup guard and the today/yesterday split, and should be
/// the same clock the store stamps votes with.
pub struct AppState<S> {
  pub store: Arc<S>,
  pub clock: Arc<dyn Clock>,
}

impl<S> AppState<S> {
  pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self { Self { store, clock } }
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self { store: self.store.clone(), clock: self.clock.clone() }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: VoteStore + 'static,
{
  Router::new()
    .route("/sentiment", get(sentiment::list::<S>).post(sentiment::cast::<S>))
    .route("/sentiment/check", get(sentiment::check::<S>))
    .route("/sentiment/summary", get(sentiment::summary::<S>))
    .route("/phases", get(phases::catalogue))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
