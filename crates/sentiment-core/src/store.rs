//! The `VoteStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `sentiment-store-sqlite`).
//! The HTTP layer and maintenance commands depend on this abstraction, not on
//! any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::{
  identity::SubmitterIdentity,
  vote::{CastOutcome, NewVote, Vote},
};

/// Abstraction over a vote store backend.
///
/// Votes are append-only from the request path. The store assigns `id` and
/// `created_at` itself, and enforces at most one vote per submitter per UTC
/// day atomically with the insert.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait VoteStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Record a vote, or report [`CastOutcome::AlreadyVoted`] if the submitter
  /// already voted on the store clock's current UTC day.
  fn create(
    &self,
    input: NewVote,
  ) -> impl Future<Output = Result<CastOutcome, Self::Error>> + Send + '_;

  /// The most recent vote by `submitter` with `created_at >= since`.
  fn find_by_identity_since<'a>(
    &'a self,
    submitter: &'a SubmitterIdentity,
    since: DateTime<Utc>,
  ) -> impl Future<Output = Result<Option<Vote>, Self::Error>> + Send + 'a;

  /// Votes with `start <= created_at < end`, oldest first. `end = None` is
  /// unbounded.
  fn list_in_range(
    &self,
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
  ) -> impl Future<Output = Result<Vec<Vote>, Self::Error>> + Send + '_;

  /// Delete votes with `created_at < cutoff`, returning how many were removed.
  /// Maintenance only; never called from a request handler.
  fn delete_before(
    &self,
    cutoff: DateTime<Utc>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;
}
