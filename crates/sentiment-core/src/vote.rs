//! Vote types — the single entity persisted by the service.
//!
//! A vote is immutable once recorded. The submitter is kept only as a digest
//! and never leaves the server.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, identity::SubmitterIdentity};

// ─── Progress ────────────────────────────────────────────────────────────────

/// A submitted sentiment value, guaranteed to lie in `0..=100`.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Progress(u8);

impl Progress {
  pub const MIN: Progress = Progress(0);
  pub const MAX: Progress = Progress(100);

  pub fn new(value: u8) -> Result<Self> {
    if value > Self::MAX.0 {
      return Err(Error::ProgressOutOfRange(f64::from(value)));
    }
    Ok(Self(value))
  }

  /// Clamp an arbitrary integer into range. Used for synthetic votes only.
  pub fn saturating(value: i64) -> Self {
    Self(value.clamp(i64::from(Self::MIN.0), i64::from(Self::MAX.0)) as u8)
  }

  pub fn get(self) -> u8 { self.0 }
}

impl TryFrom<u8> for Progress {
  type Error = Error;

  fn try_from(value: u8) -> Result<Self> { Self::new(value) }
}

/// JSON numbers arrive as `f64`; only whole numbers in range are accepted.
impl TryFrom<f64> for Progress {
  type Error = Error;

  fn try_from(value: f64) -> Result<Self> {
    if !value.is_finite() {
      return Err(Error::ProgressNotFinite(value));
    }
    if value.fract() != 0.0 {
      return Err(Error::ProgressNotInteger(value));
    }
    if !(0.0..=100.0).contains(&value) {
      return Err(Error::ProgressOutOfRange(value));
    }
    Ok(Self(value as u8))
  }
}

impl From<Progress> for u8 {
  fn from(p: Progress) -> Self { p.0 }
}

impl fmt::Display for Progress {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// ─── Vote ────────────────────────────────────────────────────────────────────

/// A recorded vote. Serialises without the submitter digest.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
  pub id:               Uuid,
  pub progress:         Progress,
  /// SHA-256 hex digest of the submitter identity.
  #[serde(skip)]
  pub submitter_digest: String,
  /// Server-assigned timestamp; never changes after creation.
  pub created_at:       DateTime<Utc>,
}

// ─── NewVote ─────────────────────────────────────────────────────────────────

/// Input to [`crate::store::VoteStore::create`].
/// `id` and `created_at` are always set by the store.
#[derive(Debug, Clone)]
pub struct NewVote {
  pub progress:  Progress,
  pub submitter: SubmitterIdentity,
}

impl NewVote {
  pub fn new(progress: Progress, submitter: SubmitterIdentity) -> Self {
    Self { progress, submitter }
  }
}

/// Result of an insert attempt against the one-vote-per-day constraint.
#[derive(Debug, Clone)]
pub enum CastOutcome {
  Recorded(Vote),
  /// The submitter already holds a vote for the current UTC day.
  AlreadyVoted,
}

impl CastOutcome {
  pub fn into_vote(self) -> Option<Vote> {
    match self {
      Self::Recorded(v) => Some(v),
      Self::AlreadyVoted => None,
    }
  }
}
