//! [`SqliteStore`] — the SQLite implementation of [`VoteStore`].

use std::{path::Path, sync::Arc};

use chrono::{DateTime, SubsecRound as _, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use sentiment_core::{
  clock::{Clock, SystemClock, utc_day},
  identity::SubmitterIdentity,
  store::VoteStore,
  vote::{CastOutcome, NewVote, Vote},
};

use crate::{
  Result,
  encode::{RawVote, encode_day, encode_dt, encode_uuid},
  schema::SCHEMA,
};

const VOTE_COLUMNS: &str = "vote_id, progress, submitter_digest, created_at";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A vote store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection and clock are reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn:  tokio_rusqlite::Connection,
  clock: Arc<dyn Clock>,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::init(conn).await
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::init(conn).await
  }

  async fn init(conn: tokio_rusqlite::Connection) -> Result<Self> {
    conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(Self { conn, clock: Arc::new(SystemClock) })
  }

  /// Replace the clock used to stamp `created_at`. Share the same clock with
  /// the HTTP layer so both agree on the current UTC day.
  pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
    self.clock = clock;
    self
  }

  pub fn clock(&self) -> Arc<dyn Clock> { self.clock.clone() }

  /// Total number of stored votes.
  pub async fn count(&self) -> Result<usize> {
    let n: i64 = self
      .conn
      .call(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM votes", [], |r| r.get(0))?))
      .await?;
    Ok(usize::try_from(n).unwrap_or_default())
  }
}

// ─── VoteStore impl ──────────────────────────────────────────────────────────

impl VoteStore for SqliteStore {
  type Error = crate::Error;

  async fn create(&self, input: NewVote) -> Result<CastOutcome> {
    let vote = Vote {
      id:               Uuid::new_v4(),
      progress:         input.progress,
      submitter_digest: input.submitter.digest(),
      // Stored with microsecond precision; the returned vote must match reads.
      created_at:       self.clock.now().trunc_subsecs(6),
    };

    let id_str     = encode_uuid(vote.id);
    let progress   = i64::from(vote.progress.get());
    let digest     = vote.submitter_digest.clone();
    let at_str     = encode_dt(vote.created_at);
    let day_str    = encode_day(utc_day(vote.created_at));

    // The conflict clause makes check-and-insert a single statement; a
    // concurrent duplicate simply affects zero rows.
    let inserted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "INSERT INTO votes (vote_id, progress, submitter_digest, created_at, vote_day)
           VALUES (?1, ?2, ?3, ?4, ?5)
           ON CONFLICT (submitter_digest, vote_day) DO NOTHING",
          rusqlite::params![id_str, progress, digest, at_str, day_str],
        )?)
      })
      .await?;

    if inserted == 0 {
      tracing::debug!(day = %utc_day(vote.created_at), "vote slot already taken");
      return Ok(CastOutcome::AlreadyVoted);
    }
    Ok(CastOutcome::Recorded(vote))
  }

  async fn find_by_identity_since(
    &self,
    submitter: &SubmitterIdentity,
    since: DateTime<Utc>,
  ) -> Result<Option<Vote>> {
    let digest    = submitter.digest();
    let since_str = encode_dt(since);

    let raw: Option<RawVote> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {VOTE_COLUMNS} FROM votes
                 WHERE submitter_digest = ?1 AND created_at >= ?2
                 ORDER BY created_at DESC
                 LIMIT 1"
              ),
              rusqlite::params![digest, since_str],
              RawVote::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawVote::into_vote).transpose()
  }

  async fn list_in_range(
    &self,
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
  ) -> Result<Vec<Vote>> {
    let start_str = encode_dt(start);
    let end_str   = end.map(encode_dt);

    let raws: Vec<RawVote> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {VOTE_COLUMNS} FROM votes
           WHERE created_at >= ?1
             AND (?2 IS NULL OR created_at < ?2)
           ORDER BY created_at ASC, rowid ASC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![start_str, end_str], RawVote::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawVote::into_vote).collect()
  }

  async fn delete_before(&self, cutoff: DateTime<Utc>) -> Result<usize> {
    let cutoff_str = encode_dt(cutoff);

    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM votes WHERE created_at < ?1",
          rusqlite::params![cutoff_str],
        )?)
      })
      .await?;

    Ok(removed)
  }
}
