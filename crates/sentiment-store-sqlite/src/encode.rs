//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings with a fixed microsecond width
//! and a `Z` suffix, so lexical order equals chronological order and range
//! filters can compare strings. UUIDs are stored as hyphenated lowercase
//! strings.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use sentiment_core::vote::{Progress, Vote};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_day(day: NaiveDate) -> String { day.format("%Y-%m-%d").to_string() }

// ─── Progress ─────────────────────────────────────────────────────────────────

pub fn decode_progress(v: i64) -> Result<Progress> {
  let byte = u8::try_from(v)
    .map_err(|_| sentiment_core::Error::ProgressOutOfRange(v as f64))?;
  Ok(Progress::new(byte)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `votes` row.
pub struct RawVote {
  pub vote_id:          String,
  pub progress:         i64,
  pub submitter_digest: String,
  pub created_at:       String,
}

impl RawVote {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      vote_id:          row.get(0)?,
      progress:         row.get(1)?,
      submitter_digest: row.get(2)?,
      created_at:       row.get(3)?,
    })
  }

  pub fn into_vote(self) -> Result<Vote> {
    Ok(Vote {
      id:               decode_uuid(&self.vote_id)?,
      progress:         decode_progress(self.progress)?,
      submitter_digest: self.submitter_digest,
      created_at:       decode_dt(&self.created_at)?,
    })
  }
}
