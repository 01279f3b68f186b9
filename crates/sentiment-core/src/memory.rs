//! In-memory [`VoteStore`] test double.

use std::{convert::Infallible, sync::{Arc, Mutex}};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  clock::{Clock, utc_day},
  identity::SubmitterIdentity,
  store::VoteStore,
  vote::{CastOutcome, NewVote, Vote},
};

pub struct MemoryStore {
  votes: Mutex<Vec<Vote>>,
  clock: Arc<dyn Clock>,
}

impl MemoryStore {
  pub fn new(clock: Arc<dyn Clock>) -> Self {
    Self { votes: Mutex::new(Vec::new()), clock }
  }
}

impl VoteStore for MemoryStore {
  type Error = Infallible;

  async fn create(&self, input: NewVote) -> Result<CastOutcome, Infallible> {
    let now = self.clock.now();
    let digest = input.submitter.digest();
    let mut votes = self.votes.lock().unwrap();
    if votes
      .iter()
      .any(|v| v.submitter_digest == digest && utc_day(v.created_at) == utc_day(now))
    {
      return Ok(CastOutcome::AlreadyVoted);
    }
    let vote = Vote {
      id:               Uuid::new_v4(),
      progress:         input.progress,
      submitter_digest: digest,
      created_at:       now,
    };
    votes.push(vote.clone());
    Ok(CastOutcome::Recorded(vote))
  }

  async fn find_by_identity_since(
    &self,
    submitter: &SubmitterIdentity,
    since: DateTime<Utc>,
  ) -> Result<Option<Vote>, Infallible> {
    let digest = submitter.digest();
    let votes = self.votes.lock().unwrap();
    Ok(
      votes
        .iter()
        .filter(|v| v.submitter_digest == digest && v.created_at >= since)
        .max_by_key(|v| v.created_at)
        .cloned(),
    )
  }

  async fn list_in_range(
    &self,
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
  ) -> Result<Vec<Vote>, Infallible> {
    let votes = self.votes.lock().unwrap();
    let mut out: Vec<Vote> = votes
      .iter()
      .filter(|v| v.created_at >= start && end.is_none_or(|e| v.created_at < e))
      .cloned()
      .collect();
    out.sort_by_key(|v| v.created_at);
    Ok(out)
  }

  async fn delete_before(&self, cutoff: DateTime<Utc>) -> Result<usize, Infallible> {
    let mut votes = self.votes.lock().unwrap();
    let before = votes.len();
    votes.retain(|v| v.created_at >= cutoff);
    Ok(before - votes.len())
  }
}
