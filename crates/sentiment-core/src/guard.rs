//! Daily dedup guard — has this submitter already voted today?
//!
//! This is the read-side check used to answer `GET /sentiment/check` and to
//! reject obvious repeats early. The store's unique (submitter, day)
//! constraint stays authoritative for concurrent submissions.

use chrono::{DateTime, Utc};

use crate::{clock::start_of_utc_day, identity::SubmitterIdentity, store::VoteStore};

/// `true` if `submitter` has a vote at or after midnight UTC of `now`'s day.
pub async fn has_voted_today<S>(
  store: &S,
  submitter: &SubmitterIdentity,
  now: DateTime<Utc>,
) -> Result<bool, S::Error>
where
  S: VoteStore,
{
  let since = start_of_utc_day(now);
  Ok(store.find_by_identity_since(submitter, since).await?.is_some())
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use chrono::Duration;

  use super::*;
  use crate::{
    clock::{Clock, ManualClock},
    memory::MemoryStore,
    vote::{NewVote, Progress},
  };

  fn clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
      DateTime::parse_from_rfc3339("2024-06-01T10:00:00Z").unwrap().to_utc(),
    ))
  }

  #[tokio::test]
  async fn voter_is_flagged_until_midnight() {
    let clock = clock();
    let store = MemoryStore::new(clock.clone());
    let alice = SubmitterIdentity::new("203.0.113.1");
    let bob = SubmitterIdentity::new("203.0.113.2");

    store
      .create(NewVote::new(Progress::new(40).unwrap(), alice.clone()))
      .await
      .unwrap();

    assert!(has_voted_today(&store, &alice, clock.now()).await.unwrap());
    assert!(!has_voted_today(&store, &bob, clock.now()).await.unwrap());

    clock.advance(Duration::hours(14));
    assert!(!has_voted_today(&store, &alice, clock.now()).await.unwrap());
  }
}
