//! Integration tests for `SqliteStore` against an in-memory database.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use sentiment_core::{
  aggregate::votes_by_day,
  clock::{Clock, ManualClock},
  guard::has_voted_today,
  identity::SubmitterIdentity,
  store::VoteStore,
  vote::{CastOutcome, NewVote, Progress},
};

use crate::SqliteStore;

fn at(s: &str) -> DateTime<Utc> {
  DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

async fn store_at(now: &str) -> (SqliteStore, Arc<ManualClock>) {
  let clock = Arc::new(ManualClock::new(at(now)));
  let store = SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
    .with_clock(clock.clone());
  (store, clock)
}

fn vote(progress: u8, who: &str) -> NewVote {
  NewVote::new(Progress::new(progress).unwrap(), SubmitterIdentity::new(who))
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_assigns_id_and_clock_time() {
  let (s, clock) = store_at("2024-04-01T08:15:00Z").await;

  let v = s.create(vote(42, "198.51.100.4")).await.unwrap().into_vote().unwrap();
  assert_eq!(v.progress.get(), 42);
  assert_eq!(v.created_at, clock.now());
  assert_eq!(v.submitter_digest, SubmitterIdentity::new("198.51.100.4").digest());
  assert_eq!(s.count().await.unwrap(), 1);
}

#[tokio::test]
async fn created_at_matches_what_reads_return() {
  let (s, _clock) = store_at("2024-04-01T08:15:00.123456789Z").await;

  let v = s.create(vote(42, "a")).await.unwrap().into_vote().unwrap();
  assert_eq!(v.created_at, at("2024-04-01T08:15:00.123456Z"));

  let listed = s.list_in_range(at("2024-04-01T00:00:00Z"), None).await.unwrap();
  assert_eq!(listed[0].created_at, v.created_at);

  let found = s
    .find_by_identity_since(&SubmitterIdentity::new("a"), at("2024-04-01T00:00:00Z"))
    .await
    .unwrap()
    .unwrap();
  assert_eq!(found.created_at, v.created_at);
}

#[tokio::test]
async fn second_vote_same_day_is_refused() {
  let (s, clock) = store_at("2024-04-01T00:00:00Z").await;

  assert!(matches!(s.create(vote(10, "a")).await.unwrap(), CastOutcome::Recorded(_)));
  clock.advance(Duration::hours(23) + Duration::minutes(59));
  assert!(matches!(s.create(vote(90, "a")).await.unwrap(), CastOutcome::AlreadyVoted));
  assert_eq!(s.count().await.unwrap(), 1);
}

#[tokio::test]
async fn vote_allowed_again_after_utc_rollover() {
  let (s, clock) = store_at("2024-04-01T23:59:59Z").await;

  s.create(vote(10, "a")).await.unwrap();
  clock.advance(Duration::seconds(1));
  assert!(matches!(s.create(vote(20, "a")).await.unwrap(), CastOutcome::Recorded(_)));
  assert_eq!(s.count().await.unwrap(), 2);
}

#[tokio::test]
async fn concurrent_duplicates_insert_once() {
  let (s, _clock) = store_at("2024-04-01T12:00:00Z").await;

  let (a, b, c) = tokio::join!(
    s.create(vote(10, "racer")),
    s.create(vote(20, "racer")),
    s.create(vote(30, "racer")),
  );
  let recorded = [a.unwrap(), b.unwrap(), c.unwrap()]
    .into_iter()
    .filter(|o| matches!(o, CastOutcome::Recorded(_)))
    .count();
  assert_eq!(recorded, 1);
  assert_eq!(s.count().await.unwrap(), 1);
}

#[tokio::test]
async fn different_submitters_do_not_collide() {
  let (s, _clock) = store_at("2024-04-01T12:00:00Z").await;
  s.create(vote(10, "a")).await.unwrap().into_vote().unwrap();
  s.create(vote(10, "b")).await.unwrap().into_vote().unwrap();
  assert_eq!(s.count().await.unwrap(), 2);
}

// ─── Lookups ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn find_by_identity_since_returns_latest() {
  let (s, clock) = store_at("2024-04-01T09:00:00Z").await;
  let who = SubmitterIdentity::new("a");

  s.create(vote(10, "a")).await.unwrap();
  clock.advance(Duration::days(1));
  let second = s.create(vote(70, "a")).await.unwrap().into_vote().unwrap();

  let found = s
    .find_by_identity_since(&who, at("2024-03-01T00:00:00Z"))
    .await
    .unwrap()
    .unwrap();
  assert_eq!(found.id, second.id);

  let none = s
    .find_by_identity_since(&who, at("2024-04-03T00:00:00Z"))
    .await
    .unwrap();
  assert!(none.is_none());

  let other = s
    .find_by_identity_since(&SubmitterIdentity::new("b"), at("2024-03-01T00:00:00Z"))
    .await
    .unwrap();
  assert!(other.is_none());
}

#[tokio::test]
async fn guard_sees_todays_vote() {
  let (s, clock) = store_at("2024-04-01T15:00:00Z").await;
  let alice = SubmitterIdentity::new("203.0.113.9");

  s.create(NewVote::new(Progress::new(55).unwrap(), alice.clone()))
    .await
    .unwrap();

  assert!(has_voted_today(&s, &alice, clock.now()).await.unwrap());
  assert!(
    !has_voted_today(&s, &SubmitterIdentity::new("203.0.113.10"), clock.now())
      .await
      .unwrap()
  );

  clock.set(at("2024-04-02T00:00:00Z"));
  assert!(!has_voted_today(&s, &alice, clock.now()).await.unwrap());
}

#[tokio::test]
async fn list_in_range_is_half_open_and_ascending() {
  let (s, clock) = store_at("2024-04-01T00:00:00Z").await;

  s.create(vote(1, "a")).await.unwrap();
  clock.advance(Duration::hours(12));
  s.create(vote(2, "b")).await.unwrap();
  clock.set(at("2024-04-02T00:00:00Z"));
  s.create(vote(3, "c")).await.unwrap();

  let first_day = s
    .list_in_range(at("2024-04-01T00:00:00Z"), Some(at("2024-04-02T00:00:00Z")))
    .await
    .unwrap();
  let values: Vec<u8> = first_day.iter().map(|v| v.progress.get()).collect();
  assert_eq!(values, [1, 2]);

  let open_ended = s.list_in_range(at("2024-04-01T06:00:00Z"), None).await.unwrap();
  let values: Vec<u8> = open_ended.iter().map(|v| v.progress.get()).collect();
  assert_eq!(values, [2, 3]);
}

#[tokio::test]
async fn today_and_yesterday_split() {
  let (s, clock) = store_at("2024-04-01T20:00:00Z").await;
  s.create(vote(33, "old")).await.unwrap();

  clock.set(at("2024-04-02T07:00:00Z"));
  for (p, who) in [(5, "a"), (50, "b"), (95, "c")] {
    s.create(vote(p, who)).await.unwrap();
  }

  let daily = votes_by_day(&s, clock.now()).await.unwrap();
  let today: Vec<u8> = daily.today.iter().map(|v| v.progress.get()).collect();
  assert_eq!(today, [5, 50, 95]);
  assert_eq!(daily.yesterday.len(), 1);
  assert_eq!(daily.yesterday[0].progress.get(), 33);
}

// ─── Maintenance ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_before_only_removes_older_rows() {
  let (s, clock) = store_at("2024-04-01T10:00:00Z").await;
  s.create(vote(1, "a")).await.unwrap();
  clock.advance(Duration::days(1));
  s.create(vote(2, "a")).await.unwrap();
  clock.advance(Duration::days(1));
  s.create(vote(3, "a")).await.unwrap();

  let removed = s.delete_before(at("2024-04-03T00:00:00Z")).await.unwrap();
  assert_eq!(removed, 2);

  let left = s.list_in_range(at("2000-01-01T00:00:00Z"), None).await.unwrap();
  assert_eq!(left.len(), 1);
  assert_eq!(left[0].progress.get(), 3);
}

#[tokio::test]
async fn reopening_a_file_keeps_votes() {
  let dir = std::env::temp_dir().join(format!("sentiment-store-{}", uuid::Uuid::new_v4()));
  std::fs::create_dir_all(&dir).unwrap();
  let path = dir.join("votes.sqlite3");

  {
    let s = SqliteStore::open(&path).await.unwrap();
    s.create(vote(64, "a")).await.unwrap();
  }
  let s = SqliteStore::open(&path).await.unwrap();
  assert_eq!(s.count().await.unwrap(), 1);

  std::fs::remove_dir_all(&dir).ok();
}
