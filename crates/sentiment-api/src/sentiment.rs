//! Handlers for `/sentiment` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/sentiment` | Body: `{"progress": 0..=100}`; one vote per submitter per UTC day |
//! | `GET`  | `/sentiment` | Today's and yesterday's votes, oldest first |
//! | `GET`  | `/sentiment/check` | Whether the caller already voted today |
//! | `GET`  | `/sentiment/summary` | Most-voted phases, trend and distribution |

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
};
use chrono::{DateTime, Utc};
use sentiment_core::{
  aggregate::{DailySummary, votes_by_day},
  clock::Clock as _,
  guard::has_voted_today,
  store::VoteStore,
  vote::{CastOutcome, NewVote, Progress, Vote},
};
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError, identity::Submitter};

// ─── Cast ─────────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /sentiment`.
#[derive(Debug, Deserialize)]
pub struct CastBody {
  pub progress: f64,
}

/// `POST /sentiment` — returns the stored vote without its submitter.
pub async fn cast<S>(
  State(state): State<AppState<S>>,
  Submitter(submitter): Submitter,
  body: Result<Json<CastBody>, JsonRejection>,
) -> Result<Json<Vote>, ApiError>
where
  S: VoteStore,
{
  let Json(body) = body.map_err(|rejection| {
    tracing::warn!(operation = "cast_vote", error = %rejection, "malformed vote body");
    ApiError::Validation(rejection.body_text())
  })?;

  let progress = Progress::try_from(body.progress).map_err(|e| {
    tracing::warn!(operation = "cast_vote", error = %e, "invalid progress");
    ApiError::Validation(e.to_string())
  })?;

  let now = state.clock.now();
  let fingerprint = submitter.fingerprint();

  if has_voted_today(&*state.store, &submitter, now)
    .await
    .map_err(|e| ApiError::store("check vote status", e))?
  {
    tracing::warn!(operation = "cast_vote", submitter = %fingerprint, "already voted today");
    return Err(ApiError::DuplicateVote);
  }

  match state
    .store
    .create(NewVote::new(progress, submitter))
    .await
    .map_err(|e| ApiError::store("save sentiment", e))?
  {
    CastOutcome::Recorded(vote) => {
      tracing::info!(
        operation = "cast_vote",
        submitter = %fingerprint,
        progress = vote.progress.get(),
        "vote recorded"
      );
      Ok(Json(vote))
    }
    // Lost a race with a concurrent request from the same submitter.
    CastOutcome::AlreadyVoted => {
      tracing::warn!(operation = "cast_vote", submitter = %fingerprint, "already voted today");
      Err(ApiError::DuplicateVote)
    }
  }
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// A vote as readers see it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteView {
  pub progress:   Progress,
  pub created_at: DateTime<Utc>,
}

impl From<Vote> for VoteView {
  fn from(v: Vote) -> Self {
    VoteView { progress: v.progress, created_at: v.created_at }
  }
}

#[derive(Debug, Serialize)]
pub struct DailyVotesView {
  pub today:     Vec<VoteView>,
  pub yesterday: Vec<VoteView>,
}

/// `GET /sentiment`
pub async fn list<S>(State(state): State<AppState<S>>) -> Result<Json<DailyVotesView>, ApiError>
where
  S: VoteStore,
{
  let daily = votes_by_day(&*state.store, state.clock.now())
    .await
    .map_err(|e| ApiError::store("fetch sentiments", e))?;

  Ok(Json(DailyVotesView {
    today:     daily.today.into_iter().map(VoteView::from).collect(),
    yesterday: daily.yesterday.into_iter().map(VoteView::from).collect(),
  }))
}

// ─── Check ────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResponse {
  pub has_voted: bool,
}

/// `GET /sentiment/check`
pub async fn check<S>(
  State(state): State<AppState<S>>,
  Submitter(submitter): Submitter,
) -> Result<Json<CheckResponse>, ApiError>
where
  S: VoteStore,
{
  let has_voted = has_voted_today(&*state.store, &submitter, state.clock.now())
    .await
    .map_err(|e| ApiError::store("check vote status", e))?;
  Ok(Json(CheckResponse { has_voted }))
}

// ─── Summary ──────────────────────────────────────────────────────────────────

/// `GET /sentiment/summary`
pub async fn summary<S>(State(state): State<AppState<S>>) -> Result<Json<DailySummary>, ApiError>
where
  S: VoteStore,
{
  let daily = votes_by_day(&*state.store, state.clock.now())
    .await
    .map_err(|e| ApiError::store("summarise sentiments", e))?;
  Ok(Json(DailySummary::from_votes(&daily)))
}
