//! Handler for `GET /phases` — the partition clients should render with.

use axum::Json;
use sentiment_core::phase::{BANDS, Mood, Phase};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct PhaseInfo {
  pub phase:   Phase,
  /// Rank used for trend comparison; higher is more optimistic.
  pub index:   usize,
  pub min:     u8,
  pub max:     u8,
  pub mood:    Mood,
  pub caption: &'static str,
}

/// `GET /phases`
pub async fn catalogue() -> Json<Vec<PhaseInfo>> {
  Json(
    BANDS
      .iter()
      .map(|b| PhaseInfo {
        phase:   b.phase,
        index:   b.phase.index(),
        min:     b.min,
        max:     b.max,
        mood:    b.phase.mood(),
        caption: b.phase.caption(),
      })
      .collect(),
  )
}
