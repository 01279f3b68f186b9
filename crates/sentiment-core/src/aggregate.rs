//! Today/yesterday aggregation and the daily summary read model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
  clock::DayWindow,
  phase::{self, ORDERED_PHASES, Phase, Trend},
  store::VoteStore,
  vote::{Progress, Vote},
};

/// Votes split at UTC midnight, each side oldest first.
#[derive(Debug, Clone, Default)]
pub struct DailyVotes {
  pub today:     Vec<Vote>,
  pub yesterday: Vec<Vote>,
}

/// Load today's and yesterday's votes relative to `now`.
pub async fn votes_by_day<S>(store: &S, now: DateTime<Utc>) -> Result<DailyVotes, S::Error>
where
  S: VoteStore,
{
  let window = DayWindow::around(now);
  let today = store.list_in_range(window.start_of_today, None).await?;
  let yesterday = store
    .list_in_range(window.start_of_yesterday, Some(window.start_of_today))
    .await?;
  Ok(DailyVotes { today, yesterday })
}

fn progresses(votes: &[Vote]) -> impl Iterator<Item = Progress> + '_ {
  votes.iter().map(|v| v.progress)
}

// ─── Summary ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseCount {
  pub phase: Phase,
  pub votes: usize,
}

/// The computed read model behind the sentiment chart — never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
  pub total_votes_today:     usize,
  pub total_votes_yesterday: usize,
  /// Most-voted phase today; `None` before the first vote of the day.
  pub today_phase:           Option<Phase>,
  pub yesterday_phase:       Option<Phase>,
  pub trend:                 Trend,
  /// Mean of today's progress values. Informational; the trend is always
  /// derived from the most-voted phases.
  pub average_progress:      Option<Progress>,
  pub average_phase:         Option<Phase>,
  /// Today's votes per phase, all twelve phases in trend order.
  pub distribution:          Vec<PhaseCount>,
}

impl DailySummary {
  pub fn from_votes(daily: &DailyVotes) -> Self {
    let today_phase = phase::most_voted_phase(progresses(&daily.today));
    let yesterday_phase = phase::most_voted_phase(progresses(&daily.yesterday));
    let average_progress = phase::average_progress(progresses(&daily.today));
    let counts = phase::tally(progresses(&daily.today));

    Self {
      total_votes_today: daily.today.len(),
      total_votes_yesterday: daily.yesterday.len(),
      today_phase,
      yesterday_phase,
      trend: phase::trend(today_phase, yesterday_phase),
      average_progress,
      average_phase: average_progress.map(phase::phase_of),
      distribution: ORDERED_PHASES
        .iter()
        .map(|&phase| PhaseCount { phase, votes: counts[phase.index()] })
        .collect(),
    }
  }
}
