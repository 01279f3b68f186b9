//! Phase mapper — progress values bucketed into named market-psychology phases.
//!
//! The twelve phases are ordered from most pessimistic to most optimistic.
//! That order is both the order of the progress bands and the rank used to
//! compare days, so a higher index always means a more optimistic crowd.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::vote::Progress;

// ─── Phase ───────────────────────────────────────────────────────────────────

/// A named psychological phase. Declaration order is trend order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
  Depression,
  Anger,
  Capitulation,
  Panic,
  Disbelief,
  Hope,
  Denial,
  Optimism,
  Anxiety,
  Belief,
  Complacency,
  Euphoria,
}

/// Every phase, most pessimistic first.
pub const ORDERED_PHASES: [Phase; 12] = [
  Phase::Depression,
  Phase::Anger,
  Phase::Capitulation,
  Phase::Panic,
  Phase::Disbelief,
  Phase::Hope,
  Phase::Denial,
  Phase::Optimism,
  Phase::Anxiety,
  Phase::Belief,
  Phase::Complacency,
  Phase::Euphoria,
];

/// Colour family a phase is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
  Bearish,
  Recovering,
  Bullish,
}

impl Phase {
  /// Position in [`ORDERED_PHASES`].
  pub fn index(self) -> usize { self as usize }

  pub fn name(self) -> &'static str {
    match self {
      Self::Depression => "Depression",
      Self::Anger => "Anger",
      Self::Capitulation => "Capitulation",
      Self::Panic => "Panic",
      Self::Disbelief => "Disbelief",
      Self::Hope => "Hope",
      Self::Denial => "Denial",
      Self::Optimism => "Optimism",
      Self::Anxiety => "Anxiety",
      Self::Belief => "Belief",
      Self::Complacency => "Complacency",
      Self::Euphoria => "Euphoria",
    }
  }

  /// What the crowd is saying in this phase.
  pub fn caption(self) -> &'static str {
    match self {
      Self::Depression => "My retirement money is lost.",
      Self::Anger => "Who shorted the market!?",
      Self::Capitulation => "I'm getting out!",
      Self::Panic => "Everyone's selling!",
      Self::Disbelief => "This rally will fail.",
      Self::Hope => "A recovery is possible.",
      Self::Denial => "They will come back.",
      Self::Optimism => "This rally is real!",
      Self::Anxiety => "This dip is taking longer...",
      Self::Belief => "Time to get invested.",
      Self::Complacency => "Just cooling off.",
      Self::Euphoria => "We're all going to be rich!",
    }
  }

  pub fn mood(self) -> Mood {
    match self {
      Self::Disbelief | Self::Hope | Self::Optimism => Mood::Recovering,
      Self::Belief | Self::Complacency | Self::Euphoria => Mood::Bullish,
      _ => Mood::Bearish,
    }
  }

  pub fn band(self) -> PhaseBand { BANDS[self.index()] }
}

impl fmt::Display for Phase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

// ─── Bands ───────────────────────────────────────────────────────────────────

/// The inclusive progress range that maps to `phase`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseBand {
  pub phase: Phase,
  pub min:   u8,
  pub max:   u8,
}

const fn band(phase: Phase, min: u8, max: u8) -> PhaseBand { PhaseBand { phase, min, max } }

/// Contiguous, non-overlapping partition of `0..=100`, in trend order.
pub const BANDS: [PhaseBand; 12] = [
  band(Phase::Depression, 0, 8),
  band(Phase::Anger, 9, 16),
  band(Phase::Capitulation, 17, 24),
  band(Phase::Panic, 25, 33),
  band(Phase::Disbelief, 34, 41),
  band(Phase::Hope, 42, 49),
  band(Phase::Denial, 50, 58),
  band(Phase::Optimism, 59, 66),
  band(Phase::Anxiety, 67, 74),
  band(Phase::Belief, 75, 83),
  band(Phase::Complacency, 84, 91),
  band(Phase::Euphoria, 92, 100),
];

pub fn phase_of(progress: Progress) -> Phase {
  let p = progress.get();
  for b in &BANDS {
    if p <= b.max {
      return b.phase;
    }
  }
  // `Progress` never exceeds 100, the top of the last band.
  Phase::Euphoria
}

// ─── Aggregates ──────────────────────────────────────────────────────────────

/// The phase most votes fall into.
///
/// Ties go to whichever tied phase appeared first in `votes`, so the result
/// depends only on input order.
pub fn most_voted_phase<I>(votes: I) -> Option<Phase>
where
  I: IntoIterator<Item = Progress>,
{
  let mut counts: Vec<(Phase, usize)> = Vec::new();
  for progress in votes {
    let phase = phase_of(progress);
    match counts.iter_mut().find(|(p, _)| *p == phase) {
      Some((_, n)) => *n += 1,
      None => counts.push((phase, 1)),
    }
  }

  let mut best: Option<(Phase, usize)> = None;
  for (phase, n) in counts {
    if best.is_none_or(|(_, top)| n > top) {
      best = Some((phase, n));
    }
  }
  best.map(|(phase, _)| phase)
}

/// Arithmetic mean of `votes`, rounded half up.
pub fn average_progress<I>(votes: I) -> Option<Progress>
where
  I: IntoIterator<Item = Progress>,
{
  let (sum, n) = votes
    .into_iter()
    .fold((0_i64, 0_i64), |(s, n), p| (s + i64::from(p.get()), n + 1));
  if n == 0 {
    return None;
  }
  Some(Progress::saturating((2 * sum + n) / (2 * n)))
}

/// Average-then-map: the phase of the mean progress.
pub fn average_phase<I>(votes: I) -> Option<Phase>
where
  I: IntoIterator<Item = Progress>,
{
  average_progress(votes).map(phase_of)
}

/// Vote counts per phase, indexed like [`ORDERED_PHASES`].
pub fn tally<I>(votes: I) -> [usize; 12]
where
  I: IntoIterator<Item = Progress>,
{
  let mut counts = [0; 12];
  for p in votes {
    counts[phase_of(p).index()] += 1;
  }
  counts
}

// ─── Trend ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
  Up,
  Down,
  Same,
}

/// Compare today's phase with yesterday's. Missing data on either side is
/// reported as [`Trend::Same`].
pub fn trend(today: Option<Phase>, yesterday: Option<Phase>) -> Trend {
  match (today, yesterday) {
    (Some(t), Some(y)) if t.index() > y.index() => Trend::Up,
    (Some(t), Some(y)) if t.index() < y.index() => Trend::Down,
    _ => Trend::Same,
  }
}
