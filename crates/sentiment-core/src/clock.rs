//! Injected wall clock and UTC day arithmetic.
//!
//! Every day boundary in the service is UTC midnight: the dedup guard, the
//! store's one-vote-per-day constraint and the today/yesterday split all go
//! through [`start_of_utc_day`].

use std::sync::Mutex;

use chrono::{DateTime, Duration, NaiveDate, TimeZone as _, Utc};

/// Source of "now". Handlers and stores never call `Utc::now()` directly.
pub trait Clock: Send + Sync {
  fn now(&self) -> DateTime<Utc>;
}

/// The real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> DateTime<Utc> { Utc::now() }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
  now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
  pub fn new(now: DateTime<Utc>) -> Self { Self { now: Mutex::new(now) } }

  pub fn set(&self, now: DateTime<Utc>) {
    *self.now.lock().unwrap_or_else(|e| e.into_inner()) = now;
  }

  pub fn advance(&self, by: Duration) {
    let mut guard = self.now.lock().unwrap_or_else(|e| e.into_inner());
    *guard += by;
  }
}

impl Clock for ManualClock {
  fn now(&self) -> DateTime<Utc> {
    *self.now.lock().unwrap_or_else(|e| e.into_inner())
  }
}

// ─── Day boundaries ──────────────────────────────────────────────────────────

/// The UTC calendar date containing `at`.
pub fn utc_day(at: DateTime<Utc>) -> NaiveDate { at.date_naive() }

/// Midnight UTC at the start of `day`.
pub fn midnight(day: NaiveDate) -> DateTime<Utc> {
  Utc.from_utc_datetime(&day.and_time(chrono::NaiveTime::MIN))
}

/// Truncate `at` to midnight UTC of the same day.
pub fn start_of_utc_day(at: DateTime<Utc>) -> DateTime<Utc> { midnight(utc_day(at)) }

/// The `[yesterday, today, ∞)` boundaries relative to `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
  pub start_of_yesterday: DateTime<Utc>,
  pub start_of_today:     DateTime<Utc>,
}

impl DayWindow {
  pub fn around(now: DateTime<Utc>) -> Self {
    let start_of_today = start_of_utc_day(now);
    Self {
      start_of_yesterday: start_of_today - Duration::days(1),
      start_of_today,
    }
  }
}
