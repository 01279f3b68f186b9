//! Error types for `sentiment-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("progress must be a finite number, got {0}")]
  ProgressNotFinite(f64),

  #[error("progress must be a whole number, got {0}")]
  ProgressNotInteger(f64),

  #[error("progress must be between 0 and 100, got {0}")]
  ProgressOutOfRange(f64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
