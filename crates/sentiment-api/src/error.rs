//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// Malformed body or a progress value outside `0..=100`.
  #[error("{0}")]
  Validation(String),

  /// The submitter already voted on the current UTC day.
  #[error("Already voted today")]
  DuplicateVote,

  #[error("failed to {operation}: {source}")]
  Store {
    operation: &'static str,
    #[source]
    source:    Box<dyn std::error::Error + Send + Sync>,
  },
}

impl ApiError {
  pub fn store<E>(operation: &'static str, e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    ApiError::Store { operation, source: Box::new(e) }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::Validation(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::DuplicateVote => (StatusCode::TOO_MANY_REQUESTS, self.to_string()),
      ApiError::Store { operation, source } => {
        tracing::error!(operation, error = %source, "store operation failed");
        (StatusCode::INTERNAL_SERVER_ERROR, format!("failed to {operation}"))
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
