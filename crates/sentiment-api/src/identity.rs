//! Extractor for the submitter identity.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use sentiment_core::identity::SubmitterIdentity;

pub const FORWARDED_FOR: &str = "x-forwarded-for";

/// The caller's identity, taken from `X-Forwarded-For`. Never rejects: a
/// missing header resolves to the loopback sentinel.
pub struct Submitter(pub SubmitterIdentity);

impl<S> FromRequestParts<S> for Submitter
where
  S: Send + Sync,
{
  type Rejection = Infallible;

  async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
    let header = parts
      .headers
      .get(FORWARDED_FOR)
      .and_then(|v| v.to_str().ok());
    Ok(Submitter(SubmitterIdentity::from_forwarded_for(header)))
  }
}
