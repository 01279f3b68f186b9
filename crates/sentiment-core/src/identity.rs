//! Submitter identity — who is voting, as far as the dedup guard cares.
//!
//! The identity is derived from the request's network origin. It is used only
//! to limit voting to once per UTC day; it is persisted as a SHA-256 digest and
//! logged as a short fingerprint of that digest.

use std::fmt;

use sha2::{Digest, Sha256};

/// Identity used when the request carries no forwarded address. Every such
/// submitter shares one vote slot per day.
pub const LOOPBACK_SENTINEL: &str = "127.0.0.1";

const FINGERPRINT_LEN: usize = 12;

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SubmitterIdentity(String);

impl SubmitterIdentity {
  pub fn new(raw: impl Into<String>) -> Self { Self(raw.into()) }

  /// Derive the identity from an `X-Forwarded-For` header value.
  ///
  /// The first comma-separated entry is the originating client. An absent or
  /// blank header falls back to [`LOOPBACK_SENTINEL`].
  pub fn from_forwarded_for(header: Option<&str>) -> Self {
    let first = header
      .and_then(|h| h.split(',').next())
      .map(str::trim)
      .filter(|s| !s.is_empty());
    Self::new(first.unwrap_or(LOOPBACK_SENTINEL))
  }

  pub fn as_str(&self) -> &str { &self.0 }

  /// Hex SHA-256 of the identity; this is what the store persists.
  pub fn digest(&self) -> String { hex::encode(Sha256::digest(self.0.as_bytes())) }

  /// Short prefix of [`Self::digest`] for log lines.
  pub fn fingerprint(&self) -> String {
    let mut d = self.digest();
    d.truncate(FINGERPRINT_LEN);
    d
  }
}

// Debug prints the fingerprint so the raw address never reaches a log sink.
impl fmt::Debug for SubmitterIdentity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("SubmitterIdentity").field(&self.fingerprint()).finish()
  }
}
