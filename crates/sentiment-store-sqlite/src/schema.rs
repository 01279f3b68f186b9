//! SQL schema for the sentiment SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Votes are append-only from the request path.
-- Rows are removed only by offline maintenance (`purge`).
CREATE TABLE IF NOT EXISTS votes (
    vote_id          TEXT PRIMARY KEY,
    progress         INTEGER NOT NULL CHECK (progress BETWEEN 0 AND 100),
    submitter_digest TEXT NOT NULL,   -- hex SHA-256 of the submitter identity
    created_at       TEXT NOT NULL,   -- RFC 3339 UTC, fixed width; server-assigned
    vote_day         TEXT NOT NULL,   -- UTC calendar date of created_at
    UNIQUE (submitter_digest, vote_day)
);

CREATE INDEX IF NOT EXISTS votes_created_idx ON votes(created_at);

PRAGMA user_version = 1;
";
