//! Error type for `civic-store-sqlite`.

use civic_core::{Fingerprint, store::StoreError};
use rusqlite::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] civic_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A different body is already stored under this fingerprint.
  #[error("fingerprint collision: {0} already holds different bytes")]
  FingerprintCollision(Fingerprint),

  /// A uniqueness, foreign-key or append-only constraint rejected a write.
  #[error("integrity violation: {0}")]
  Integrity(String),

  #[error(
    "store was created with fingerprint scheme {stored:?}, expected {expected:?}"
  )]
  SchemeMismatch {
    stored:   String,
    expected: &'static str,
  },
}

impl StoreError for Error {
  fn is_integrity_violation(&self) -> bool {
    matches!(self, Self::FingerprintCollision(_) | Self::Integrity(_))
  }
}

impl From<rusqlite::Error> for Error {
  fn from(e: rusqlite::Error) -> Self {
    match e {
      rusqlite::Error::SqliteFailure(ref f, ref msg)
        if f.code == ErrorCode::ConstraintViolation =>
      {
        Self::Integrity(msg.clone().unwrap_or_else(|| f.to_string()))
      }
      other => Self::Sqlite(other),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
