//! Error types for `civic-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid fingerprint: {0:?}")]
  InvalidFingerprint(String),

  #[error("entity identifier must not be empty")]
  EmptyIdentifier,

  #[error("failed to render derived form: {0}")]
  Render(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
