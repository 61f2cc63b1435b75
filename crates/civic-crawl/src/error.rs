//! Error types for the crawl driver.

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
  #[error("fetching {url} failed: {source}")]
  Transport {
    url:    String,
    #[source]
    source: BoxError,
  },

  #[error("extracting {url} failed: {source}")]
  Extraction {
    url:    String,
    #[source]
    source: BoxError,
  },

  #[error("recording {url} failed: {source}")]
  Store {
    url:       String,
    /// Set when the store reported a broken invariant.
    integrity: bool,
    #[source]
    source:    BoxError,
  },

  #[error("no store at {0:?}")]
  StoreMissing(std::path::PathBuf),

  #[error("config error: {0}")]
  Config(#[from] config::ConfigError),

  #[error("http client error: {0}")]
  Client(#[from] reqwest::Error),
}

impl Error {
  /// Errors that stop a run even under [`crate::ErrorPolicy::Continue`].
  pub fn is_fatal(&self) -> bool {
    matches!(self, Self::Store { integrity: true, .. })
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
