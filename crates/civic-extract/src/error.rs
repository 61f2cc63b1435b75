//! Error types for the civic-extract site plugin.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid selector {selector:?}: {reason}")]
  InvalidSelector { selector: String, reason: String },

  /// The page does not have the structure the rules expect.
  #[error("no element matches {selector:?} on {url}")]
  MissingElement { selector: String, url: String },

  #[error("invalid url {url:?}: {source}")]
  InvalidUrl {
    url:    String,
    #[source]
    source: url::ParseError,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
