//! Content fingerprints, the content address of a canonical snapshot.
//!
//! A fingerprint is the lowercase hex SHA-224 digest of the canonical bytes.
//! The scheme is versioned: stores record [`FINGERPRINT_SCHEME`] when they are
//! created and refuse to open under a different one, so changing the digest is
//! a migration rather than a silent reinterpretation of old rows.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha224};

use crate::{Error, Result};

/// Name and version of the digest scheme used by [`Fingerprint::of`].
pub const FINGERPRINT_SCHEME: &str = "sha224-hex/1";

/// Length of an encoded fingerprint (28 digest bytes, two hex chars each).
const ENCODED_LEN: usize = 56;

/// A deterministic digest of canonical content bytes.
#[derive(
  Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Fingerprint(String);

impl Fingerprint {
  /// Compute the fingerprint of `raw`.
  pub fn of(raw: impl AsRef<[u8]>) -> Self {
    let digest = Sha224::digest(raw.as_ref());
    Self(hex::encode(digest))
  }

  /// Parse a previously encoded fingerprint, e.g. one read back from storage.
  pub fn parse(s: &str) -> Result<Self> {
    let well_formed = s.len() == ENCODED_LEN
      && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
    if !well_formed {
      return Err(Error::InvalidFingerprint(s.to_owned()));
    }
    Ok(Self(s.to_owned()))
  }

  pub fn as_str(&self) -> &str { &self.0 }

  /// Whether `raw` hashes to this fingerprint.
  pub fn matches(&self, raw: impl AsRef<[u8]>) -> bool {
    Self::of(raw) == *self
  }
}

impl fmt::Display for Fingerprint {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl TryFrom<String> for Fingerprint {
  type Error = Error;

  fn try_from(s: String) -> Result<Self> { Self::parse(&s) }
}

impl From<Fingerprint> for String {
  fn from(fp: Fingerprint) -> Self { fp.0 }
}
