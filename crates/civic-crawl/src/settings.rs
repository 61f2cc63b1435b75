//! Runtime configuration, deserialised from `civic-crawl.toml` and
//! `CIVIC_*` environment variables.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use civic_core::filter::DiscoveryFilter;
use civic_extract::ExtractionRules;
use serde::Deserialize;

use crate::{Error, Result};

/// What to do when one project fails to fetch, extract or record.
///
/// Integrity violations always stop the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
  /// Abort the run on the first failure.
  #[default]
  Halt,
  /// Log the failure and move on to the next project.
  Continue,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
  pub store_path:           PathBuf,
  /// Page listing every tracked project.
  pub listing_url:          String,
  /// Pause between two projects.
  pub politeness_delay_ms:  u64,
  pub on_error:             ErrorPolicy,
  /// Restrict the run to these identifiers; empty means all.
  pub only:                 Vec<String>,
  /// Identifiers never processed, on top of the built-in denylist.
  pub deny:                 Vec<String>,
  pub user_agent:           String,
  pub request_timeout_secs: u64,
  pub rules:                ExtractionRules,
}

impl Default for CrawlConfig {
  fn default() -> Self {
    Self {
      store_path:           PathBuf::from("data.db"),
      listing_url:          "https://www.shapeyourcityhalifax.ca/projects".into(),
      politeness_delay_ms:  1_000,
      on_error:             ErrorPolicy::default(),
      only:                 Vec::new(),
      deny:                 Vec::new(),
      user_agent:           concat!("civic-crawl/", env!("CARGO_PKG_VERSION")).into(),
      request_timeout_secs: 30,
      rules:                ExtractionRules::default(),
    }
  }
}

impl CrawlConfig {
  /// Layer an optional TOML file under `CIVIC_*` environment variables.
  pub fn load(path: &Path) -> Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("CIVIC"))
      .build()?;
    Self::from_settings(settings)
  }

  pub fn from_settings(settings: config::Config) -> Result<Self> {
    Ok(settings.try_deserialize()?)
  }

  /// The store path with a leading `~` expanded.
  pub fn store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }

  /// The store path, which must already exist. Read-only commands use this
  /// so a mistyped path is reported instead of creating an empty store.
  pub fn existing_store_path(&self) -> Result<PathBuf> {
    let path = self.store_path();
    if !path.is_file() {
      return Err(Error::StoreMissing(path));
    }
    Ok(path)
  }

  pub fn politeness_delay(&self) -> Duration {
    Duration::from_millis(self.politeness_delay_ms)
  }

  pub fn request_timeout(&self) -> Duration {
    Duration::from_secs(self.request_timeout_secs)
  }

  pub fn filter(&self) -> DiscoveryFilter {
    DiscoveryFilter::new()
      .with_extra_deny(&self.deny)
      .with_allow(&self.only)
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use civic_core::filter::DEFAULT_DENYLIST;
  use civic_extract::Rule;
  use config::{File, FileFormat};

  use super::*;

  fn from_toml(toml: &str) -> CrawlConfig {
    let settings = config::Config::builder()
      .add_source(File::from_str(toml, FileFormat::Toml))
      .build()
      .unwrap();
    CrawlConfig::from_settings(settings).unwrap()
  }

  #[test]
  fn empty_file_gives_defaults() {
    let cfg = from_toml("");
    assert_eq!(cfg.store_path, PathBuf::from("data.db"));
    assert_eq!(cfg.on_error, ErrorPolicy::Halt);
    assert_eq!(cfg.politeness_delay(), Duration::from_secs(1));
    assert_eq!(cfg.rules, ExtractionRules::default());
    assert!(!cfg.filter().allows(DEFAULT_DENYLIST[0]));
  }

  #[test]
  fn file_overrides_fields() {
    let cfg = from_toml(
      r##"
        store_path = "/var/lib/civic/snapshots.db"
        politeness_delay_ms = 250
        on_error = "continue"
        only = ["https://example.org/a"]

        [rules]
        content_root = "main"

        [[rules.rules]]
        kind = "remove"
        selector = "nav"
      "##,
    );

    assert_eq!(cfg.store_path, PathBuf::from("/var/lib/civic/snapshots.db"));
    assert_eq!(cfg.politeness_delay(), Duration::from_millis(250));
    assert_eq!(cfg.on_error, ErrorPolicy::Continue);
    assert_eq!(cfg.rules.content_root, "main");
    assert_eq!(cfg.rules.tile, ".project-tile");
    assert_eq!(cfg.rules.rules, vec![Rule::remove("nav")]);

    let filter = cfg.filter();
    assert!(filter.allows("https://example.org/a"));
    assert!(!filter.allows("https://example.org/b"));
  }

  #[test]
  fn landing_page_stays_denied() {
    for toml in ["deny = []", r#"deny = ["https://example.org/noise"]"#] {
      let filter = from_toml(toml).filter();
      assert!(!filter.allows(DEFAULT_DENYLIST[0]), "{toml}");
    }

    let filter = from_toml(r#"deny = ["https://example.org/noise"]"#).filter();
    assert!(!filter.allows("https://example.org/noise"));
    assert!(filter.allows("https://example.org/park"));
  }

  #[test]
  fn tilde_is_expanded() {
    let Ok(home) = std::env::var("HOME") else { return };
    let cfg = CrawlConfig {
      store_path: PathBuf::from("~/civic.db"),
      ..CrawlConfig::default()
    };
    assert_eq!(cfg.store_path(), PathBuf::from(home).join("civic.db"));
  }

  #[test]
  fn missing_store_is_reported() {
    let path = std::env::temp_dir().join("civic-crawl-no-such-store.db");
    let cfg = CrawlConfig { store_path: path.clone(), ..CrawlConfig::default() };

    let err = cfg.existing_store_path().unwrap_err();
    assert!(matches!(err, Error::StoreMissing(ref p) if *p == path));
    assert!(!path.exists());
  }

  #[test]
  fn existing_store_is_accepted() {
    let path = std::env::temp_dir()
      .join(format!("civic-crawl-store-{}.db", std::process::id()));
    std::fs::write(&path, b"").unwrap();
    let cfg = CrawlConfig { store_path: path.clone(), ..CrawlConfig::default() };

    assert_eq!(cfg.existing_store_path().unwrap(), path);
    std::fs::remove_file(&path).unwrap();
  }
}
