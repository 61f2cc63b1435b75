//! Extraction rules as data.
//!
//! Everything site-specific lives in [`ExtractionRules`]: which elements make
//! up the listing, where the page content sits, and which [`Rule`]s clean it
//! up. The default value describes Shape Your City Halifax; other sites only
//! need a different value, typically loaded from the crawler's config file.

use scraper::Selector;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Rules ───────────────────────────────────────────────────────────────────

/// One cleanup step applied while canonicalizing page content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rule {
  /// Drop matching elements and everything inside them.
  Remove { selector: String },
  /// Drop one attribute from matching elements (e.g. generated ids).
  StripAttribute { selector: String, attribute: String },
  /// Resolve one attribute of matching elements against the page URL.
  Absolutize { selector: String, attribute: String },
}

impl Rule {
  pub fn remove(selector: &str) -> Self {
    Self::Remove { selector: selector.into() }
  }

  pub fn strip_attribute(selector: &str, attribute: &str) -> Self {
    Self::StripAttribute {
      selector:  selector.into(),
      attribute: attribute.into(),
    }
  }

  pub fn absolutize(selector: &str, attribute: &str) -> Self {
    Self::Absolutize {
      selector:  selector.into(),
      attribute: attribute.into(),
    }
  }
}

// ─── Rule set ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionRules {
  /// One element per project on the listing page.
  pub tile:            String,
  /// The project link inside a tile.
  pub tile_link:       String,
  /// Tile attribute holding the project state.
  pub state_attribute: String,
  /// The element whose children form the page content.
  pub content_root:    String,
  /// First match inside the content root gives the display title.
  pub title:           String,
  pub rules:           Vec<Rule>,
}

impl Default for ExtractionRules {
  fn default() -> Self {
    Self {
      tile:            ".project-tile".into(),
      tile_link:       "a.project-tile__link".into(),
      state_attribute: "data-state".into(),
      content_root:    "#yield".into(),
      title:           "h1".into(),
      rules:           vec![
        Rule::remove("#map-layers"),
        Rule::remove("div[data-markers]"),
        Rule::remove("input[name=authenticity_token]"),
        Rule::remove("div.widget_follow_project"),
        Rule::remove("div.widget_related_projects"),
        Rule::remove("#qanda_description_text"),
        Rule::remove("script"),
        Rule::remove(".SocialSharing"),
        Rule::remove("[name=a_comment_body]"),
        Rule::strip_attribute("input", "id"),
        Rule::strip_attribute("label", "for"),
        Rule::absolutize("a", "href"),
        Rule::absolutize("img", "src"),
      ],
    }
  }
}

// ─── Compiled form ───────────────────────────────────────────────────────────

/// Rules with every selector parsed once up front.
#[derive(Debug)]
pub(crate) struct CompiledRules {
  pub remove:     Vec<Selector>,
  pub strip:      Vec<(Selector, String)>,
  pub absolutize: Vec<(Selector, String)>,
}

impl CompiledRules {
  pub fn compile(rules: &[Rule]) -> Result<Self> {
    let mut compiled = Self {
      remove:     Vec::new(),
      strip:      Vec::new(),
      absolutize: Vec::new(),
    };

    for rule in rules {
      match rule {
        Rule::Remove { selector } => compiled.remove.push(selector_of(selector)?),
        Rule::StripAttribute { selector, attribute } => compiled
          .strip
          .push((selector_of(selector)?, attribute.to_ascii_lowercase())),
        Rule::Absolutize { selector, attribute } => compiled
          .absolutize
          .push((selector_of(selector)?, attribute.to_ascii_lowercase())),
      }
    }

    Ok(compiled)
  }
}

pub(crate) fn selector_of(s: &str) -> Result<Selector> {
  Selector::parse(s).map_err(|e| Error::InvalidSelector {
    selector: s.to_owned(),
    reason:   format!("{e:?}"),
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_rules_compile() {
    let rules = ExtractionRules::default();
    let compiled = CompiledRules::compile(&rules.rules).unwrap();
    assert_eq!(compiled.remove.len(), 9);
    assert_eq!(compiled.strip.len(), 2);
    assert_eq!(compiled.absolutize.len(), 2);
  }

  #[test]
  fn bad_selector_is_reported() {
    let err = CompiledRules::compile(&[Rule::remove("div[")]).unwrap_err();
    assert!(matches!(err, Error::InvalidSelector { ref selector, .. } if selector == "div["));
  }

  #[test]
  fn rules_deserialize_from_tagged_form() {
    let json = r#"{
      "content_root": "main",
      "rules": [
        { "kind": "remove", "selector": "nav" },
        { "kind": "strip_attribute", "selector": "input", "attribute": "id" },
        { "kind": "absolutize", "selector": "a", "attribute": "href" }
      ]
    }"#;
    let rules: ExtractionRules = serde_json::from_str(json).unwrap();

    assert_eq!(rules.content_root, "main");
    // Unspecified fields keep their defaults.
    assert_eq!(rules.tile, ".project-tile");
    assert_eq!(rules.rules, vec![
      Rule::remove("nav"),
      Rule::strip_attribute("input", "id"),
      Rule::absolutize("a", "href"),
    ]);
  }
}
