//! [`PageExtractor`]: the rule-driven implementation of [`Extractor`].

use civic_core::{
  entity::DisplayMetadata,
  source::{Discovered, Extractor, Snapshot},
};
use scraper::{Html, Selector};
use url::Url;

use crate::{
  Error, Result,
  canonical::{Canonicalizer, collapse_whitespace, resolve},
  rules::{CompiledRules, ExtractionRules, selector_of},
};

/// Extracts snapshots according to an [`ExtractionRules`] value.
///
/// All selectors are parsed in [`PageExtractor::new`]; extraction itself
/// cannot fail on a bad rule.
#[derive(Debug)]
pub struct PageExtractor {
  tile:             Selector,
  tile_link:        Selector,
  state_attribute:  String,
  content_root:     Selector,
  /// Source text of `content_root`, for error messages.
  content_root_src: String,
  title:            Selector,
  compiled:         CompiledRules,
}

impl PageExtractor {
  pub fn new(rules: ExtractionRules) -> Result<Self> {
    Ok(Self {
      tile:             selector_of(&rules.tile)?,
      tile_link:        selector_of(&rules.tile_link)?,
      state_attribute:  rules.state_attribute,
      content_root:     selector_of(&rules.content_root)?,
      content_root_src: rules.content_root,
      title:            selector_of(&rules.title)?,
      compiled:         CompiledRules::compile(&rules.rules)?,
    })
  }
}

fn parse_url(s: &str) -> Result<Url> {
  Url::parse(s).map_err(|source| Error::InvalidUrl { url: s.to_owned(), source })
}

impl Extractor for PageExtractor {
  type Error = Error;

  fn discover(&self, listing_url: &str, body: &str) -> Result<Vec<Discovered>> {
    let base = parse_url(listing_url)?;
    let doc = Html::parse_document(body);

    let mut found = Vec::new();
    for tile in doc.select(&self.tile) {
      let href = tile
        .select(&self.tile_link)
        .next()
        .and_then(|a| a.value().attr("href"));

      let Some(href) = href else {
        tracing::warn!(listing = %listing_url, "project tile without a link; skipping");
        continue;
      };

      found.push(Discovered {
        identifier: resolve(&base, href),
        state:      tile
          .value()
          .attr(&self.state_attribute)
          .unwrap_or_default()
          .to_owned(),
      });
    }

    tracing::debug!(listing = %listing_url, count = found.len(), "discovered projects");
    Ok(found)
  }

  fn extract(&self, discovered: &Discovered, body: &str) -> Result<Snapshot> {
    let base = parse_url(&discovered.identifier)?;
    let doc = Html::parse_document(body);

    let root = doc.select(&self.content_root).next().ok_or_else(|| {
      Error::MissingElement {
        selector: self.content_root_src.clone(),
        url:      discovered.identifier.clone(),
      }
    })?;

    let title = root
      .select(&self.title)
      .next()
      .map(|h| collapse_whitespace(&h.text().collect::<String>()))
      .unwrap_or_default();

    let raw = Canonicalizer::new(&self.compiled, &base).inner_of(root);

    Ok(Snapshot {
      identifier: discovered.identifier.clone(),
      metadata:   DisplayMetadata { title, state: discovered.state.clone() },
      raw,
    })
  }
}
