//! The crawl driver: listing, filter, then one atomic record per project.

use std::time::Duration;

use chrono::Utc;
use civic_core::{
  filter::DiscoveryFilter,
  source::{Discovered, Extractor, Fetcher},
  store::{Recorded, SnapshotStore, StoreError as _},
};
use tokio::sync::watch;

use crate::{Error, Result, settings::ErrorPolicy};

/// Counters for one finished (or cancelled) run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
  /// Projects found on the listing page.
  pub discovered:   usize,
  /// Projects left after filtering.
  pub selected:     usize,
  pub recorded:     usize,
  /// Recorded snapshots whose body had not been seen before.
  pub new_contents: usize,
  /// Projects skipped under [`ErrorPolicy::Continue`].
  pub failed:       usize,
  /// Set when shutdown was requested before every project was processed.
  pub cancelled:    bool,
}

/// Drives one pass over a listing page.
///
/// Projects are processed one at a time in discovery order. Shutdown is only
/// honoured between projects, so a record unit is never interrupted.
pub struct Crawler<S, F, E> {
  store:       S,
  fetcher:     F,
  extractor:   E,
  listing_url: String,
  filter:      DiscoveryFilter,
  delay:       Duration,
  policy:      ErrorPolicy,
}

impl<S, F, E> Crawler<S, F, E>
where
  S: SnapshotStore,
  F: Fetcher,
  E: Extractor,
{
  pub fn new(
    store: S,
    fetcher: F,
    extractor: E,
    listing_url: impl Into<String>,
  ) -> Self {
    Self {
      store,
      fetcher,
      extractor,
      listing_url: listing_url.into(),
      filter: DiscoveryFilter::default(),
      delay: Duration::from_secs(1),
      policy: ErrorPolicy::default(),
    }
  }

  pub fn with_filter(mut self, filter: DiscoveryFilter) -> Self {
    self.filter = filter;
    self
  }

  /// Pause between two projects.
  pub fn with_delay(mut self, delay: Duration) -> Self {
    self.delay = delay;
    self
  }

  pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
    self.policy = policy;
    self
  }

  pub fn store(&self) -> &S { &self.store }

  /// Run one crawl. Sending `true` on the shutdown channel stops the run at
  /// the next project boundary.
  pub async fn run(
    &self,
    mut shutdown: watch::Receiver<bool>,
  ) -> Result<RunSummary> {
    let mut summary = RunSummary::default();

    let listing = self.fetcher.fetch(&self.listing_url).await.map_err(|e| {
      Error::Transport { url: self.listing_url.clone(), source: Box::new(e) }
    })?;
    let discovered = self
      .extractor
      .discover(&self.listing_url, &listing)
      .map_err(|e| Error::Extraction {
        url:    self.listing_url.clone(),
        source: Box::new(e),
      })?;
    summary.discovered = discovered.len();

    let selected = self.filter.apply(discovered);
    summary.selected = selected.len();
    tracing::info!(
      listing = %self.listing_url,
      discovered = summary.discovered,
      selected = summary.selected,
      "starting crawl"
    );

    let total = selected.len();
    for (i, project) in selected.iter().enumerate() {
      if *shutdown.borrow() {
        tracing::info!(remaining = total - i, "shutdown requested; stopping");
        summary.cancelled = true;
        break;
      }

      tracing::info!("fetching {}/{} {}", i + 1, total, project.identifier);
      match self.process(project).await {
        Ok(recorded) => {
          summary.recorded += 1;
          if recorded.content_created {
            summary.new_contents += 1;
          }
        }
        Err(e) if e.is_fatal() || self.policy == ErrorPolicy::Halt => {
          return Err(e);
        }
        Err(e) => {
          tracing::warn!(error = %e, "skipping project");
          summary.failed += 1;
        }
      }

      if i + 1 < total {
        self.pause(&mut shutdown).await;
      }
    }

    tracing::info!(
      recorded = summary.recorded,
      new_contents = summary.new_contents,
      failed = summary.failed,
      cancelled = summary.cancelled,
      "crawl finished"
    );
    Ok(summary)
  }

  async fn process(&self, project: &Discovered) -> Result<Recorded> {
    let url = &project.identifier;

    let body = self.fetcher.fetch(url).await.map_err(|e| Error::Transport {
      url:    url.clone(),
      source: Box::new(e),
    })?;

    let snapshot =
      self.extractor.extract(project, &body).map_err(|e| Error::Extraction {
        url:    url.clone(),
        source: Box::new(e),
      })?;

    let recorded =
      self.store.record(snapshot, Utc::now()).await.map_err(|e| {
        Error::Store {
          url:       url.clone(),
          integrity: e.is_integrity_violation(),
          source:    Box::new(e),
        }
      })?;

    tracing::debug!(
      %url,
      entity_id = %recorded.entity_id,
      fingerprint = %recorded.observation.fingerprint,
      new_content = recorded.content_created,
      "recorded"
    );
    Ok(recorded)
  }

  /// Sleep for the politeness delay, waking early on shutdown.
  async fn pause(&self, shutdown: &mut watch::Receiver<bool>) {
    if self.delay.is_zero() {
      return;
    }
    tokio::select! {
      _ = tokio::time::sleep(self.delay) => {}
      Ok(()) = shutdown.changed() => {}
    }
  }
}
