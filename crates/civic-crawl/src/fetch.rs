//! HTTP page retrieval.

use std::{future::Future, time::Duration};

use civic_core::source::Fetcher;

/// A [`Fetcher`] backed by a shared `reqwest` client.
///
/// Non-success statuses are errors. Nothing is retried.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
  client: reqwest::Client,
}

impl HttpFetcher {
  pub fn new(user_agent: &str, timeout: Duration) -> crate::Result<Self> {
    let client = reqwest::Client::builder()
      .user_agent(user_agent)
      .timeout(timeout)
      .build()?;
    Ok(Self { client })
  }
}

impl Fetcher for HttpFetcher {
  type Error = reqwest::Error;

  fn fetch<'a>(
    &'a self,
    url: &'a str,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a {
    async move {
      let resp = self.client.get(url).send().await?.error_for_status()?;
      tracing::debug!(%url, status = %resp.status(), "fetched");
      resp.text().await
    }
  }
}
