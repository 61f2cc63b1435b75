//! civic-crawl binary.
//!
//! Reads `civic-crawl.toml` (or the path given with `--config`), opens the
//! SQLite snapshot store and records one observation per listed project.
//!
//! ```text
//! civic-crawl --db data.db --urls https://www.shapeyourcityhalifax.ca/park-plan
//! civic-crawl history https://www.shapeyourcityhalifax.ca/park-plan
//! civic-crawl verify
//! ```

use std::path::PathBuf;

use anyhow::Context as _;
use civic_core::{filter::DiscoveryFilter, store::SnapshotStore};
use civic_crawl::{CrawlConfig, Crawler, HttpFetcher};
use civic_extract::{MarkdownRenderer, PageExtractor};
use civic_store_sqlite::SqliteStore;
use clap::{Parser, Subcommand};
use tokio::sync::watch;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Civic project page snapshot crawler")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "civic-crawl.toml")]
  config: PathBuf,

  /// SQLite database file; overrides `store_path`.
  #[arg(long)]
  db: Option<PathBuf>,

  /// Comma-separated project URLs to process; overrides `only`.
  #[arg(long)]
  urls: Option<String>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Print the observation timeline of one project.
  History { url: String },
  /// Re-hash every stored body and report mismatches.
  Verify,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let mut cfg =
    CrawlConfig::load(&cli.config).context("failed to load configuration")?;
  if let Some(db) = cli.db {
    cfg.store_path = db;
  }
  if let Some(urls) = &cli.urls {
    cfg.only = urls.split(',').map(str::to_owned).collect();
  }

  // Only a crawl may create the store.
  let store_path = match cli.command {
    None => cfg.store_path(),
    Some(_) => cfg.existing_store_path()?,
  };
  let store = SqliteStore::open(&store_path, MarkdownRenderer)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  match cli.command {
    None => crawl(cfg, store).await,
    Some(Command::History { url }) => history(&store, url).await,
    Some(Command::Verify) => verify(&store).await,
  }
}

async fn crawl(cfg: CrawlConfig, store: SqliteStore) -> anyhow::Result<()> {
  let fetcher = HttpFetcher::new(&cfg.user_agent, cfg.request_timeout())
    .context("failed to build http client")?;
  let extractor = PageExtractor::new(cfg.rules.clone())
    .context("invalid extraction rules")?;
  let filter: DiscoveryFilter = cfg.filter();

  let crawler = Crawler::new(store, fetcher, extractor, cfg.listing_url.clone())
    .with_filter(filter)
    .with_delay(cfg.politeness_delay())
    .with_policy(cfg.on_error);

  let (tx, rx) = watch::channel(false);
  tokio::spawn(async move {
    if tokio::signal::ctrl_c().await.is_ok() {
      tracing::info!("interrupt received; finishing current project");
      let _ = tx.send(true);
    }
  });

  let summary = crawler.run(rx).await.context("crawl failed")?;
  tracing::info!(?summary, "done");
  Ok(())
}

async fn history(store: &SqliteStore, url: String) -> anyhow::Result<()> {
  let Some(entity) = store.get_entity(url.clone()).await? else {
    anyhow::bail!("{url} has never been recorded");
  };

  println!("{} [{}] {}", entity.identifier, entity.metadata.state, entity.metadata.title);
  for obs in store.history(url).await? {
    let marker = if obs.fingerprint == entity.current_fingerprint { "*" } else { " " };
    println!("{marker} {}  {}", obs.observed_at.to_rfc3339(), obs.fingerprint);
  }
  Ok(())
}

async fn verify(store: &SqliteStore) -> anyhow::Result<()> {
  let stats = store.stats().await?;
  let broken = store.verify_contents().await?;
  for fp in &broken {
    tracing::error!(fingerprint = %fp, "stored body does not match its fingerprint");
  }
  if !broken.is_empty() {
    anyhow::bail!("{} of {} contents failed verification", broken.len(), stats.contents);
  }
  tracing::info!(
    contents = stats.contents,
    entities = stats.entities,
    observations = stats.observations,
    "store verified"
  );
  Ok(())
}
