//! Crawler module for fetching, rewriting and mirroring pages
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry logic
//! - Streaming link extraction and rewriting
//! - Shared crawl state and URL admission
//! - The worker pool and both crawl strategies

mod coordinator;
mod discovery;
mod fetcher;
mod parser;
mod state;
mod worker;

pub use coordinator::{run_eager, run_queue};
pub use discovery::discover;
pub use fetcher::{
    build_http_client, fetch_once, fetch_with_retry, DEFAULT_RETRIES, DEFAULT_RETRY_BACKOFF,
    USER_AGENT,
};
pub use parser::{extract_and_rewrite, extract_links, is_markup, RewriteResult};
pub use state::CrawlState;
pub use worker::{Completion, Job, JobOutcome, WorkerPool};

use crate::config::{Config, Strategy};
use crate::output::CrawlSummary;
use crate::MirrorError;
use std::sync::Arc;
use url::Url;

/// Mirrors a site starting from `seed`
///
/// This is the main entry point for a crawl. It will:
/// 1. Build the HTTP client from the configured timeout
/// 2. Load robots.txt when asked to (a failure only logs a warning)
/// 3. Run the configured strategy until the job queue drains
///
/// # Arguments
///
/// * `config` - The crawl configuration
/// * `seed` - Normalized seed URL, see [`crate::url::normalize_seed`]
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - Crawl finished; a seed that could not be fetched
///   still counts as finished
/// * `Err(MirrorError)` - The client could not be built or a worker panicked
pub async fn crawl(config: &Config, seed: Url) -> Result<CrawlSummary, MirrorError> {
    let crawler = &config.crawler;
    let client = build_http_client(crawler.timeout())?;
    let mut state =
        CrawlState::new(client, crawler.max_depth).with_retry_backoff(crawler.retry_backoff());

    if crawler.respect_robots {
        match state.load_robots(&seed).await {
            Ok(()) => tracing::info!("loaded robots.txt for {}", seed),
            Err(e) => tracing::warn!("{}; crawling without restrictions", e),
        }
    }

    tracing::info!(
        "mirroring {} (depth {}, {} workers, {:?} strategy) into {}",
        seed,
        crawler.max_depth,
        crawler.workers,
        crawler.strategy,
        config.output.mirror_root.display()
    );

    let state = Arc::new(state);
    let summary = match crawler.strategy {
        Strategy::Queue => run_queue(state, seed, config).await?,
        Strategy::Eager => run_eager(state, seed, config).await?,
    };

    tracing::info!(
        "crawl finished: {} saved, {} failed",
        summary.saved,
        summary.failures()
    );
    Ok(summary)
}
