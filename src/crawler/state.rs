//! Shared crawl state
//!
//! One `CrawlState` exists per crawl run and is shared by `Arc` between the
//! producer and every worker. It owns the admission set that guarantees each
//! URL is processed at most once.

use crate::crawler::fetcher::{fetch_with_retry, DEFAULT_RETRY_BACKOFF};
use crate::robots::{fetch_robots, ParsedRobots};
use crate::url::visit_key;
use crate::{FetchError, MirrorError};
use dashmap::DashSet;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// State shared by every routine of one crawl run
#[derive(Debug)]
pub struct CrawlState {
    /// Maximum link depth from the seed (0 = seed only)
    max_depth: u32,

    /// URLs admitted for processing, keyed without fragment
    visited: DashSet<String>,

    /// Robots rules; None means unrestricted
    robots: Option<ParsedRobots>,

    client: Client,

    /// Pause before retrying a timed-out request
    retry_backoff: Duration,
}

impl CrawlState {
    /// Creates the state for a new crawl run with no robots restrictions
    pub fn new(client: Client, max_depth: u32) -> Self {
        Self {
            max_depth,
            visited: DashSet::new(),
            robots: None,
            client,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
        }
    }

    /// Overrides the pause between timed-out attempts
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// Installs an already parsed robots ruleset
    pub fn with_robots(mut self, robots: ParsedRobots) -> Self {
        self.robots = Some(robots);
        self
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Number of URLs admitted so far
    pub fn admitted(&self) -> usize {
        self.visited.len()
    }

    /// Claims a URL for processing
    ///
    /// The insert is the check: exactly one caller gets `true` for a given
    /// URL, no matter how many race for it. A caller that gets `false` must
    /// not fetch the URL.
    pub fn try_admit(&self, url: &Url) -> bool {
        let admitted = self.visited.insert(visit_key(url));
        if admitted {
            tracing::debug!("admitted {}", url);
        }
        admitted
    }

    /// Checks a URL against the loaded robots rules
    ///
    /// Always true when no rules are loaded.
    pub fn is_allowed(&self, url: &Url) -> bool {
        let Some(robots) = &self.robots else {
            return true;
        };

        let path = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };
        robots.allows(&path)
    }

    /// Returns true if robots rules are loaded
    pub fn has_robots(&self) -> bool {
        self.robots.is_some()
    }

    /// Fetches and installs the site's robots.txt
    ///
    /// On error the state is left unrestricted; the caller decides how loudly
    /// to report it.
    pub async fn load_robots(&mut self, base_url: &Url) -> Result<(), MirrorError> {
        let robots = fetch_robots(
            &self.client,
            base_url,
            super::fetcher::DEFAULT_RETRIES,
            self.retry_backoff,
        )
        .await?;
        self.robots = Some(robots);
        Ok(())
    }

    /// Fetches a URL with the crawl's client and retry backoff
    pub async fn fetch(&self, url: &Url, retries: u32) -> Result<Vec<u8>, FetchError> {
        fetch_with_retry(&self.client, url, retries, self.retry_backoff).await
    }
}
