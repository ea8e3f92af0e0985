//! Robots.txt handling module
//!
//! This module fetches and parses a site's robots.txt. Enforcement is best
//! effort: when the file cannot be fetched the crawl runs unrestricted.

mod parser;

pub use parser::ParsedRobots;

use crate::crawler::fetch_with_retry;
use crate::MirrorError;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Returns `{scheme}://{host}/robots.txt` for a site URL
pub fn robots_url(base_url: &Url) -> Result<Url, MirrorError> {
    base_url
        .join("/robots.txt")
        .map_err(|e| MirrorError::RobotsLoad(format!("invalid robots.txt URL: {}", e)))
}

/// Fetches robots.txt for the site serving `base_url`
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `base_url` - Any URL on the site
/// * `retries` - Retry budget for timed-out requests
/// * `backoff` - Pause between timed-out attempts
///
/// # Returns
///
/// * `Ok(ParsedRobots)` - Successfully fetched and parsed robots.txt
/// * `Err(MirrorError::RobotsLoad)` - Failed to fetch
pub async fn fetch_robots(
    client: &Client,
    base_url: &Url,
    retries: u32,
    backoff: Duration,
) -> Result<ParsedRobots, MirrorError> {
    let url = robots_url(base_url)?;
    let bytes = fetch_with_retry(client, &url, retries, backoff)
        .await
        .map_err(|e| MirrorError::RobotsLoad(e.to_string()))?;

    tracing::debug!("Loaded robots.txt from {} ({} bytes)", url, bytes.len());
    Ok(ParsedRobots::from_bytes(&bytes))
}
