//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with a proper user agent and timeout
//! - GET requests returning the response body bytes
//! - Retry logic for timed-out requests
//! - Error classification

use crate::FetchError;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Retry budget used for every page and asset fetch
pub const DEFAULT_RETRIES: u32 = 2;

/// Pause between timed-out attempts
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_secs(2);

/// User agent sent with every request
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `timeout` - Deadline applied to every request made with this client
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use sumi_mirror::crawler::build_http_client;
///
/// let client = build_http_client(Duration::from_secs(10)).unwrap();
/// ```
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Performs a single GET request and returns the body
///
/// Non-2xx statuses are reported as [`FetchError::Status`]. Timeouts keep the
/// underlying error so [`fetch_with_retry`] can recognize them.
pub async fn fetch_once(client: &Client, url: &Url) -> Result<Vec<u8>, FetchError> {
    let http_error = |source| FetchError::Http {
        url: url.to_string(),
        source,
    };

    let response = client
        .get(url.as_str())
        .send()
        .await
        .map_err(http_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.bytes().await.map_err(http_error)?;
    Ok(body.to_vec())
}

/// Fetches a URL, retrying only when the request timed out
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | HTTP 2xx | Return body |
/// | Timeout | Sleep `backoff`, retry (up to `retries` more attempts) |
/// | Non-2xx status | Immediate failure |
/// | Connection / other error | Immediate failure |
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
/// * `retries` - Additional attempts allowed after a timeout
/// * `backoff` - Fixed pause before each retry
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - The response body
/// * `Err(FetchError)` - Terminal failure, or [`FetchError::Timeout`] once
///   every attempt timed out
pub async fn fetch_with_retry(
    client: &Client,
    url: &Url,
    retries: u32,
    backoff: Duration,
) -> Result<Vec<u8>, FetchError> {
    let attempts = retries.saturating_add(1);

    for attempt in 1..=attempts {
        match fetch_once(client, url).await {
            Ok(body) => return Ok(body),
            Err(FetchError::Http { source, .. }) if source.is_timeout() => {
                tracing::warn!("timeout fetching {} (attempt {}/{})", url, attempt, attempts);
                if attempt < attempts {
                    tokio::time::sleep(backoff).await;
                }
            }
            Err(e) => return Err(e),
        }
    }

    Err(FetchError::Timeout {
        url: url.to_string(),
        attempts,
    })
}
