//! Recursive link discovery
//!
//! The first phase of the eager strategy. Starting from the seed document it
//! walks same-host links depth-first, admitting every URL it meets, and
//! returns the full admitted set so the caller can enqueue it in one go.

use crate::crawler::fetcher::DEFAULT_RETRIES;
use crate::crawler::parser::{extract_links, is_markup};
use crate::crawler::state::CrawlState;
use crate::url::same_host;
use crate::MirrorError;
use std::future::Future;
use std::pin::Pin;
use url::Url;

type DiscoverFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<Url>, MirrorError>> + Send + 'a>>;

/// Collects every same-host URL reachable from a document within the depth limit
///
/// `bytes` is the already fetched body of `base_url`, which sits at `depth`.
/// Links found on it are at `depth + 1` and are admitted while
/// `depth < max_depth`. A newly admitted link is itself fetched and walked
/// only if its own links could still be admitted.
///
/// Fetch and parse errors below the starting document are logged and the
/// branch is abandoned. URLs disallowed by robots.txt are still admitted (the
/// worker will skip them) but never fetched here.
///
/// # Returns
///
/// * `Ok(Vec<Url>)` - Newly admitted URLs in discovery order
/// * `Err(MirrorError::DepthExceeded)` - `depth` is already past the limit
/// * `Err(MirrorError::Parse)` - The starting document could not be parsed
pub fn discover<'a>(
    state: &'a CrawlState,
    bytes: &'a [u8],
    base_url: &'a Url,
    depth: u32,
) -> DiscoverFuture<'a> {
    Box::pin(async move {
        let max_depth = state.max_depth();
        if depth > max_depth {
            return Err(MirrorError::DepthExceeded { depth, max_depth });
        }
        if depth == max_depth || !is_markup(base_url.path(), bytes) {
            return Ok(Vec::new());
        }

        let links = extract_links(bytes, base_url)?;
        let child_depth = depth + 1;
        let mut found = Vec::new();

        for link in links {
            if !same_host(&link, base_url) || !state.try_admit(&link) {
                continue;
            }
            found.push(link.clone());

            if child_depth >= max_depth || !state.is_allowed(&link) {
                continue;
            }

            let body = match state.fetch(&link, DEFAULT_RETRIES).await {
                Ok(body) => body,
                Err(e) => {
                    tracing::debug!("discovery fetch failed {}: {}", link, e);
                    continue;
                }
            };

            match discover(state, &body, &link, child_depth).await {
                Ok(nested) => found.extend(nested),
                Err(e) => tracing::debug!("discovery failed below {}: {}", link, e),
            }
        }

        Ok(found)
    })
}
