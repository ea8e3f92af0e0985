//! Crawler coordinator - crawl orchestration for both strategies
//!
//! This module owns the producer side of the job queue:
//! - Queue strategy: a frontier fed by worker completions
//! - Eager strategy: full discovery up front, then a one-shot enqueue
//!
//! In both cases the crawl ends when the producer drops its sender and the
//! worker pool has drained the queue.

use crate::config::Config;
use crate::crawler::discovery::discover;
use crate::crawler::fetcher::DEFAULT_RETRIES;
use crate::crawler::state::CrawlState;
use crate::crawler::worker::{Completion, Job, JobOutcome, WorkerPool};
use crate::output::{CrawlStats, CrawlSummary};
use crate::MirrorError;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::mpsc;
use url::Url;

/// Runs a self-feeding crawl
///
/// Workers report every processed job together with the links they admitted.
/// The coordinator keeps those in a local frontier and hands them back to the
/// pool as queue slots free up. Workers never send on the bounded queue
/// themselves, so a full queue cannot stall the pool.
///
/// # Arguments
///
/// * `state` - Shared crawl state, robots rules already loaded
/// * `seed` - Normalized seed URL
/// * `config` - Crawl configuration
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - Crawl finished, including a failed seed or a
///   worker that died mid-job
/// * `Err(MirrorError)` - A worker died after the queue closed
pub async fn run_queue(
    state: Arc<CrawlState>,
    seed: Url,
    config: &Config,
) -> Result<CrawlSummary, MirrorError> {
    let stats = Arc::new(CrawlStats::new());
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Completion>();
    let (job_tx, mut pool) = WorkerPool::spawn(
        Arc::clone(&state),
        config.output.mirror_root.clone(),
        config.crawler.workers as usize,
        config.crawler.queue_capacity(),
        Arc::clone(&stats),
        Some(done_tx),
    );

    let mut frontier = VecDeque::new();
    if state.try_admit(&seed) {
        frontier.push_back(Job {
            url: seed,
            depth: 0,
        });
    }

    drive_frontier(frontier, &job_tx, &mut done_rx, &mut pool).await;

    drop(job_tx);
    pool.join().await?;

    Ok(stats.summary(state.admitted()))
}

/// Feeds the frontier into the job queue until nothing is pending or in flight
///
/// A worker that dies mid-job never reports a completion, so its exit counts
/// down the in-flight total in place of one.
async fn drive_frontier(
    mut frontier: VecDeque<Job>,
    job_tx: &mpsc::Sender<Job>,
    done_rx: &mut mpsc::UnboundedReceiver<Completion>,
    pool: &mut WorkerPool,
) {
    let mut in_flight = 0usize;

    while !frontier.is_empty() || in_flight > 0 {
        tokio::select! {
            permit = job_tx.reserve(), if !frontier.is_empty() => {
                let Ok(permit) = permit else {
                    tracing::warn!("job queue closed with {} URLs pending", frontier.len());
                    break;
                };
                if let Some(job) = frontier.pop_front() {
                    permit.send(job);
                    in_flight += 1;
                }
            }
            Some(completion) = done_rx.recv() => {
                in_flight = in_flight.saturating_sub(1);
                if completion.job.depth == 0 && completion.outcome == JobOutcome::FetchFailed {
                    tracing::error!("failed to fetch seed {}", completion.job.url);
                }
                tracing::debug!(
                    "{} done, {} new links, {} pending, {} in flight",
                    completion.job.url,
                    completion.follow_ups.len(),
                    frontier.len(),
                    in_flight
                );
                frontier.extend(completion.follow_ups);
            }
            Some(exited) = pool.next_exit() => {
                if let Err(e) = exited {
                    in_flight = in_flight.saturating_sub(1);
                    tracing::error!("worker died, its job is lost: {}", e);
                }
            }
            else => break,
        }
    }
}

/// Runs a two-phase crawl
///
/// The seed is fetched once for discovery, every reachable URL is admitted,
/// then the whole set is pushed through the pool. Workers in this mode do not
/// follow links, so discovered jobs carry the depth limit.
///
/// # Arguments
///
/// * `state` - Shared crawl state, robots rules already loaded
/// * `seed` - Normalized seed URL
/// * `config` - Crawl configuration
pub async fn run_eager(
    state: Arc<CrawlState>,
    seed: Url,
    config: &Config,
) -> Result<CrawlSummary, MirrorError> {
    let stats = Arc::new(CrawlStats::new());
    let (job_tx, pool) = WorkerPool::spawn(
        Arc::clone(&state),
        config.output.mirror_root.clone(),
        config.crawler.workers as usize,
        config.crawler.queue_capacity(),
        Arc::clone(&stats),
        None,
    );

    state.try_admit(&seed);
    match state.fetch(&seed, DEFAULT_RETRIES).await {
        Ok(bytes) => {
            let seed_job = Job {
                url: seed.clone(),
                depth: 0,
            };
            if job_tx.send(seed_job).await.is_err() {
                tracing::warn!("job queue closed before the seed was queued");
            } else {
                let links = if state.is_allowed(&seed) {
                    discover(&state, &bytes, &seed, 0).await.unwrap_or_else(|e| {
                        tracing::warn!("discovery failed for {}: {}", seed, e);
                        Vec::new()
                    })
                } else {
                    Vec::new()
                };
                tracing::info!("discovered {} URLs", links.len());
                enqueue_all(&job_tx, links, state.max_depth()).await;
            }
        }
        Err(e) => {
            tracing::error!("failed to fetch seed {}: {}", seed, e);
            stats.record_fetch_failed();
        }
    }

    drop(job_tx);
    pool.join().await?;

    Ok(stats.summary(state.admitted()))
}

async fn enqueue_all(job_tx: &mpsc::Sender<Job>, urls: Vec<Url>, depth: u32) {
    for url in urls {
        if job_tx.send(Job { url, depth }).await.is_err() {
            tracing::warn!("job queue closed during enqueue");
            return;
        }
    }
}
