//! Worker pool
//!
//! A fixed number of tokio tasks drain a bounded job queue. Each job is one
//! URL to fetch, rewrite (when it is markup) and save under the mirror root.
//! The pool stops when the queue is closed and empty.

use crate::crawler::fetcher::DEFAULT_RETRIES;
use crate::crawler::parser::{extract_and_rewrite, is_markup};
use crate::crawler::state::CrawlState;
use crate::mirror::{local_path, save};
use crate::output::CrawlStats;
use crate::url::same_host;
use crate::MirrorError;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use url::Url;

/// One URL to fetch, rewrite and save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub url: Url,

    /// Link distance from the seed page
    pub depth: u32,
}

/// What happened to a job
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Saved(PathBuf),
    SkippedRobots,
    FetchFailed,
    ParseFailed,
    SaveFailed,
}

/// Report sent back to the coordinator for every processed job
#[derive(Debug)]
pub struct Completion {
    pub job: Job,
    pub outcome: JobOutcome,

    /// Newly admitted same-host links one level deeper than `job`
    pub follow_ups: Vec<Job>,
}

/// Everything a worker needs besides its queue
#[derive(Clone)]
struct WorkerContext {
    state: Arc<CrawlState>,
    mirror_root: Arc<PathBuf>,
    stats: Arc<CrawlStats>,
    completions: Option<mpsc::UnboundedSender<Completion>>,
}

impl WorkerContext {
    fn follows_links(&self) -> bool {
        self.completions.is_some()
    }
}

/// Handle on a running set of workers
pub struct WorkerPool {
    workers: JoinSet<()>,
}

impl WorkerPool {
    /// Starts `workers` tasks reading from a queue of `capacity` slots
    ///
    /// # Arguments
    ///
    /// * `state` - Shared crawl state
    /// * `mirror_root` - Directory that receives the mirrored files
    /// * `workers` - Number of concurrent workers
    /// * `capacity` - Bound of the job queue
    /// * `stats` - Counters updated by every job
    /// * `completions` - When set, every job reports a [`Completion`] here and
    ///   workers admit follow-up jobs for the links they find
    ///
    /// # Returns
    ///
    /// The sending half of the job queue and the pool handle. Dropping every
    /// sender closes the queue; the workers exit once it is empty.
    pub fn spawn(
        state: Arc<CrawlState>,
        mirror_root: PathBuf,
        workers: usize,
        capacity: usize,
        stats: Arc<CrawlStats>,
        completions: Option<mpsc::UnboundedSender<Completion>>,
    ) -> (mpsc::Sender<Job>, Self) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let receiver = Arc::new(Mutex::new(receiver));
        let context = WorkerContext {
            state,
            mirror_root: Arc::new(mirror_root),
            stats,
            completions,
        };

        let mut set = JoinSet::new();
        for id in 0..workers.max(1) {
            set.spawn(run_worker(id, Arc::clone(&receiver), context.clone()));
        }

        (sender, Self { workers: set })
    }

    /// Waits for the next worker to exit
    ///
    /// While the queue is open a worker only exits by panicking, which shows
    /// up here as `Some(Err(_))`. Returns None once every worker is gone.
    pub async fn next_exit(&mut self) -> Option<Result<(), MirrorError>> {
        let exited = self.workers.join_next().await?;
        Some(exited.map_err(MirrorError::from))
    }

    #[cfg(test)]
    pub(crate) fn from_tasks(workers: JoinSet<()>) -> Self {
        Self { workers }
    }

    /// Waits for every worker to finish
    pub async fn join(mut self) -> Result<(), MirrorError> {
        while let Some(result) = self.workers.join_next().await {
            result?;
        }
        Ok(())
    }
}

async fn run_worker(id: usize, jobs: Arc<Mutex<mpsc::Receiver<Job>>>, context: WorkerContext) {
    tracing::debug!(worker = id, "worker started");

    loop {
        let job = {
            let mut receiver = jobs.lock().await;
            receiver.recv().await
        };
        let Some(job) = job else {
            break;
        };

        let completion = process_job(&context, job).await;
        if let Some(completions) = &context.completions {
            if completions.send(completion).is_err() {
                tracing::debug!(worker = id, "coordinator gone, dropping completion");
            }
        }
    }

    tracing::debug!(worker = id, "worker finished");
}

/// Fetches, rewrites and saves one job
///
/// 1. Skip if robots.txt disallows the URL
/// 2. Fetch with the standard retry budget
/// 3. Rewrite links if the content is markup
/// 4. Save to the URL's mirror path
async fn process_job(context: &WorkerContext, job: Job) -> Completion {
    let state = &context.state;
    let stats = &context.stats;

    if !state.is_allowed(&job.url) {
        tracing::info!("robots.txt disallow: skipping {}", job.url);
        stats.record_robots_skipped();
        return Completion::without_follow_ups(job, JobOutcome::SkippedRobots);
    }

    let bytes = match state.fetch(&job.url, DEFAULT_RETRIES).await {
        Ok(bytes) => {
            stats.record_fetched();
            bytes
        }
        Err(e) => {
            tracing::warn!("fetch error {}: {}", job.url, e);
            stats.record_fetch_failed();
            return Completion::without_follow_ups(job, JobOutcome::FetchFailed);
        }
    };

    let (payload, discovered) = if is_markup(job.url.path(), &bytes) {
        match extract_and_rewrite(&bytes, &job.url) {
            Ok(result) => (result.rewritten, result.discovered),
            Err(e) => {
                tracing::warn!("parse error {}: {}", job.url, e);
                stats.record_parse_failed();
                return Completion::without_follow_ups(job, JobOutcome::ParseFailed);
            }
        }
    } else {
        (bytes, Vec::new())
    };

    let follow_ups = if context.follows_links() {
        admit_follow_ups(state, &job, &discovered)
    } else {
        Vec::new()
    };

    let path = local_path(&context.mirror_root, &job.url);
    let outcome = match save(&path, &payload).await {
        Ok(()) => {
            stats.record_saved(payload.len());
            JobOutcome::Saved(path)
        }
        Err(e) => {
            tracing::warn!("save error {}: {}", job.url, e);
            stats.record_save_failed();
            JobOutcome::SaveFailed
        }
    };

    Completion {
        job,
        outcome,
        follow_ups,
    }
}

/// Admits the same-host links of a processed job as jobs one level deeper
///
/// Nothing is admitted once the job sits at the depth limit.
fn admit_follow_ups(state: &CrawlState, job: &Job, discovered: &[Url]) -> Vec<Job> {
    if job.depth >= state.max_depth() {
        return Vec::new();
    }

    let depth = job.depth + 1;
    discovered
        .iter()
        .filter(|link| same_host(link, &job.url))
        .filter(|link| state.try_admit(link))
        .map(|link| Job {
            url: link.clone(),
            depth,
        })
        .collect()
}

impl Completion {
    fn without_follow_ups(job: Job, outcome: JobOutcome) -> Self {
        Self {
            job,
            outcome,
            follow_ups: Vec::new(),
        }
    }
}
