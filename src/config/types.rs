use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Sumi-Mirror
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// How discovered links reach the worker pool
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Workers feed admitted same-host links back into the job queue
    #[default]
    Queue,
    /// A discovery routine walks the whole link graph first, then hands the
    /// flattened list to the workers
    Eager,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Maximum link depth from the seed page (0 = seed only)
    #[serde(default)]
    pub max_depth: u32,

    /// Number of concurrent workers
    #[serde(default = "default_workers")]
    pub workers: u32,

    /// Per-request timeout (milliseconds)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Whether to honor the site's robots.txt
    #[serde(default)]
    pub respect_robots: bool,

    /// Pause before retrying a timed-out request (milliseconds)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    #[serde(default)]
    pub strategy: Strategy,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Directory that receives one subdirectory per crawled host
    #[serde(default = "default_mirror_root")]
    pub mirror_root: PathBuf,
}

fn default_workers() -> u32 {
    4
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_retry_backoff_ms() -> u64 {
    2_000
}

fn default_mirror_root() -> PathBuf {
    PathBuf::from(crate::mirror::DEFAULT_MIRROR_ROOT)
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 0,
            workers: default_workers(),
            timeout_ms: default_timeout_ms(),
            respect_robots: false,
            retry_backoff_ms: default_retry_backoff_ms(),
            strategy: Strategy::default(),
        }
    }
}

impl CrawlerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    /// Capacity of the bounded job queue
    pub fn queue_capacity(&self) -> usize {
        (self.workers as usize).saturating_mul(2).max(1)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            mirror_root: default_mirror_root(),
        }
    }
}
