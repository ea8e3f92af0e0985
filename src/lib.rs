//! Sumi-Mirror: an offline website mirror
//!
//! This crate crawls a single website from a seed page, follows same-host links
//! up to a bounded depth, rewrites embedded resource links to relative local
//! paths and saves every resource under a host-mirrored directory tree.

pub mod config;
pub mod crawler;
pub mod mirror;
pub mod output;
pub mod robots;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Sumi-Mirror operations
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] UrlError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("HTML parse error for {url}: {message}")]
    Parse { url: String, message: String },

    #[error("Depth {depth} exceeds maximum depth {max_depth}")]
    DepthExceeded { depth: u32, max_depth: u32 },

    #[error("Failed to load robots.txt: {0}")]
    RobotsLoad(String),

    #[error("Failed to write {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Crawl task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Errors returned by a fetch once its retry budget is spent
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url} after {attempts} attempts")]
    Timeout { url: String, attempts: u32 },

    #[error("Failed to download {url}: status code {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to download {url}: {source}")]
    Http { url: String, source: reqwest::Error },
}

impl FetchError {
    /// Returns true if the fetch ran out of attempts on timeouts
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Sumi-Mirror operations
pub type Result<T> = std::result::Result<T, MirrorError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::{Config, Strategy};
pub use crawler::crawl;
pub use mirror::local_path;
pub use output::CrawlSummary;
pub use crate::url::{normalize_seed, same_host};
