//! Configuration module for Sumi-Mirror
//!
//! Settings come from command-line flags, optionally layered over a TOML file.
//!
//! # Example
//!
//! ```no_run
//! use sumi_mirror::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("mirror.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, Strategy};

pub use parser::{load_config, parse_duration};
pub use validation::validate;
