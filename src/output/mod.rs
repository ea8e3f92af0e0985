//! Output module for crawl statistics and the end-of-run report

pub mod stats;

pub use stats::{print_summary, CrawlStats, CrawlSummary};
