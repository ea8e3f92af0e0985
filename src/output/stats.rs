//! Crawl statistics
//!
//! Workers record the outcome of every job into a shared [`CrawlStats`]; the
//! crawl returns a [`CrawlSummary`] snapshot once the pool has drained.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Live counters shared by every worker
#[derive(Debug)]
pub struct CrawlStats {
    started: Instant,
    fetched: AtomicU64,
    saved: AtomicU64,
    bytes_saved: AtomicU64,
    robots_skipped: AtomicU64,
    fetch_failed: AtomicU64,
    parse_failed: AtomicU64,
    save_failed: AtomicU64,
}

/// Final numbers of one crawl run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    /// URLs admitted into the visited set
    pub admitted: u64,

    /// Successful fetches made by the worker pool
    pub fetched: u64,

    /// Files written to the mirror
    pub saved: u64,

    /// Total bytes written
    pub bytes_saved: u64,

    /// Jobs skipped because robots.txt disallowed them
    pub robots_skipped: u64,

    pub fetch_failed: u64,
    pub parse_failed: u64,
    pub save_failed: u64,

    /// Wall time of the crawl
    pub elapsed: Duration,
}

impl Default for CrawlStats {
    fn default() -> Self {
        Self::new()
    }
}

impl CrawlStats {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            fetched: AtomicU64::new(0),
            saved: AtomicU64::new(0),
            bytes_saved: AtomicU64::new(0),
            robots_skipped: AtomicU64::new(0),
            fetch_failed: AtomicU64::new(0),
            parse_failed: AtomicU64::new(0),
            save_failed: AtomicU64::new(0),
        }
    }

    pub fn record_fetched(&self) {
        self.fetched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_saved(&self, bytes: usize) {
        self.saved.fetch_add(1, Ordering::Relaxed);
        self.bytes_saved.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub fn record_robots_skipped(&self) {
        self.robots_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fetch_failed(&self) {
        self.fetch_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_parse_failed(&self) {
        self.parse_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_save_failed(&self) {
        self.save_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Takes a snapshot of the counters
    ///
    /// # Arguments
    ///
    /// * `admitted` - Size of the crawl's visited set
    pub fn summary(&self, admitted: usize) -> CrawlSummary {
        CrawlSummary {
            admitted: admitted as u64,
            fetched: self.fetched.load(Ordering::Relaxed),
            saved: self.saved.load(Ordering::Relaxed),
            bytes_saved: self.bytes_saved.load(Ordering::Relaxed),
            robots_skipped: self.robots_skipped.load(Ordering::Relaxed),
            fetch_failed: self.fetch_failed.load(Ordering::Relaxed),
            parse_failed: self.parse_failed.load(Ordering::Relaxed),
            save_failed: self.save_failed.load(Ordering::Relaxed),
            elapsed: self.started.elapsed(),
        }
    }
}

impl CrawlSummary {
    /// Number of jobs that did not end with a saved file
    pub fn failures(&self) -> u64 {
        self.fetch_failed + self.parse_failed + self.save_failed
    }
}

/// Prints a crawl summary to stdout in a formatted manner
pub fn print_summary(summary: &CrawlSummary) {
    println!("=== Mirror Summary ===\n");

    println!("  URLs admitted: {}", summary.admitted);
    println!("  Resources fetched: {}", summary.fetched);
    println!(
        "  Files saved: {} ({} bytes)",
        summary.saved, summary.bytes_saved
    );
    if summary.robots_skipped > 0 {
        println!("  Skipped by robots.txt: {}", summary.robots_skipped);
    }

    if summary.failures() > 0 {
        println!();
        println!("Failures:");
        println!("  Fetch: {}", summary.fetch_failed);
        println!("  Parse: {}", summary.parse_failed);
        println!("  Save: {}", summary.save_failed);
    }

    println!();
    println!("Finished in {:.2}s", summary.elapsed.as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_snapshot() {
        let stats = CrawlStats::new();
        stats.record_fetched();
        stats.record_fetched();
        stats.record_saved(100);
        stats.record_saved(23);
        stats.record_robots_skipped();
        stats.record_fetch_failed();
        stats.record_parse_failed();

        let summary = stats.summary(5);

        assert_eq!(summary.admitted, 5);
        assert_eq!(summary.fetched, 2);
        assert_eq!(summary.saved, 2);
        assert_eq!(summary.bytes_saved, 123);
        assert_eq!(summary.robots_skipped, 1);
        assert_eq!(summary.failures(), 2);
    }

    #[test]
    fn test_empty_summary() {
        let summary = CrawlStats::default().summary(0);
        assert_eq!(summary.saved, 0);
        assert_eq!(summary.failures(), 0);
    }
}
