//! Sumi-Mirror main entry point
//!
//! This is the command-line interface for the Sumi-Mirror site mirroring tool.

use anyhow::Context;
use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use std::time::Duration;
use sumi_mirror::config::{load_config, parse_duration, validate, Config, Strategy};
use sumi_mirror::crawler::crawl;
use sumi_mirror::output::print_summary;
use sumi_mirror::url::normalize_seed;
use tracing_subscriber::EnvFilter;

/// Sumi-Mirror: an offline website mirror
///
/// Sumi-Mirror downloads a website starting from one URL, follows links on
/// the same host up to a depth limit and rewrites them so the copy can be
/// browsed from disk.
#[derive(Parser, Debug)]
#[command(name = "sumi-mirror")]
#[command(version = "1.0.0")]
#[command(about = "Mirror a website for offline browsing", long_about = None)]
#[command(disable_help_flag = true)]
struct Cli {
    /// URL to start from (https:// is assumed when no scheme is given)
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Maximum link depth to follow from the start page
    #[arg(short, long, value_name = "N")]
    depth: Option<u32>,

    /// Number of concurrent download workers
    #[arg(short, long, value_name = "N")]
    concurrency: Option<u32>,

    /// Per-request timeout (e.g. 500ms, 10s, 2m)
    #[arg(short, long, value_name = "DURATION", value_parser = parse_timeout)]
    timeout: Option<Duration>,

    /// Respect the site's robots.txt
    #[arg(long)]
    robots: bool,

    /// Directory that receives the mirrored sites
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Discover every page before downloading instead of feeding the queue as pages arrive
    #[arg(long)]
    eager_discovery: bool,

    /// Path to a TOML configuration file; flags override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Print help
    #[arg(short, long)]
    help: bool,
}

fn parse_timeout(raw: &str) -> Result<Duration, String> {
    parse_duration(raw).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let Some(raw_url) = cli.url.as_deref().filter(|_| !cli.help) else {
        print_usage_and_exit();
    };

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let seed = normalize_seed(raw_url).with_context(|| format!("invalid URL {:?}", raw_url))?;

    let config = build_config(&cli)?;
    tracing::debug!("effective configuration: {:?}", config);

    let summary = match crawl(&config, seed).await {
        Ok(summary) => summary,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    if !cli.quiet {
        print_summary(&summary);
    }

    Ok(())
}

/// Prints usage to stderr and exits with a failure status
fn print_usage_and_exit() -> ! {
    let help = Cli::command().render_help();
    eprintln!("{}", help);
    std::process::exit(1);
}

/// Loads the optional config file and applies command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };

    let crawler = &mut config.crawler;
    if let Some(depth) = cli.depth {
        crawler.max_depth = depth;
    }
    if let Some(workers) = cli.concurrency {
        crawler.workers = workers;
    }
    if let Some(timeout) = cli.timeout {
        crawler.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
    }
    if cli.robots {
        crawler.respect_robots = true;
    }
    if cli.eager_discovery {
        crawler.strategy = Strategy::Eager;
    }
    if let Some(output) = &cli.output {
        config.output.mirror_root = output.clone();
    }

    validate(&config).context("invalid configuration")?;
    Ok(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_mirror=info,warn"),
            1 => EnvFilter::new("sumi_mirror=debug,info"),
            2 => EnvFilter::new("sumi_mirror=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
