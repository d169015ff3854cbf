//! Paraulogic crawler main entry point
//!
//! This is the command-line interface for harvesting solution words.

use anyhow::Context;
use chrono::{Duration, Local, NaiveDate};
use clap::Parser;
use paraulogic_crawler::config::{load_config_or_default, validate, Config};
use paraulogic_crawler::crawler::run_crawl;
use paraulogic_crawler::dates::DateRange;
use paraulogic_crawler::output::{print_statistics, write_words};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Default window length when no start date is given
const DEFAULT_WINDOW_DAYS: i64 = 365;

/// Paraulogic crawler: collects every published solution word
///
/// Fetches the solutions page of each day in the date range, extracts the
/// listed words and writes the deduplicated set as JSON.
#[derive(Parser, Debug)]
#[command(name = "paraulogic-crawler")]
#[command(version)]
#[command(about = "Collects Paraulògic solution words from a dated archive", long_about = None)]
struct Cli {
    /// First date to crawl, YYYY-MM-DD (default: one year before the end date)
    #[arg(short, long, value_name = "DATE")]
    start_date: Option<NaiveDate>,

    /// Last date to crawl, inclusive, YYYY-MM-DD (default: today)
    #[arg(short, long, value_name = "DATE")]
    end_date: Option<NaiveDate>,

    /// Output JSON file (overrides the config file)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Maximum concurrent page fetches (overrides the config file)
    #[arg(short = 'j', long)]
    concurrency: Option<usize>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = load_configuration(&cli)?;

    // Bad ranges are fatal and must surface before any request is made
    let end = cli.end_date.unwrap_or_else(|| Local::now().date_naive());
    let start = cli
        .start_date
        .unwrap_or_else(|| end - Duration::days(DEFAULT_WINDOW_DAYS));
    let range = DateRange::new(start, end).context("Invalid date range")?;

    let report = run_crawl(&config, range).await.context("Crawl failed")?;

    if !cli.quiet {
        print_statistics(&report.statistics);
        println!();
    }
    println!("# Unique words: {}", report.result.words.len());

    let output = Path::new(&config.output.path);
    write_words(&report.result, output)
        .with_context(|| format!("Failed to write output to {}", output.display()))?;

    Ok(())
}

/// Loads the config file (or built-in defaults) and applies CLI overrides
fn load_configuration(cli: &Cli) -> anyhow::Result<Config> {
    if let Some(path) = &cli.config {
        tracing::info!("Loading configuration from: {}", path.display());
    }

    let mut config = load_config_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;

    if let Some(output) = &cli.output {
        config.output.path = output.display().to_string();
    }
    if let Some(concurrency) = cli.concurrency {
        config.crawler.max_concurrent_fetches = concurrency;
    }

    validate(&config).context("Invalid configuration")?;
    Ok(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("paraulogic_crawler=info,warn"),
            1 => EnvFilter::new("paraulogic_crawler=debug,info"),
            2 => EnvFilter::new("paraulogic_crawler=trace,debug"),
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
