//! Email-Scraper main entry point
//!
//! This is the command-line interface for the bulk email scraper.

use anyhow::Context;
use clap::Parser;
use email_scraper::config::{load_config_with_hash, validate_scraper_config, Config};
use email_scraper::input::read_url_list;
use email_scraper::output::{print_statistics, timestamped_output_path, write_csv, RunStatistics};
use email_scraper::run_scrape;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::Subscriber;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer};

/// Email-Scraper: a polite bulk contact extractor
///
/// Reads a list of URLs (one per line), fetches every page with bounded
/// concurrency and a minimum delay between requests, and writes the page
/// title and email addresses found on each page to a CSV file.
#[derive(Parser, Debug)]
#[command(name = "email-scraper")]
#[command(version)]
#[command(about = "Extract email addresses from a list of web pages", long_about = None)]
struct Cli {
    /// Path to a text file with one URL per line
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// CSV file to write (default: timestamped file in the output directory)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Maximum number of pages fetched at once
    #[arg(long, value_name = "N")]
    concurrency: Option<u32>,

    /// Minimum seconds between two requests
    #[arg(long, value_name = "SECS")]
    delay: Option<f64>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<f64>,

    /// Extra attempts for timeouts, connection errors and 429/5xx responses
    #[arg(long, value_name = "N")]
    retries: Option<u32>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and input, show what would be scraped, then exit
    #[arg(long)]
    dry_run: bool,

    /// Also append logs to this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    let config = load_effective_config(&cli)?;

    let urls = read_url_list(&cli.input)
        .with_context(|| format!("Failed to load URLs from {}", cli.input.display()))?;
    tracing::info!("Loaded {} URLs from {}", urls.len(), cli.input.display());

    let output_path = cli.output.clone().unwrap_or_else(|| {
        timestamped_output_path(Path::new(&config.output.directory), chrono::Local::now())
    });

    if cli.dry_run {
        handle_dry_run(&config, &urls, &output_path);
        return Ok(());
    }

    handle_scrape(&config, urls, &output_path, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Console output is always on; `log_file`, when given, receives the same
/// events without ANSI colors.
fn setup_logging(verbose: u8, quiet: bool, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("email_scraper=info,warn"),
            1 => EnvFilter::new("email_scraper=debug,info"),
            2 => EnvFilter::new("email_scraper=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let file_layer = match log_file {
        Some(path) => Some(file_log_layer(open_log_file(path)?)),
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false),
        )
        .with(file_layer)
        .init();

    Ok(())
}

/// Opens the log file for appending, creating it if needed
fn open_log_file(path: &Path) -> anyhow::Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}

/// Plain-text formatting layer writing to `file`
fn file_log_layer<S>(file: File) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
}

/// Loads the config file (if any) and applies command-line overrides
fn load_effective_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(concurrency) = cli.concurrency {
        config.scraper.concurrency_limit = concurrency;
    }
    if let Some(delay) = cli.delay {
        config.scraper.inter_dispatch_delay = delay;
    }
    if let Some(timeout) = cli.timeout {
        config.scraper.per_request_timeout = timeout;
    }
    if let Some(retries) = cli.retries {
        config.scraper.max_retries = retries;
    }

    validate_scraper_config(&config.scraper).context("Invalid command-line option")?;
    Ok(config)
}

/// Handles the --dry-run mode: shows the effective settings and input size
fn handle_dry_run(config: &Config, urls: &[String], output_path: &Path) {
    println!("=== Email-Scraper Dry Run ===\n");

    println!("Scraper Configuration:");
    println!("  Concurrency limit: {}", config.scraper.concurrency_limit);
    println!(
        "  Inter-dispatch delay: {}s",
        config.scraper.inter_dispatch_delay
    );
    println!(
        "  Per-request timeout: {}s",
        config.scraper.per_request_timeout
    );
    println!(
        "  Retries: {} ({}s apart)",
        config.scraper.max_retries, config.scraper.retry_delay
    );

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.value);

    println!("\nOutput:");
    println!("  {}", output_path.display());

    println!("\nInput ({} URLs):", urls.len());
    for url in urls.iter().take(10) {
        println!("  - {}", url);
    }
    if urls.len() > 10 {
        println!("  ... and {} more", urls.len() - 10);
    }

    // Lower bound from pacing alone
    let min_seconds = config.scraper.inter_dispatch_delay * urls.len().saturating_sub(1) as f64;
    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would scrape {} URLs (at least {:.1}s with current pacing)",
        urls.len(),
        min_seconds
    );
}

/// Handles the main scrape operation
async fn handle_scrape(
    config: &Config,
    urls: Vec<String>,
    output_path: &Path,
    quiet: bool,
) -> anyhow::Result<()> {
    let records = match run_scrape(config, urls).await {
        Ok(records) => records,
        Err(e) => {
            tracing::error!("Scrape failed: {}", e);
            return Err(e.into());
        }
    };

    write_csv(output_path, &records)
        .with_context(|| format!("Failed to write results to {}", output_path.display()))?;

    if !quiet {
        print_statistics(&RunStatistics::from_records(&records));
        println!("\nResults saved to: {}", output_path.display());
    }

    Ok(())
}
