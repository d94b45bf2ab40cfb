//! Pipeline coordinator - per-URL processing and run orchestration
//!
//! This module ties the pipeline together:
//! - Building the run-scoped context (shared client, timeouts, retry policy)
//! - Running fetch, extraction and domain resolution for one URL
//! - Normalizing every outcome into a [`ResultRecord`]
//! - Driving the scheduler over the full URL list

use crate::config::{validate, Config, ScraperConfig};
use crate::pipeline::extractor::extract;
use crate::pipeline::fetcher::{build_http_client, fetch, FetchOutcome};
use crate::pipeline::record::ResultRecord;
use crate::pipeline::scheduler::{Scheduler, SchedulerConfig};
use crate::url::resolve_domain;
use crate::InputError;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// State shared by every job of one run
///
/// Created when a run starts and dropped when it ends; dropping it releases
/// every pooled connection held by the client.
#[derive(Debug)]
pub struct RunContext {
    client: Client,
    timeout: Duration,
    max_retries: u32,
    retry_delay: Duration,
}

impl RunContext {
    /// Builds the context from the configuration
    pub fn new(config: &Config) -> crate::Result<Self> {
        let client = build_http_client(&config.user_agent)?;
        Ok(Self::with_client(client, &config.scraper))
    }

    /// Wraps an existing client with the pipeline settings
    pub fn with_client(client: Client, config: &ScraperConfig) -> Self {
        Self {
            client,
            timeout: config.per_request_timeout(),
            max_retries: config.max_retries,
            retry_delay: config.retry_delay(),
        }
    }

    /// Fetches a URL, retrying retryable failures up to `max_retries` times
    async fn fetch_with_retries(&self, url: &str) -> FetchOutcome {
        let mut attempt = 0;

        loop {
            let outcome = fetch(&self.client, url, self.timeout).await;

            match outcome {
                FetchOutcome::Failed { reason }
                    if reason.is_retryable() && attempt < self.max_retries =>
                {
                    attempt += 1;
                    tracing::debug!(
                        "Retrying {} after {} (attempt {}/{})",
                        url,
                        reason,
                        attempt,
                        self.max_retries
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
                other => return other,
            }
        }
    }
}

/// Processes a single URL into its result record
///
/// This function:
/// 1. Resolves the domain (never fails)
/// 2. Fetches the page, retrying if configured
/// 3. Extracts the title and emails from a fetched body
/// 4. Builds the record, using the domain as business label when needed
pub async fn process_url(context: &RunContext, url: &str) -> ResultRecord {
    let domain = resolve_domain(url);

    match context.fetch_with_retries(url).await {
        FetchOutcome::Fetched { body, status } => {
            let extraction = extract(&body);
            if extraction.degraded {
                tracing::warn!("Body of {} is not parseable as HTML", url);
            }

            tracing::debug!(
                "Fetched {} (HTTP {}, {} bytes, {} emails)",
                url,
                status,
                body.len(),
                extraction.emails.len()
            );

            ResultRecord::fetched(url, domain, extraction)
        }
        FetchOutcome::Failed { reason } => {
            tracing::warn!("Error scraping {}: {}", url, reason);
            ResultRecord::failed(url, domain, reason)
        }
    }
}

/// Main pipeline coordinator structure
pub struct Coordinator {
    context: Arc<RunContext>,
    scheduler: Scheduler,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(ScraperError)` - The HTTP client could not be built
    pub fn new(config: &Config) -> crate::Result<Self> {
        let context = RunContext::new(config)?;
        Ok(Self::with_context(context, &config.scraper))
    }

    /// Creates a coordinator around an existing context
    pub fn with_context(context: RunContext, config: &ScraperConfig) -> Self {
        Self {
            context: Arc::new(context),
            scheduler: Scheduler::new(SchedulerConfig::from(config)),
        }
    }

    /// Runs the pipeline over every URL
    ///
    /// Always returns one record per URL, in input order.
    pub async fn run(&self, urls: Vec<String>) -> Vec<ResultRecord> {
        let total = urls.len();
        let start_time = std::time::Instant::now();
        tracing::info!(
            "Starting scrape of {} URLs (concurrency {}, delay {:?})",
            total,
            self.scheduler.config().concurrency_limit,
            self.scheduler.config().inter_dispatch_delay
        );

        let records = self
            .scheduler
            .run(urls, |_, url| {
                let context = Arc::clone(&self.context);
                async move { process_url(&context, &url).await }
            })
            .await;

        let failed = records.iter().filter(|r| !r.is_success()).count();
        tracing::info!(
            "Scrape completed: {} URLs, {} failed, in {:?}",
            total,
            failed,
            start_time.elapsed()
        );

        records
    }
}

/// Runs a complete scrape
///
/// This function:
/// 1. Rejects an invalid configuration or an empty URL list before any
///    request is made
/// 2. Builds the run context and scheduler
/// 3. Processes every URL
/// 4. Drops the context, releasing all connections
///
/// # Returns
///
/// * `Ok(Vec<ResultRecord>)` - One record per URL, in input order
/// * `Err(ScraperError)` - The run could not start
///
/// # Example
///
/// ```no_run
/// use email_scraper::config::Config;
/// use email_scraper::run_scrape;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let urls = vec!["https://example.com/".to_string()];
/// let records = run_scrape(&Config::default(), urls).await?;
/// println!("{}: {}", records[0].business, records[0].emails);
/// # Ok(())
/// # }
/// ```
pub async fn run_scrape(
    config: &Config,
    urls: Vec<String>,
) -> crate::Result<Vec<ResultRecord>> {
    validate(config)?;
    if urls.is_empty() {
        return Err(InputError::Empty.into());
    }

    let coordinator = Coordinator::new(config)?;
    Ok(coordinator.run(urls).await)
}
