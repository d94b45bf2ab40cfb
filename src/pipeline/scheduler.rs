//! Scheduler for bounded, paced execution of per-URL jobs
//!
//! This module handles:
//! - Global concurrency limiting via a semaphore
//! - Minimum spacing between successive dispatches
//! - Reassembling results in input order
//! - Isolating jobs that panic or are lost

use crate::config::ScraperConfig;
use crate::pipeline::fetcher::FailureReason;
use crate::pipeline::record::ResultRecord;
use crate::url::resolve_domain;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tokio::time::Instant;

/// How often a progress line is logged, in completed jobs
const PROGRESS_INTERVAL: usize = 10;

/// Scheduler limits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Maximum number of jobs running at once
    pub concurrency_limit: usize,

    /// Minimum time between two dispatches
    pub inter_dispatch_delay: Duration,
}

impl From<&ScraperConfig> for SchedulerConfig {
    fn from(config: &ScraperConfig) -> Self {
        Self {
            concurrency_limit: config.concurrency_limit as usize,
            inter_dispatch_delay: config.inter_dispatch_delay(),
        }
    }
}

/// Scheduler runs one job per URL under the configured limits
///
/// Dispatch follows input order. A job starts only once it holds a semaphore
/// permit and at least `inter_dispatch_delay` has passed since the previous
/// dispatch. Completed jobs are written into per-index slots so the returned
/// records match the input order whatever order the jobs finish in.
pub struct Scheduler {
    /// Global semaphore for limiting concurrent jobs
    semaphore: Arc<Semaphore>,

    config: SchedulerConfig,
}

/// Completed-job bookkeeping for one run
struct Slots {
    records: Vec<Option<ResultRecord>>,
    completed: usize,
    started: Instant,
}

impl Slots {
    fn new(total: usize) -> Self {
        Self {
            records: (0..total).map(|_| None).collect(),
            completed: 0,
            started: Instant::now(),
        }
    }

    fn store(&mut self, joined: Result<(usize, ResultRecord), JoinError>) {
        match joined {
            Ok((index, record)) => {
                self.records[index] = Some(record);
            }
            Err(e) => {
                // The slot stays empty and is filled with a failure record at the end
                tracing::error!("Scrape job did not complete: {}", e);
            }
        }

        self.completed += 1;
        if self.completed % PROGRESS_INTERVAL == 0 {
            let elapsed = self.started.elapsed().as_secs_f64();
            let rate = if elapsed > 0.0 {
                self.completed as f64 / elapsed
            } else {
                0.0
            };
            tracing::info!(
                "Progress: {}/{} URLs processed, {:.2} URLs/sec",
                self.completed,
                self.records.len(),
                rate
            );
        }
    }
}

impl Scheduler {
    /// Creates a new scheduler
    ///
    /// A `concurrency_limit` of zero is treated as one.
    pub fn new(config: SchedulerConfig) -> Self {
        let permits = config.concurrency_limit.max(1);

        Self {
            semaphore: Arc::new(Semaphore::new(permits)),
            config,
        }
    }

    /// Returns the scheduler limits
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Runs `job` once for every URL and returns the records in input order
    ///
    /// `job` receives the input index and the URL and must produce a record.
    /// A job that panics yields a failure record for its URL; the other jobs
    /// are unaffected.
    ///
    /// # Example
    ///
    /// ```
    /// use email_scraper::pipeline::{ResultRecord, Scheduler, SchedulerConfig};
    /// use std::time::Duration;
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// let scheduler = Scheduler::new(SchedulerConfig {
    ///     concurrency_limit: 2,
    ///     inter_dispatch_delay: Duration::ZERO,
    /// });
    /// let urls = vec!["https://a.test/".to_string(), "https://b.test/".to_string()];
    /// let records = scheduler
    ///     .run(urls, |_, url| async move {
    ///         ResultRecord::failed(&url, "n/a".to_string(), email_scraper::FailureReason::Timeout)
    ///     })
    ///     .await;
    /// assert_eq!(records[1].url, "https://b.test/");
    /// # }
    /// ```
    pub async fn run<F, Fut>(&self, urls: Vec<String>, mut job: F) -> Vec<ResultRecord>
    where
        F: FnMut(usize, String) -> Fut,
        Fut: Future<Output = ResultRecord> + Send + 'static,
    {
        let mut slots = Slots::new(urls.len());
        let mut in_flight = JoinSet::new();
        let mut last_dispatch: Option<Instant> = None;

        for (index, url) in urls.iter().enumerate() {
            if let Some(last) = last_dispatch {
                tokio::time::sleep_until(last + self.config.inter_dispatch_delay).await;
            }

            let permit = match self.semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    // Only reachable if the semaphore is closed, which this type never does
                    tracing::error!("Scheduler semaphore closed: {}", e);
                    break;
                }
            };

            // Reap finished jobs so completed tasks do not pile up
            while let Some(joined) = in_flight.try_join_next() {
                slots.store(joined);
            }

            last_dispatch = Some(Instant::now());
            tracing::debug!("Dispatching job {} for {}", index, url);

            let task = job(index, url.clone());
            in_flight.spawn(async move {
                let record = task.await;
                drop(permit);
                (index, record)
            });
        }

        while let Some(joined) = in_flight.join_next().await {
            slots.store(joined);
        }

        slots
            .records
            .into_iter()
            .zip(urls)
            .map(|(slot, url)| {
                slot.unwrap_or_else(|| {
                    let domain = resolve_domain(&url);
                    ResultRecord::failed(
                        &url,
                        domain,
                        FailureReason::Other("scrape job aborted".to_string()),
                    )
                })
            })
            .collect()
    }
}
