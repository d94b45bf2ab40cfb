//! Statistics for a completed scrape run
//!
//! This module summarizes result records and prints the summary shown at
//! the end of a run.

use crate::pipeline::ResultRecord;
use std::collections::{BTreeMap, HashSet};

/// Scrape run statistics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStatistics {
    /// Number of URLs processed
    pub total_urls: usize,

    /// URLs fetched with HTTP 200
    pub succeeded: usize,

    /// URLs whose fetch failed
    pub failed: usize,

    /// Fetched URLs that yielded at least one email
    pub urls_with_emails: usize,

    /// Emails across all records (duplicates across URLs counted once)
    pub unique_emails: usize,

    /// Failure counts keyed by failure category
    pub failures_by_category: BTreeMap<&'static str, usize>,
}

impl RunStatistics {
    /// Builds statistics from a run's records
    pub fn from_records(records: &[ResultRecord]) -> Self {
        let mut stats = Self {
            total_urls: records.len(),
            ..Self::default()
        };
        let mut emails = HashSet::new();

        for record in records {
            match &record.failure {
                None => {
                    stats.succeeded += 1;
                    if record.email_count() > 0 {
                        stats.urls_with_emails += 1;
                    }
                }
                Some(reason) => {
                    stats.failed += 1;
                    *stats
                        .failures_by_category
                        .entry(reason.category())
                        .or_insert(0) += 1;
                }
            }

            if !record.emails.is_empty() {
                emails.extend(record.emails.split(crate::pipeline::EMAIL_SEPARATOR));
            }
        }

        stats.unique_emails = emails.len();
        stats
    }

    /// Returns the success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_urls == 0 {
            return 0.0;
        }
        (self.succeeded as f64 / self.total_urls as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &RunStatistics) {
    println!("=== Scrape Statistics ===\n");

    println!("Overview:");
    println!("  URLs processed: {}", stats.total_urls);
    println!("  Fetched: {}", stats.succeeded);
    println!("  Failed: {}", stats.failed);
    println!("  URLs with emails: {}", stats.urls_with_emails);
    println!("  Unique emails: {}", stats.unique_emails);
    println!();

    if !stats.failures_by_category.is_empty() {
        println!("Failure Summary:");
        let mut counts: Vec<_> = stats.failures_by_category.iter().collect();
        counts.sort_by(|a, b| b.1.cmp(a.1));

        for (category, count) in counts {
            println!("  {}: {}", category, count);
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} URLs fetched)",
        stats.success_rate(),
        stats.succeeded,
        stats.total_urls
    );
}
