//! Pipeline module for fetching pages and extracting contacts
//!
//! This module contains the core scraping logic, including:
//! - HTTP fetching with failure classification
//! - HTML parsing and email extraction
//! - Bounded, paced scheduling of per-URL jobs
//! - Per-URL coordination and result normalization

mod coordinator;
mod extractor;
mod fetcher;
mod record;
mod scheduler;

pub use coordinator::{process_url, run_scrape, Coordinator, RunContext};
pub use extractor::{extract, extract_emails, Extraction};
pub use fetcher::{build_http_client, fetch, FailureReason, FetchOutcome};
pub use record::{ResultRecord, EMAIL_SEPARATOR};
pub use scheduler::{Scheduler, SchedulerConfig};
