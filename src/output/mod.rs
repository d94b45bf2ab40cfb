//! Output module for persisting and summarizing scrape results
//!
//! This module handles:
//! - Writing result records as CSV
//! - Recording run statistics

mod csv_output;
pub mod stats;
mod traits;

pub use csv_output::{write_csv, CsvOutputHandler, CSV_HEADER};
pub use stats::{print_statistics, RunStatistics};
pub use traits::{OutputError, OutputHandler, OutputResult};

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// Builds the default result path inside `directory`
///
/// The file name carries the run timestamp, e.g.
/// `email_results_20240131_142501.csv`.
pub fn timestamped_output_path(directory: &Path, now: DateTime<Local>) -> PathBuf {
    directory.join(format!(
        "email_results_{}.csv",
        now.format("%Y%m%d_%H%M%S")
    ))
}
