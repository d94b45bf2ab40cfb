//! Output handler traits and types
//!
//! This module defines the trait interface for result sinks.

use crate::pipeline::ResultRecord;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for output handlers
///
/// A handler receives records in input order and persists them in its own
/// format. The handler owns its destination until `finalize` is called.
pub trait OutputHandler {
    /// Records one result row
    ///
    /// # Arguments
    ///
    /// * `record` - The record to write
    fn record(&mut self, record: &ResultRecord) -> OutputResult<()>;

    /// Records every row of a run, in order
    fn record_all(&mut self, records: &[ResultRecord]) -> OutputResult<()> {
        for record in records {
            self.record(record)?;
        }
        Ok(())
    }

    /// Finalizes the output, flushing any buffered data
    fn finalize(&mut self) -> OutputResult<()>;
}
