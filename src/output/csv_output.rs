//! CSV output handler
//!
//! Writes records with the header `url,business,emails,domain`. Multiple
//! addresses stay in a single quoted `emails` cell.

use crate::output::traits::{OutputHandler, OutputResult};
use crate::pipeline::ResultRecord;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Column names, in order
pub const CSV_HEADER: [&str; 4] = ["url", "business", "emails", "domain"];

/// Output handler writing CSV rows to any writer
pub struct CsvOutputHandler<W: Write> {
    writer: csv::Writer<W>,
}

impl CsvOutputHandler<File> {
    /// Creates (or truncates) a CSV file at `path`
    pub fn create(path: &Path) -> OutputResult<Self> {
        let file = File::create(path)?;
        Self::new(file)
    }
}

impl<W: Write> CsvOutputHandler<W> {
    /// Wraps a writer and emits the header row
    ///
    /// The header is written up front so a run with no rows still produces a
    /// well-formed file.
    pub fn new(inner: W) -> OutputResult<Self> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(inner);
        writer.write_record(CSV_HEADER)?;
        Ok(Self { writer })
    }

    /// Flushes and returns the underlying writer
    pub fn into_inner(self) -> OutputResult<W> {
        self.writer
            .into_inner()
            .map_err(|e| std::io::Error::new(e.error().kind(), e.error().to_string()).into())
    }
}

impl<W: Write> OutputHandler for CsvOutputHandler<W> {
    fn record(&mut self, record: &ResultRecord) -> OutputResult<()> {
        self.writer.serialize(record)?;
        Ok(())
    }

    fn finalize(&mut self) -> OutputResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Writes every record to a CSV file at `path`
pub fn write_csv(path: &Path, records: &[ResultRecord]) -> OutputResult<()> {
    let mut handler = CsvOutputHandler::create(path)?;
    handler.record_all(records)?;
    handler.finalize()?;
    tracing::info!("Results saved to {}", path.display());
    Ok(())
}
