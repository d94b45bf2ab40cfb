//! Input module for reading URL lists
//!
//! A URL list is plain text with one URL per line. Surrounding whitespace is
//! trimmed and blank lines are skipped; no other normalization happens, so
//! malformed entries reach the pipeline and come back as failure records.

use crate::InputError;
use std::path::Path;

/// Splits URL-list text into entries, preserving order and duplicates
///
/// # Example
///
/// ```
/// use email_scraper::input::parse_url_list;
///
/// let urls = parse_url_list("https://a.test/\n\n  https://b.test/  \r\n");
/// assert_eq!(urls, vec!["https://a.test/", "https://b.test/"]);
/// ```
pub fn parse_url_list(content: &str) -> Vec<String> {
    content
        .trim_start_matches('\u{feff}')
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reads a URL list file
///
/// # Returns
///
/// * `Ok(Vec<String>)` - At least one URL, in file order
/// * `Err(InputError)` - The file could not be read or holds no URLs
pub fn read_url_list(path: &Path) -> Result<Vec<String>, InputError> {
    let content = std::fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.display().to_string(),
        source,
    })?;

    let urls = parse_url_list(&content);
    if urls.is_empty() {
        return Err(InputError::Empty);
    }

    tracing::debug!("Read {} URLs from {}", urls.len(), path.display());
    Ok(urls)
}
