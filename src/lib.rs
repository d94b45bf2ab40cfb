//! Email-Scraper: a polite bulk contact extractor
//!
//! This crate fetches a list of pages concurrently, pulls email addresses and a
//! business label out of each page, and returns exactly one record per input URL
//! in input order.

pub mod config;
pub mod input;
pub mod output;
pub mod pipeline;
pub mod url;

use thiserror::Error;

/// Main error type for run-level failures
///
/// Per-URL failures never surface here; they are carried inside
/// [`pipeline::ResultRecord`] instead.
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Errors raised while reading the URL list
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Failed to read URL list {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("No URLs found in input")]
    Empty,
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(#[from] ::url::ParseError),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Email-Scraper operations
pub type Result<T> = std::result::Result<T, ScraperError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use pipeline::{run_scrape, FailureReason, ResultRecord};
pub use self::url::{parse_target, resolve_domain};
