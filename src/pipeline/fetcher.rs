//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the pipeline, including:
//! - Building the shared HTTP client with the configured user agent
//! - GET requests with a per-request timeout
//! - Error classification into [`FailureReason`]
//!
//! The fetcher never retries and never returns `Err`: every failure mode is
//! reported as a [`FetchOutcome::Failed`] value.

use crate::config::UserAgentConfig;
use crate::url::parse_target;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// Why a single URL could not be fetched
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum FailureReason {
    #[error("request timed out")]
    Timeout,

    #[error("connection error: {0}")]
    ConnectionError(String),

    #[error("HTTP {0}")]
    HttpStatus(u16),

    #[error("malformed URL: {0}")]
    MalformedUrl(String),

    #[error("{0}")]
    Other(String),
}

impl FailureReason {
    /// Short stable label used to group failures in run summaries
    pub fn category(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::ConnectionError(_) => "connection",
            Self::HttpStatus(_) => "http_status",
            Self::MalformedUrl(_) => "malformed_url",
            Self::Other(_) => "other",
        }
    }

    /// Returns true if another attempt could plausibly succeed
    ///
    /// | Condition | Retryable |
    /// |-----------|-----------|
    /// | Timeout | yes |
    /// | Connection error | yes |
    /// | HTTP 429 | yes |
    /// | HTTP 5xx | yes |
    /// | Other HTTP status | no |
    /// | Malformed URL | no |
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout | Self::ConnectionError(_) => true,
            Self::HttpStatus(code) => *code == 429 || (500..600).contains(code),
            Self::MalformedUrl(_) | Self::Other(_) => false,
        }
    }
}

/// Result of a fetch operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The server answered 200 and the whole body was read
    Fetched {
        /// Raw response body
        body: Vec<u8>,
        /// HTTP status code
        status: u16,
    },

    /// The request failed; see [`FailureReason`]
    Failed {
        /// Classified cause of the failure
        reason: FailureReason,
    },
}

impl FetchOutcome {
    fn failed(reason: FailureReason) -> Self {
        Self::Failed { reason }
    }
}

/// Builds the HTTP client shared by every job of a run
///
/// The user agent is set once here so every request carries the same
/// identifying header. Timeouts are applied per request by [`fetch`].
///
/// # Example
///
/// ```no_run
/// use email_scraper::config::UserAgentConfig;
/// use email_scraper::pipeline::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.value.as_str())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL with a GET request
///
/// # Response Handling
///
/// | Condition | Outcome |
/// |-----------|---------|
/// | HTTP 200, body read | `Fetched` |
/// | Any other HTTP status | `Failed(HttpStatus(code))` |
/// | Timeout (connect, send or body read) | `Failed(Timeout)` |
/// | Connection refused, DNS or TLS failure | `Failed(ConnectionError)` |
/// | Unparseable or non-HTTP URL | `Failed(MalformedUrl)` |
/// | Anything else | `Failed(Other)` |
///
/// # Arguments
///
/// * `client` - The shared HTTP client
/// * `url` - The URL to fetch
/// * `timeout` - Upper bound for the whole request, body included
pub async fn fetch(client: &Client, url: &str, timeout: Duration) -> FetchOutcome {
    let target = match parse_target(url) {
        Ok(target) => target,
        Err(e) => return FetchOutcome::failed(FailureReason::MalformedUrl(e.to_string())),
    };

    let response = match client.get(target).timeout(timeout).send().await {
        Ok(response) => response,
        Err(e) => return FetchOutcome::failed(classify_error(&e)),
    };

    let status = response.status();
    if status != StatusCode::OK {
        return FetchOutcome::failed(FailureReason::HttpStatus(status.as_u16()));
    }

    match response.bytes().await {
        Ok(body) => FetchOutcome::Fetched {
            body: body.to_vec(),
            status: status.as_u16(),
        },
        Err(e) => FetchOutcome::failed(classify_error(&e)),
    }
}

/// Maps a reqwest error onto the failure taxonomy
fn classify_error(error: &reqwest::Error) -> FailureReason {
    if error.is_timeout() {
        FailureReason::Timeout
    } else if error.is_connect() {
        FailureReason::ConnectionError(error.to_string())
    } else if error.is_redirect() {
        FailureReason::Other(format!("redirect error: {}", error))
    } else {
        FailureReason::Other(error.to_string())
    }
}
