use serde::Deserialize;
use std::time::Duration;

/// User agent sent when none is configured
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Main configuration structure for Email-Scraper
///
/// Every section and key is optional; missing values fall back to the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Pipeline behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScraperConfig {
    /// Maximum number of pages fetched and processed at once
    #[serde(rename = "concurrency-limit", default = "default_concurrency_limit")]
    pub concurrency_limit: u32,

    /// Minimum spacing between two dispatches (seconds)
    #[serde(rename = "inter-dispatch-delay", default = "default_inter_dispatch_delay")]
    pub inter_dispatch_delay: f64,

    /// Timeout applied to each request (seconds)
    #[serde(rename = "per-request-timeout", default = "default_per_request_timeout")]
    pub per_request_timeout: f64,

    /// Extra attempts for retryable failures
    #[serde(rename = "max-retries", default)]
    pub max_retries: u32,

    /// Pause between attempts on the same URL (seconds)
    #[serde(rename = "retry-delay", default = "default_retry_delay")]
    pub retry_delay: f64,
}

impl ScraperConfig {
    /// Minimum spacing between dispatches as a `Duration`
    pub fn inter_dispatch_delay(&self) -> Duration {
        Duration::from_secs_f64(self.inter_dispatch_delay)
    }

    /// Per-request timeout as a `Duration`
    pub fn per_request_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.per_request_timeout)
    }

    /// Pause between retry attempts as a `Duration`
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs_f64(self.retry_delay)
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            concurrency_limit: default_concurrency_limit(),
            inter_dispatch_delay: default_inter_dispatch_delay(),
            per_request_timeout: default_per_request_timeout(),
            max_retries: 0,
            retry_delay: default_retry_delay(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserAgentConfig {
    /// Full User-Agent header value
    #[serde(default = "default_user_agent")]
    pub value: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            value: default_user_agent(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Directory receiving timestamped result files
    #[serde(default = "default_output_directory")]
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
        }
    }
}

fn default_concurrency_limit() -> u32 {
    10
}

fn default_inter_dispatch_delay() -> f64 {
    0.5
}

fn default_per_request_timeout() -> f64 {
    10.0
}

fn default_retry_delay() -> f64 {
    1.0
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_output_directory() -> String {
    ".".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_accessors() {
        let config = ScraperConfig {
            inter_dispatch_delay: 0.25,
            per_request_timeout: 10.0,
            retry_delay: 1.5,
            ..ScraperConfig::default()
        };

        assert_eq!(config.inter_dispatch_delay(), Duration::from_millis(250));
        assert_eq!(config.per_request_timeout(), Duration::from_secs(10));
        assert_eq!(config.retry_delay(), Duration::from_millis(1500));
    }

    #[test]
    fn test_zero_delay_is_zero_duration() {
        let config = ScraperConfig {
            inter_dispatch_delay: 0.0,
            ..ScraperConfig::default()
        };
        assert_eq!(config.inter_dispatch_delay(), Duration::ZERO);
    }
}
