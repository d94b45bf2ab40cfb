use crate::config::types::{Config, OutputConfig, ScraperConfig, UserAgentConfig};
use crate::{ConfigError, ConfigResult};

const MAX_CONCURRENCY_LIMIT: u32 = 1000;
const MAX_RETRIES: u32 = 10;
const MAX_SECONDS: f64 = 86_400.0;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_scraper_config(&config.scraper)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates pipeline configuration
pub fn validate_scraper_config(config: &ScraperConfig) -> ConfigResult<()> {
    if config.concurrency_limit < 1 || config.concurrency_limit > MAX_CONCURRENCY_LIMIT {
        return Err(ConfigError::Validation(format!(
            "concurrency_limit must be between 1 and {}, got {}",
            MAX_CONCURRENCY_LIMIT, config.concurrency_limit
        )));
    }

    validate_seconds("inter_dispatch_delay", config.inter_dispatch_delay)?;
    validate_seconds("retry_delay", config.retry_delay)?;
    validate_seconds("per_request_timeout", config.per_request_timeout)?;

    if config.per_request_timeout == 0.0 {
        return Err(ConfigError::Validation(
            "per_request_timeout must be greater than 0".to_string(),
        ));
    }

    if config.max_retries > MAX_RETRIES {
        return Err(ConfigError::Validation(format!(
            "max_retries must be <= {}, got {}",
            MAX_RETRIES, config.max_retries
        )));
    }

    Ok(())
}

/// A duration in seconds must lie in `0..=MAX_SECONDS`
fn validate_seconds(name: &str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=MAX_SECONDS).contains(&value) {
        return Err(ConfigError::Validation(format!(
            "{} must be between 0 and {} seconds, got {}",
            name, MAX_SECONDS, value
        )));
    }
    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.value.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user agent cannot be empty".to_string(),
        ));
    }

    // Header values cannot carry control characters
    if config.value.chars().any(|c| c.is_control()) {
        return Err(ConfigError::Validation(
            "user agent cannot contain control characters".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_concurrency_bounds() {
        let mut config = ScraperConfig::default();

        config.concurrency_limit = 0;
        assert!(validate_scraper_config(&config).is_err());

        config.concurrency_limit = 1;
        assert!(validate_scraper_config(&config).is_ok());

        config.concurrency_limit = MAX_CONCURRENCY_LIMIT + 1;
        assert!(validate_scraper_config(&config).is_err());
    }

    #[test]
    fn test_zero_delay_allowed() {
        let config = ScraperConfig {
            inter_dispatch_delay: 0.0,
            ..ScraperConfig::default()
        };
        assert!(validate_scraper_config(&config).is_ok());
    }

    #[test]
    fn test_negative_or_nan_delay_rejected() {
        let mut config = ScraperConfig::default();

        config.inter_dispatch_delay = -0.5;
        assert!(validate_scraper_config(&config).is_err());

        config.inter_dispatch_delay = f64::NAN;
        assert!(validate_scraper_config(&config).is_err());

        config.inter_dispatch_delay = f64::INFINITY;
        assert!(validate_scraper_config(&config).is_err());

        config.inter_dispatch_delay = MAX_SECONDS + 1.0;
        assert!(validate_scraper_config(&config).is_err());
    }

    #[test]
    fn test_timeout_must_be_positive() {
        let mut config = ScraperConfig::default();

        config.per_request_timeout = 0.0;
        assert!(validate_scraper_config(&config).is_err());

        config.per_request_timeout = 0.01;
        assert!(validate_scraper_config(&config).is_ok());
    }

    #[test]
    fn test_retry_limit() {
        let config = ScraperConfig {
            max_retries: MAX_RETRIES + 1,
            ..ScraperConfig::default()
        };
        assert!(validate_scraper_config(&config).is_err());
    }

    #[test]
    fn test_user_agent_validation() {
        let mut ua = UserAgentConfig::default();
        assert!(validate_user_agent_config(&ua).is_ok());

        ua.value = "   ".to_string();
        assert!(validate_user_agent_config(&ua).is_err());

        ua.value = "Bot\n1.0".to_string();
        assert!(validate_user_agent_config(&ua).is_err());
    }

    #[test]
    fn test_output_directory_required() {
        let output = OutputConfig {
            directory: String::new(),
        };
        assert!(validate_output_config(&output).is_err());
    }
}
