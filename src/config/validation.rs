use crate::config::types::{ClientConfig, Config, OutputConfig, ScraperConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scraper_config(&config.scraper)?;
    validate_client_config(&config.client)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates scraper configuration
fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    // Zero is allowed: tests and local mirrors run without pacing
    if config.delay_seconds > 3600 {
        return Err(ConfigError::Validation(format!(
            "delay-seconds must be at most 3600, got {}",
            config.delay_seconds
        )));
    }

    let origin = Url::parse(&config.origin)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid origin '{}': {}", config.origin, e)))?;

    if origin.scheme() != "http" && origin.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "origin must use http or https, got '{}'",
            config.origin
        )));
    }

    if origin.host_str().is_none() {
        return Err(ConfigError::Validation(format!(
            "origin must include a host, got '{}'",
            config.origin
        )));
    }

    Ok(())
}

/// Validates HTTP client configuration
fn validate_client_config(config: &ClientConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.accept_language.trim().is_empty() {
        return Err(ConfigError::Validation(
            "accept-language cannot be empty".to_string(),
        ));
    }

    // Header values must stay within the visible ASCII range
    for (name, value) in [
        ("user-agent", &config.user_agent),
        ("accept-language", &config.accept_language),
    ] {
        if value.chars().any(|c| c.is_control() || !c.is_ascii()) {
            return Err(ConfigError::Validation(format!(
                "{} contains characters not allowed in an HTTP header",
                name
            )));
        }
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if let Some(path) = &config.csv_path {
        if path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "csv-path cannot be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}
