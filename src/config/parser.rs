use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use kuchikomi::config::load_config;
///
/// let config = load_config(Path::new("config.toml")).unwrap();
/// println!("Inter-page delay: {}s", config.scraper.delay_seconds);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    // Read the configuration file
    let content = std::fs::read_to_string(path)?;

    // Parse TOML
    let config: Config = toml::from_str(&content)?;

    // Validate the configuration
    validate(&config)?;

    Ok(config)
}

/// Returns the built-in default configuration, validated
///
/// Used when the caller supplies no config file.
pub fn default_config() -> Result<Config, ConfigError> {
    let config = Config::default();
    validate(&config)?;
    Ok(config)
}
