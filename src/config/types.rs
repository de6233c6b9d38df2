use serde::Deserialize;

/// Main configuration structure for kuchikomi
///
/// Every section and field has a default so a config file is optional;
/// command-line flags override whatever the file provides.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Extraction engine behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperConfig {
    /// Fixed wait between page fetches, in seconds
    #[serde(rename = "delay-seconds", default = "default_delay_seconds")]
    pub delay_seconds: u64,

    /// Origin the first-page template is anchored to
    #[serde(default = "default_origin")]
    pub origin: String,
}

/// HTTP client header configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Browser-style User-Agent sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Accept-Language header value
    #[serde(rename = "accept-language", default = "default_accept_language")]
    pub accept_language: String,
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Path of the CSV export; a timestamped name is generated when unset
    #[serde(rename = "csv-path", default)]
    pub csv_path: Option<String>,
}

fn default_delay_seconds() -> u64 {
    2
}

fn default_origin() -> String {
    "https://www.amazon.com".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/120.0.0.0 Safari/537.36"
        .to_string()
}

fn default_accept_language() -> String {
    "en-US,en;q=0.9".to_string()
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            delay_seconds: default_delay_seconds(),
            origin: default_origin(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
        }
    }
}
