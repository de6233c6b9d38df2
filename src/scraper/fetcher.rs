//! Page fetcher boundary and HTTP implementation
//!
//! The engine talks to the page source through the [`PageFetcher`] trait so
//! the transport can be swapped out (plain HTTP client, scripted fixtures in
//! tests, a browser-automation session). The production implementation is
//! [`HttpFetcher`], a thin wrapper over a configured [`reqwest::Client`].

use crate::config::ClientConfig;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// A failed page fetch
///
/// Any fetch failure is fatal for the current run: the engine does not
/// retry, it terminates and returns whatever was accumulated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The server answered with a non-success status code
    #[error("HTTP status {status}")]
    Status { status: u16 },

    /// The request failed below the HTTP layer
    #[error("Transport error: {message}")]
    Transport { message: String },
}

/// Boundary between the engine and the page source
///
/// `fetch` returns the raw page body for an address, or the failure that
/// prevented it. Implementations own their session lifecycle; the engine
/// never holds transport state of its own.
#[allow(async_fn_in_trait)]
pub trait PageFetcher {
    /// Fetches the content of one page
    async fn fetch(&self, url: &Url) -> Result<String, FetchError>;
}

/// Builds an HTTP client with browser-style request headers
///
/// Review listings are served to browsers, so the client identifies itself
/// with the configured browser User-Agent plus Accept-Language and Accept
/// headers to reduce the block rate.
///
/// # Arguments
///
/// * `config` - The client header configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &ClientConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&config.accept_language) {
        headers.insert(ACCEPT_LANGUAGE, value);
    }
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );

    Client::builder()
        .user_agent(config.user_agent.clone())
        .default_headers(headers)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// HTTP-backed [`PageFetcher`]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher from a client configuration
    pub fn new(config: &ClientConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    /// Creates a fetcher from an already-built client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(classify_request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| FetchError::Transport {
            message: e.to_string(),
        })
    }
}

/// Classifies a reqwest error into a transport failure message
fn classify_request_error(error: reqwest::Error) -> FetchError {
    let message = if error.is_timeout() {
        "Request timeout".to_string()
    } else if error.is_connect() {
        "Connection refused".to_string()
    } else {
        error.to_string()
    };
    FetchError::Transport { message }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> ClientConfig {
        ClientConfig {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64)".to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
        }
    }

    #[test]
    fn test_build_http_client() {
        let config = create_test_config();
        let client = build_http_client(&config);
        assert!(client.is_ok());
    }

    #[test]
    fn test_fetcher_from_config() {
        let config = create_test_config();
        assert!(HttpFetcher::new(&config).is_ok());
    }

    #[test]
    fn test_status_error_display() {
        let err = FetchError::Status { status: 503 };
        assert_eq!(err.to_string(), "HTTP status 503");
    }

    // HTTP behavior (status mapping, body handling) is covered by the
    // wiremock tests in tests/scrape_tests.rs
}
