//! Scraper module - the paginated extraction core
//!
//! This module contains the extraction engine and its collaborators:
//! - Page fetching behind the [`PageFetcher`] boundary
//! - Review parsing with per-field fault tolerance
//! - Content-driven pagination resolution
//! - The orchestrating state machine with inter-page rate limiting

mod engine;
mod fetcher;
mod pagination;
mod parser;

pub use engine::Engine;
pub use fetcher::{build_http_client, FetchError, HttpFetcher, PageFetcher};
pub use pagination::next_page_url;
pub use parser::{parse_leading_rating, parse_reviews};

use crate::config::Config;
use crate::review::ScrapeReport;
use crate::ScrapeError;
use std::time::Duration;
use tokio::sync::watch;
use url::Url;

/// Runs a complete extraction over HTTP
///
/// Builds the HTTP fetcher from the configuration and walks the page
/// sequence starting at `start`. This is the main library entry point;
/// callers that need a custom transport construct an [`Engine`] directly.
///
/// # Arguments
///
/// * `config` - The scraper configuration
/// * `start` - The first-page address
/// * `cancel` - Optional cancellation channel; flipping it to `true` stops
///   the run at the next inter-page wait
///
/// # Returns
///
/// * `Ok(ScrapeReport)` - The accumulated reviews and terminal reason
/// * `Err(ScrapeError)` - The HTTP client could not be built
pub async fn scrape(
    config: &Config,
    start: Url,
    cancel: Option<watch::Receiver<bool>>,
) -> Result<ScrapeReport, ScrapeError> {
    let fetcher = HttpFetcher::new(&config.client)?;
    let delay = Duration::from_secs(config.scraper.delay_seconds);

    let mut engine = Engine::new(fetcher, delay);
    if let Some(cancel) = cancel {
        engine = engine.with_cancellation(cancel);
    }

    Ok(engine.run(start).await)
}
