//! Extraction engine - the main page-walk orchestration logic
//!
//! The engine drives fetch → parse → resolve-next repeatedly over a single
//! page sequence, accumulating reviews and enforcing the inter-page delay.
//! The walk is modeled as an explicit three-state machine rather than an
//! open-ended loop:
//!
//! - `Fetching`: a page is being retrieved
//! - `HasPage`: a page body is in hand, ready to parse and resolve
//! - `Terminated`: absorbing; the run returns its report
//!
//! Exactly one page is in flight at a time. The engine owns the accumulating
//! result set and hands it back unconditionally: a fetch failure or a
//! cancellation mid-run still yields every review gathered so far.

use crate::review::{Review, ScrapeReport, TerminalReason};
use crate::scraper::pagination::next_page_url;
use crate::scraper::parser::parse_reviews;
use crate::scraper::PageFetcher;
use std::time::Duration;
use tokio::sync::watch;
use url::Url;

/// The states of one extraction run
#[derive(Debug)]
enum RunState {
    /// Retrieving the page at this address
    Fetching(Url),

    /// A page body is in hand
    HasPage { url: Url, body: String },

    /// The run is over; absorbing
    Terminated(TerminalReason),
}

/// Sequential paginated extraction engine
///
/// Generic over the [`PageFetcher`] so the transport (HTTP client, browser
/// session, test fixtures) stays a pluggable collaborator.
pub struct Engine<F> {
    fetcher: F,
    delay: Duration,
    cancel: Option<watch::Receiver<bool>>,
}

impl<F: PageFetcher> Engine<F> {
    /// Creates an engine with the given fetcher and inter-page delay
    pub fn new(fetcher: F, delay: Duration) -> Self {
        Self {
            fetcher,
            delay,
            cancel: None,
        }
    }

    /// Attaches a cancellation channel
    ///
    /// When the channel value flips to `true`, the run stops at the next
    /// inter-page wait and returns what it has accumulated.
    pub fn with_cancellation(mut self, cancel: watch::Receiver<bool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Runs the extraction loop from a starting address
    ///
    /// Walks the page sequence until one of the terminal conditions is hit:
    ///
    /// - a fetch fails (fatal for the run, not retried)
    /// - a fetched page contains zero review containers (guards against
    ///   content-layout drift producing an infinite walk, even when a next
    ///   link is nominally present)
    /// - the pagination control yields no further page
    /// - the caller cancels during an inter-page wait
    ///
    /// Always returns a [`ScrapeReport`]; zero total reviews is a valid,
    /// reportable outcome, not an error.
    pub async fn run(&mut self, start: Url) -> ScrapeReport {
        let mut reviews: Vec<Review> = Vec::new();
        let mut pages_fetched: u32 = 0;
        let mut page_number: u32 = 1;
        let mut state = RunState::Fetching(start);

        let reason = loop {
            state = match state {
                RunState::Fetching(url) => {
                    tracing::debug!(page = page_number, url = %url, "fetching page");
                    match self.fetcher.fetch(&url).await {
                        Ok(body) => {
                            pages_fetched += 1;
                            RunState::HasPage { url, body }
                        }
                        Err(err) => {
                            tracing::error!(page = page_number, error = %err, "fetch failed, stopping run");
                            RunState::Terminated(TerminalReason::FetchFailed(err))
                        }
                    }
                }

                RunState::HasPage { url, body } => {
                    let page_reviews = parse_reviews(&body);
                    if page_reviews.is_empty() {
                        tracing::info!(page = page_number, "no reviews found on page, stopping");
                        RunState::Terminated(TerminalReason::NoReviewsOnPage)
                    } else {
                        reviews.extend(page_reviews);
                        tracing::info!(
                            page = page_number,
                            total_reviews = reviews.len(),
                            "page scraped"
                        );

                        match next_page_url(&body, &url) {
                            Some(next) => {
                                page_number += 1;
                                if self.wait_between_pages().await {
                                    tracing::info!("run cancelled during inter-page wait");
                                    RunState::Terminated(TerminalReason::Cancelled)
                                } else {
                                    RunState::Fetching(next)
                                }
                            }
                            None => {
                                tracing::info!(page = page_number, "no more pages found");
                                RunState::Terminated(TerminalReason::PaginationExhausted)
                            }
                        }
                    }
                }

                RunState::Terminated(reason) => break reason,
            };
        };

        tracing::info!(
            total_reviews = reviews.len(),
            pages_fetched,
            reason = %reason,
            "run finished"
        );

        ScrapeReport {
            reviews,
            pages_fetched,
            reason,
        }
    }

    /// Observes the inter-page delay
    ///
    /// Returns true if the run was cancelled before the delay elapsed. The
    /// wait is interruptible: a cancellation signal ends it immediately
    /// instead of sleeping out the remainder.
    async fn wait_between_pages(&mut self) -> bool {
        let deadline = tokio::time::Instant::now() + self.delay;

        let Some(cancel) = self.cancel.as_mut() else {
            tokio::time::sleep_until(deadline).await;
            return false;
        };

        if *cancel.borrow() {
            return true;
        }

        loop {
            tokio::select! {
                _ = tokio::time::sleep_until(deadline) => return false,
                changed = cancel.changed() => match changed {
                    Ok(()) if *cancel.borrow() => return true,
                    Ok(()) => continue,
                    // Sender gone; nobody can cancel anymore, finish the wait
                    Err(_) => {
                        tokio::time::sleep_until(deadline).await;
                        return false;
                    }
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scraper::FetchError;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// Fetcher that serves canned bodies keyed by address and records the
    /// order of every fetch it performs
    #[derive(Clone)]
    struct ScriptedFetcher {
        pages: HashMap<String, Result<String, FetchError>>,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl ScriptedFetcher {
        fn new(pages: Vec<(&str, Result<String, FetchError>)>) -> Self {
            Self {
                pages: pages
                    .into_iter()
                    .map(|(url, body)| (url.to_string(), body))
                    .collect(),
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn call_log(&self) -> Arc<Mutex<Vec<String>>> {
            Arc::clone(&self.calls)
        }
    }

    impl PageFetcher for ScriptedFetcher {
        async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
            self.calls.lock().unwrap().push(url.to_string());
            self.pages
                .get(url.as_str())
                .cloned()
                .unwrap_or(Err(FetchError::Status { status: 404 }))
        }
    }

    fn review_div(title: &str) -> String {
        format!(
            r#"<div data-hook="review">
                <a data-hook="review-title">{}</a>
                <i data-hook="review-star-rating"><span>4.0 out of 5 stars</span></i>
            </div>"#,
            title
        )
    }

    /// Builds a page body with `count` reviews and an optional next link
    fn page_html(prefix: &str, count: usize, next_href: Option<&str>) -> String {
        let reviews: String = (1..=count)
            .map(|i| review_div(&format!("{} review {}", prefix, i)))
            .collect();
        let pagination = match next_href {
            Some(href) => format!(r#"<ul><li class="a-last"><a href="{}">Next</a></li></ul>"#, href),
            None => r#"<ul><li class="a-last"><span class="a-disabled">Next</span></li></ul>"#
                .to_string(),
        };
        format!("<html><body>{}{}</body></html>", reviews, pagination)
    }

    fn start_url() -> Url {
        Url::parse("https://site.test/product-reviews/B0C2CKT9VR/?pageNumber=1").unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_page_walk() {
        let fetcher = ScriptedFetcher::new(vec![
            (
                "https://site.test/product-reviews/B0C2CKT9VR/?pageNumber=1",
                Ok(page_html("page1", 10, Some("/product-reviews/B0C2CKT9VR/?pageNumber=2"))),
            ),
            (
                "https://site.test/product-reviews/B0C2CKT9VR/?pageNumber=2",
                Ok(page_html("page2", 3, None)),
            ),
        ]);
        let calls = fetcher.call_log();
        let delay = Duration::from_secs(2);
        let mut engine = Engine::new(fetcher, delay);

        let started = tokio::time::Instant::now();
        let report = engine.run(start_url()).await;

        assert_eq!(report.reviews.len(), 13);
        assert_eq!(report.pages_fetched, 2);
        assert_eq!(report.reason, TerminalReason::PaginationExhausted);

        // Page order, then intra-page order
        assert_eq!(report.reviews[0].title.as_deref(), Some("page1 review 1"));
        assert_eq!(report.reviews[9].title.as_deref(), Some("page1 review 10"));
        assert_eq!(report.reviews[10].title.as_deref(), Some("page2 review 1"));
        assert_eq!(report.reviews[12].title.as_deref(), Some("page2 review 3"));

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert!(calls[1].ends_with("pageNumber=2"));

        // Exactly one inter-page delay observed
        assert_eq!(started.elapsed(), delay);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_failure_on_first_page() {
        let fetcher = ScriptedFetcher::new(vec![(
            "https://site.test/product-reviews/B0C2CKT9VR/?pageNumber=1",
            Err(FetchError::Status { status: 503 }),
        )]);
        let mut engine = Engine::new(fetcher, Duration::from_secs(2));

        let started = tokio::time::Instant::now();
        let report = engine.run(start_url()).await;

        assert!(report.reviews.is_empty());
        assert_eq!(report.pages_fetched, 0);
        assert_eq!(
            report.reason,
            TerminalReason::FetchFailed(FetchError::Status { status: 503 })
        );

        // Zero delays observed
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_failure_mid_run_returns_partial_results() {
        let fetcher = ScriptedFetcher::new(vec![
            (
                "https://site.test/product-reviews/B0C2CKT9VR/?pageNumber=1",
                Ok(page_html("page1", 5, Some("/product-reviews/B0C2CKT9VR/?pageNumber=2"))),
            ),
            (
                "https://site.test/product-reviews/B0C2CKT9VR/?pageNumber=2",
                Err(FetchError::Transport {
                    message: "Connection refused".to_string(),
                }),
            ),
        ]);
        let mut engine = Engine::new(fetcher, Duration::from_secs(2));

        let report = engine.run(start_url()).await;

        assert_eq!(report.reviews.len(), 5);
        assert_eq!(report.pages_fetched, 1);
        assert!(report.reason.is_failure());
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_reviews_terminates_even_with_next_link() {
        let fetcher = ScriptedFetcher::new(vec![
            (
                "https://site.test/product-reviews/B0C2CKT9VR/?pageNumber=1",
                Ok(page_html("page1", 0, Some("/product-reviews/B0C2CKT9VR/?pageNumber=2"))),
            ),
            (
                "https://site.test/product-reviews/B0C2CKT9VR/?pageNumber=2",
                Ok(page_html("page2", 3, None)),
            ),
        ]);
        let calls = fetcher.call_log();
        let mut engine = Engine::new(fetcher, Duration::from_secs(2));

        let report = engine.run(start_url()).await;

        assert!(report.reviews.is_empty());
        assert_eq!(report.reason, TerminalReason::NoReviewsOnPage);

        // The next link must not be followed
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_stops_between_pages() {
        let fetcher = ScriptedFetcher::new(vec![
            (
                "https://site.test/product-reviews/B0C2CKT9VR/?pageNumber=1",
                Ok(page_html("page1", 10, Some("/product-reviews/B0C2CKT9VR/?pageNumber=2"))),
            ),
            (
                "https://site.test/product-reviews/B0C2CKT9VR/?pageNumber=2",
                Ok(page_html("page2", 3, None)),
            ),
        ]);
        let calls = fetcher.call_log();
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let mut engine = Engine::new(fetcher, Duration::from_secs(60)).with_cancellation(cancel_rx);

        let handle = tokio::spawn(async move { engine.run(start_url()).await });
        cancel_tx.send(true).expect("receiver alive");
        let report = handle.await.expect("run task panicked");

        // Page 1 results are kept, page 2 is never fetched
        assert_eq!(report.reviews.len(), 10);
        assert_eq!(report.pages_fetched, 1);
        assert_eq!(report.reason, TerminalReason::Cancelled);
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rerun_is_idempotent() {
        let pages = vec![
            (
                "https://site.test/product-reviews/B0C2CKT9VR/?pageNumber=1",
                Ok(page_html("page1", 4, Some("/product-reviews/B0C2CKT9VR/?pageNumber=2"))),
            ),
            (
                "https://site.test/product-reviews/B0C2CKT9VR/?pageNumber=2",
                Ok(page_html("page2", 2, None)),
            ),
        ];
        let mut first_engine =
            Engine::new(ScriptedFetcher::new(pages.clone()), Duration::from_secs(1));
        let mut second_engine = Engine::new(ScriptedFetcher::new(pages), Duration::from_secs(1));

        let first = first_engine.run(start_url()).await;
        let second = second_engine.run(start_url()).await;

        assert_eq!(first, second);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_scales_with_page_count() {
        let fetcher = ScriptedFetcher::new(vec![
            (
                "https://site.test/product-reviews/B0C2CKT9VR/?pageNumber=1",
                Ok(page_html("p1", 1, Some("/product-reviews/B0C2CKT9VR/?pageNumber=2"))),
            ),
            (
                "https://site.test/product-reviews/B0C2CKT9VR/?pageNumber=2",
                Ok(page_html("p2", 1, Some("/product-reviews/B0C2CKT9VR/?pageNumber=3"))),
            ),
            (
                "https://site.test/product-reviews/B0C2CKT9VR/?pageNumber=3",
                Ok(page_html("p3", 1, None)),
            ),
        ]);
        let delay = Duration::from_secs(2);
        let mut engine = Engine::new(fetcher, delay);

        let started = tokio::time::Instant::now();
        let report = engine.run(start_url()).await;

        assert_eq!(report.pages_fetched, 3);
        // Two page transitions, two delays
        assert_eq!(started.elapsed(), delay * 2);
    }
}
