//! Review record and run outcome types
//!
//! A [`Review`] is one extracted record. Every field is independently
//! optional: a field whose locator finds nothing on the page is simply
//! absent, and a review with all five fields absent is still a valid
//! record. A [`ScrapeReport`] is what an extraction run hands back to the
//! caller, whether the run finished cleanly or was cut short.

use crate::scraper::FetchError;
use serde::Serialize;

/// One extracted product review
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Review {
    /// Review headline
    pub title: Option<String>,

    /// Star rating, e.g. 5.0 from "5.0 out of 5 stars"
    pub rating: Option<f64>,

    /// Reviewer display name
    pub author: Option<String>,

    /// Review date, kept as the raw source-formatted string
    pub date: Option<String>,

    /// Review body text
    pub body: Option<String>,
}

impl Review {
    /// Returns true if every field is absent
    pub fn is_blank(&self) -> bool {
        self.title.is_none()
            && self.rating.is_none()
            && self.author.is_none()
            && self.date.is_none()
            && self.body.is_none()
    }
}

/// Why an extraction run stopped
///
/// Only `FetchFailed` represents a failure; the other reasons are normal
/// outcomes of walking a finite page sequence. Every reason comes paired
/// with whatever reviews were accumulated before the run stopped.
#[derive(Debug, Clone, PartialEq)]
pub enum TerminalReason {
    /// The pagination control yielded no further page
    PaginationExhausted,

    /// A fetched page contained zero review containers
    NoReviewsOnPage,

    /// A fetch failed; not retried
    FetchFailed(FetchError),

    /// The caller cancelled the run during an inter-page wait
    Cancelled,
}

impl TerminalReason {
    /// Returns true if the run ended on a fetch failure
    pub fn is_failure(&self) -> bool {
        matches!(self, TerminalReason::FetchFailed(_))
    }
}

impl std::fmt::Display for TerminalReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminalReason::PaginationExhausted => write!(f, "no more pages"),
            TerminalReason::NoReviewsOnPage => write!(f, "no reviews on page"),
            TerminalReason::FetchFailed(err) => write!(f, "fetch failed: {}", err),
            TerminalReason::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// The result of one extraction run
///
/// Returned unconditionally: a run that fails on the first fetch still
/// produces a report with an empty review list and the failure reason.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeReport {
    /// Accumulated reviews, in page order then intra-page order
    pub reviews: Vec<Review>,

    /// Number of pages successfully fetched
    pub pages_fetched: u32,

    /// Why the run stopped
    pub reason: TerminalReason,
}

impl ScrapeReport {
    /// Returns the total number of accumulated reviews
    pub fn review_count(&self) -> usize {
        self.reviews.len()
    }
}
