//! Output handler trait and error types
//!
//! The engine hands its final result set to a sink; the sink owns the file
//! format, the engine knows nothing about it.

use crate::review::Review;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for result-set sinks
///
/// A sink serializes the final ordered result set to a tabular file. It
/// receives the reviews exactly once, after the run has terminated.
pub trait ReviewSink {
    /// Writes the full result set
    ///
    /// # Arguments
    ///
    /// * `reviews` - The accumulated reviews, in page-then-container order
    fn write_reviews(&mut self, reviews: &[Review]) -> OutputResult<()>;
}
