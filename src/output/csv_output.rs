//! CSV sink implementation
//!
//! Serializes the result set with serde through the csv crate. Absent
//! fields become empty cells; the header row is always written, so a
//! zero-review file is still a well-formed table.

use crate::output::traits::{OutputResult, ReviewSink};
use crate::review::Review;
use std::path::{Path, PathBuf};

/// Writes the result set to a CSV file
#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    /// Creates a sink targeting the given path
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Returns the target path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReviewSink for CsvSink {
    fn write_reviews(&mut self, reviews: &[Review]) -> OutputResult<()> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&self.path)?;

        // Written by hand so a zero-review export still carries the header
        writer.write_record(["title", "rating", "author", "date", "body"])?;

        for review in reviews {
            writer.serialize(review)?;
        }

        writer.flush()?;
        tracing::info!(path = %self.path.display(), rows = reviews.len(), "CSV export written");
        Ok(())
    }
}
