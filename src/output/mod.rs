//! Output module - the tabular export boundary
//!
//! The engine's result set is handed to a [`ReviewSink`] once the run
//! terminates; the sink owns serialization and the on-disk format.

mod csv_output;
mod traits;

pub use csv_output::CsvSink;
pub use traits::{OutputError, OutputResult, ReviewSink};

use chrono::Local;

/// Generates a timestamped default CSV filename
///
/// Used when neither the CLI nor the config file names an output path.
pub fn default_csv_filename() -> String {
    format!("reviews-{}.csv", Local::now().format("%Y%m%d-%H%M%S"))
}
