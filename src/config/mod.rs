//! Configuration module for kuchikomi
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. Every option has a built-in default, so configuration is optional
//! and command-line flags always win over file values.
//!
//! # Example
//!
//! ```no_run
//! use kuchikomi::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Inter-page delay: {}s", config.scraper.delay_seconds);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{ClientConfig, Config, OutputConfig, ScraperConfig};

// Re-export parser functions
pub use parser::{default_config, load_config};
