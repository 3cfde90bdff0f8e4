//! Configuration module for Top-Reel
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! A missing file is not an error for the binary: `Config::default()` carries the
//! settings used against the live listing.
//!
//! # Example
//!
//! ```no_run
//! use top_reel::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("top-reel.toml")).unwrap();
//! println!("Crawler will use {} workers", config.crawler.max_workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, RequestConfig, SourceConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
