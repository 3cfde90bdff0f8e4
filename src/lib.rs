//! Top-Reel: a ranked movie list harvester
//!
//! This crate fetches the paginated Douban Top 250 listing, extracts one
//! record per ranked entry, persists the dataset as CSV, downloads the poster
//! images, and reports how the movies are distributed over release years.

pub mod archive;
pub mod config;
pub mod crawler;
pub mod dataset;
pub mod output;
pub mod pipeline;

use thiserror::Error;

/// Main error type for Top-Reel operations
#[derive(Debug, Error)]
pub enum TopReelError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Unexpected HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Empty response body for {url}")]
    EmptyBody { url: String },

    #[error("Missing URL for {what}")]
    MissingUrl { what: String },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("HTML parse error for {url}: {message}")]
    HtmlParse { url: String, message: String },

    #[error("Dataset error: {0}")]
    Dataset(#[from] csv::Error),

    #[error("Chart rendering error: {0}")]
    Chart(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

// Re-export commonly used types
pub use config::Config;
pub use dataset::{Dataset, MovieRecord};
pub use pipeline::{run_pipeline, DatasetSource, PipelineSummary};
