//! Paraulogic crawler: harvests daily solution words from a dated archive
//!
//! This crate walks an inclusive range of calendar dates, fetches the solutions
//! page published for each date, extracts the listed words from the page's
//! content region and merges everything into one deduplicated word set.

pub mod config;
pub mod crawler;
pub mod dates;
pub mod output;
pub mod url;

use chrono::NaiveDate;
use thiserror::Error;

/// Main error type for crawler operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("Extractor error: {0}")]
    Extract(#[from] ExtractError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
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

    #[error("start-date ({start}) cannot be after end-date ({end})")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL template errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("URL template is missing the {{date}} placeholder: {0}")]
    MissingPlaceholder(String),

    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),
}

/// Errors raised while building a content extractor
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Invalid content selector: {0}")]
    InvalidSelector(String),

    #[error("Invalid token pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Result type alias for crawler operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_crawl, CrawlReport, CrawlTask, FetchOutcome};
pub use dates::DateRange;
pub use output::{AggregateResult, ResultAggregator};
