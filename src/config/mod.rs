//! Configuration module for the crawler
//!
//! Every setting has a built-in default, so a configuration file is optional.
//! When one is given it is read as TOML, merged over the defaults and validated.
//!
//! # Example
//!
//! ```no_run
//! use paraulogic_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! println!("Fetching with {} workers", config.crawler.max_concurrent_fetches);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    default_concurrency, Config, CrawlerConfig, OutputConfig, RetryConfig, UserAgentConfig,
    DEFAULT_CONTENT_SELECTOR, DEFAULT_DATE_FORMAT, DEFAULT_URL_TEMPLATE,
};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default, parse_config};
pub use validation::{validate, validate_date_range};
