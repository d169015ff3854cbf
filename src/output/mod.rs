//! Output module for crawl results
//!
//! This module handles:
//! - Merging per-date outcomes into one deduplicated word set
//! - Writing the word set as JSON
//! - Summarising the run as statistics

mod aggregator;
pub mod json;
pub mod stats;

pub use aggregator::{AggregateResult, ResultAggregator};
pub use json::{to_json, write_words};
pub use stats::{print_statistics, CrawlStatistics};
