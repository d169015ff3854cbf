//! Crawl run statistics
//!
//! Counters are collected by the [`ResultAggregator`](crate::output::ResultAggregator)
//! while outcomes arrive and printed once the run is over.

use crate::crawler::FailureReason;
use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Dates scheduled for the run
    pub dates_total: usize,

    /// Dates whose outcome has been recorded
    pub dates_completed: usize,

    /// Dates whose page was fetched and parsed
    pub dates_succeeded: usize,

    pub not_found: usize,
    pub unparseable: usize,
    pub transient_failures: usize,

    /// Words extracted across all pages, duplicates included
    pub tokens_seen: usize,

    /// Distinct words in the aggregate set
    pub unique_words: usize,

    /// Wall time since the aggregator was created
    pub elapsed: Duration,
}

impl CrawlStatistics {
    /// Dates that produced no words
    pub fn failed(&self) -> usize {
        self.not_found + self.unparseable + self.transient_failures
    }

    pub fn count(&self, reason: FailureReason) -> usize {
        match reason {
            FailureReason::PageNotFound => self.not_found,
            FailureReason::ContentRegionMissing => self.unparseable,
            FailureReason::TransientFailure => self.transient_failures,
        }
    }

    /// Percentage of completed dates that succeeded
    pub fn success_rate(&self) -> f64 {
        if self.dates_completed > 0 {
            (self.dates_succeeded as f64 / self.dates_completed as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Dates crawled: {} / {}", stats.dates_completed, stats.dates_total);
    println!("  Words seen: {}", stats.tokens_seen);
    println!("  Unique words: {}", stats.unique_words);
    println!("  Elapsed: {:.1}s", stats.elapsed.as_secs_f64());
    println!();

    if stats.failed() > 0 {
        println!("Failures:");
        let mut failures: Vec<_> = [
            FailureReason::PageNotFound,
            FailureReason::ContentRegionMissing,
            FailureReason::TransientFailure,
        ]
        .into_iter()
        .map(|reason| (reason, stats.count(reason)))
        .filter(|(_, count)| *count > 0)
        .collect();
        failures.sort_by(|a, b| b.1.cmp(&a.1));

        for (reason, count) in failures {
            println!("  {}: {}", reason.label(), count);
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} dates with solutions)",
        stats.success_rate(),
        stats.dates_succeeded,
        stats.dates_completed
    );
}
