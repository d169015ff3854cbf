use crate::crawler::{FailureReason, FetchOutcome};
use crate::output::stats::CrawlStatistics;
use std::collections::HashSet;
use std::time::Instant;

/// Final product of a crawl run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateResult {
    /// Every distinct word seen in a successful outcome
    pub words: HashSet<String>,

    /// Number of dates that did not produce a successful outcome
    pub failed: usize,
}

/// Fan-in point for task outcomes
///
/// Owns the word set and counters. All mutation goes through `&mut self`, so
/// whoever drives the aggregator is its only writer; workers hand outcomes
/// over and never touch the set.
#[derive(Debug)]
pub struct ResultAggregator {
    words: HashSet<String>,
    expected: usize,
    completed: usize,
    succeeded: usize,
    tokens_seen: usize,
    not_found: usize,
    unparseable: usize,
    transient_failures: usize,
    reported_decile: usize,
    started: Instant,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self {
            words: HashSet::new(),
            expected: 0,
            completed: 0,
            succeeded: 0,
            tokens_seen: 0,
            not_found: 0,
            unparseable: 0,
            transient_failures: 0,
            reported_decile: 0,
            started: Instant::now(),
        }
    }

    /// Announces `count` more outcomes; only used for progress reporting
    pub fn expect(&mut self, count: usize) {
        self.expected += count;
    }

    /// Merges one outcome
    pub fn record(&mut self, outcome: FetchOutcome) {
        self.completed += 1;

        match outcome.failure_reason() {
            None => {
                if let FetchOutcome::Success { date, tokens } = outcome {
                    tracing::debug!("{}: {} words", date, tokens.len());
                    self.succeeded += 1;
                    self.tokens_seen += tokens.len();
                    self.words.extend(tokens);
                }
            }
            Some(reason) => {
                tracing::warn!("{}", outcome);
                self.count_failure(reason);
            }
        }

        self.report_progress();
    }

    /// Records a task that vanished without an outcome
    pub fn record_lost(&mut self, cause: String) {
        self.completed += 1;
        tracing::warn!("crawl task lost: {}", cause);
        self.count_failure(FailureReason::TransientFailure);
        self.report_progress();
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn unique_words(&self) -> usize {
        self.words.len()
    }

    /// Non-success outcomes recorded so far
    pub fn failed(&self) -> usize {
        self.completed - self.succeeded
    }

    pub fn statistics(&self) -> CrawlStatistics {
        CrawlStatistics {
            dates_total: self.expected.max(self.completed),
            dates_completed: self.completed,
            dates_succeeded: self.succeeded,
            not_found: self.not_found,
            unparseable: self.unparseable,
            transient_failures: self.transient_failures,
            tokens_seen: self.tokens_seen,
            unique_words: self.words.len(),
            elapsed: self.started.elapsed(),
        }
    }

    pub fn finish(self) -> AggregateResult {
        let failed = self.failed();
        AggregateResult {
            words: self.words,
            failed,
        }
    }

    fn count_failure(&mut self, reason: FailureReason) {
        match reason {
            FailureReason::PageNotFound => self.not_found += 1,
            FailureReason::ContentRegionMissing => self.unparseable += 1,
            FailureReason::TransientFailure => self.transient_failures += 1,
        }
    }

    /// Logs at every 10% of expected completions
    fn report_progress(&mut self) {
        if self.expected == 0 {
            return;
        }
        let decile = (self.completed * 10 / self.expected).min(10);
        if decile > self.reported_decile {
            self.reported_decile = decile;
            tracing::info!(
                "Progress: {}/{} dates crawled, {} unique words",
                self.completed,
                self.expected,
                self.words.len()
            );
        }
    }
}

impl Default for ResultAggregator {
    fn default() -> Self {
        Self::new()
    }
}
