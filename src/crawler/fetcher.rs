//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the shared HTTP client
//! - Applying the retry policy across attempts
//! - Classifying the final result of each page into a [`FetchOutcome`]

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::crawler::extractor::ContentExtractor;
use crate::crawler::retry::{
    parse_retry_after, AttemptOutcome, RetryDecision, RetryPolicy, TransportErrorKind,
};
use crate::crawler::task::CrawlTask;
use chrono::NaiveDate;
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, StatusCode};
use std::fmt;
use url::Url;

/// Final result of one crawl task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Page fetched and its content region found
    Success {
        date: NaiveDate,
        /// Primary words in document order (possibly empty)
        tokens: Vec<String>,
    },

    /// Permanent non-200 answer, 404 included
    NotFound {
        date: NaiveDate,
        url: Url,
        status: u16,
    },

    /// Page fetched but it has no content region
    Unparseable { date: NaiveDate, url: Url },

    /// Retries exhausted on a transient error, or the task crashed
    TransientFailure {
        date: NaiveDate,
        url: Url,
        /// Last status or error seen
        cause: String,
    },
}

/// Reason a task did not produce words
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureReason {
    PageNotFound,
    ContentRegionMissing,
    TransientFailure,
}

impl FailureReason {
    pub fn label(&self) -> &'static str {
        match self {
            Self::PageNotFound => "page not found",
            Self::ContentRegionMissing => "content region missing",
            Self::TransientFailure => "transient failure",
        }
    }
}

impl FetchOutcome {
    pub fn date(&self) -> NaiveDate {
        match self {
            Self::Success { date, .. }
            | Self::NotFound { date, .. }
            | Self::Unparseable { date, .. }
            | Self::TransientFailure { date, .. } => *date,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// `None` for [`FetchOutcome::Success`]
    pub fn failure_reason(&self) -> Option<FailureReason> {
        match self {
            Self::Success { .. } => None,
            Self::NotFound { .. } => Some(FailureReason::PageNotFound),
            Self::Unparseable { .. } => Some(FailureReason::ContentRegionMissing),
            Self::TransientFailure { .. } => Some(FailureReason::TransientFailure),
        }
    }

    /// Builds the outcome for a task whose execution crashed
    pub fn crashed(task: &CrawlTask, cause: impl Into<String>) -> Self {
        Self::TransientFailure {
            date: task.date,
            url: task.url.clone(),
            cause: cause.into(),
        }
    }
}

impl fmt::Display for FetchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success { date, tokens } => {
                write!(f, "{} solutions found for date {}", tokens.len(), date)
            }
            Self::NotFound { date, url, status } => write!(
                f,
                "solutions page not found {} (status: {} - {})",
                date, status, url
            ),
            Self::Unparseable { date, url } => {
                write!(f, "solutions not found for date {} ({})", date, url)
            }
            Self::TransientFailure { date, url, cause } => write!(
                f,
                "solutions page unavailable {} ({} - {})",
                date, cause, url
            ),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// The client owns a connection pool and is cloned cheaply into every worker.
///
/// # Example
///
/// ```no_run
/// use paraulogic_crawler::config::{CrawlerConfig, UserAgentConfig};
/// use paraulogic_crawler::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlerConfig::default(), &UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    crawler: &CrawlerConfig,
    user_agent: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(crawler.request_timeout())
        .connect_timeout(crawler.connect_timeout())
        .pool_max_idle_per_host(crawler.max_concurrent_fetches)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches solutions pages and turns them into [`FetchOutcome`]s
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    policy: RetryPolicy,
    extractor: ContentExtractor,
}

/// Body or final status of the last attempt
enum LastAttempt {
    Body(String),
    Status(u16),
    Failed(String),
}

impl PageFetcher {
    pub fn new(client: Client, policy: RetryPolicy, extractor: ContentExtractor) -> Self {
        Self {
            client,
            policy,
            extractor,
        }
    }

    /// Fetches the page for `task` and classifies the result
    ///
    /// Never fails: every path ends in a [`FetchOutcome`].
    pub async fn fetch(&self, task: &CrawlTask) -> FetchOutcome {
        match self.get_with_retry(&task.url).await {
            LastAttempt::Body(body) => match self.extractor.extract(&body) {
                Some(tokens) => FetchOutcome::Success {
                    date: task.date,
                    tokens,
                },
                None => FetchOutcome::Unparseable {
                    date: task.date,
                    url: task.url.clone(),
                },
            },
            LastAttempt::Status(status) if self.policy.is_retryable_status(status) => {
                FetchOutcome::TransientFailure {
                    date: task.date,
                    url: task.url.clone(),
                    cause: format!("HTTP {} after {} attempts", status, self.policy.max_attempts()),
                }
            }
            LastAttempt::Status(status) => FetchOutcome::NotFound {
                date: task.date,
                url: task.url.clone(),
                status,
            },
            LastAttempt::Failed(error) => FetchOutcome::TransientFailure {
                date: task.date,
                url: task.url.clone(),
                cause: error,
            },
        }
    }

    async fn get_with_retry(&self, url: &Url) -> LastAttempt {
        let mut attempt = 0;

        loop {
            attempt += 1;

            let (outcome, last) = match self.client.get(url.clone()).send().await {
                Ok(resp) => {
                    let status = resp.status();
                    if status == StatusCode::OK {
                        match resp.text().await {
                            Ok(body) => return LastAttempt::Body(body),
                            Err(e) => (
                                AttemptOutcome::Transport(TransportErrorKind::classify(&e)),
                                LastAttempt::Failed(format!("failed to read body: {}", e)),
                            ),
                        }
                    } else {
                        let retry_after = resp
                            .headers()
                            .get(RETRY_AFTER)
                            .and_then(|v| v.to_str().ok())
                            .and_then(parse_retry_after);
                        (
                            AttemptOutcome::Status {
                                code: status.as_u16(),
                                retry_after,
                            },
                            LastAttempt::Status(status.as_u16()),
                        )
                    }
                }
                Err(e) => (
                    AttemptOutcome::Transport(TransportErrorKind::classify(&e)),
                    LastAttempt::Failed(e.to_string()),
                ),
            };

            match self.policy.decide(attempt, &outcome) {
                RetryDecision::Retry(delay) => {
                    tracing::debug!(
                        "Attempt {}/{} for {} failed ({:?}), retrying in {:?}",
                        attempt,
                        self.policy.max_attempts(),
                        url,
                        outcome,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                RetryDecision::GiveUp => return last,
            }
        }
    }
}
