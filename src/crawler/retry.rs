//! Retry policy for page requests
//!
//! The policy separates "page temporarily unavailable" from "no page for this
//! date". Server errors and connection failures are retried with exponential
//! backoff; a 404 is a permanent answer and is never retried.
//!
//! | Condition | Action |
//! |-----------|--------|
//! | 2xx | Never retried |
//! | 404 (never-retry set) | GiveUp on the first attempt |
//! | 500, 502, 503, 504 | Retry until `max_attempts` total attempts |
//! | Other non-2xx | GiveUp immediately |
//! | Connect error / timeout | Retry until `max_attempts` total attempts |
//! | Other transport error | GiveUp immediately |

use crate::config::RetryConfig;
use std::collections::HashSet;
use std::time::Duration;

/// What happened on a single request attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The server answered
    Status {
        code: u16,
        /// Parsed `Retry-After` header, if any
        retry_after: Option<Duration>,
    },

    /// The request never produced a response
    Transport(TransportErrorKind),
}

impl AttemptOutcome {
    pub fn status(code: u16) -> Self {
        Self::Status {
            code,
            retry_after: None,
        }
    }
}

/// Coarse classification of transport-level failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Connection refused, reset, DNS failure
    Connect,
    /// Connect or read timed out
    Timeout,
    /// Anything else (malformed response, body decoding)
    Other,
}

impl TransportErrorKind {
    pub fn classify(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_connect() || error.is_request() {
            Self::Connect
        } else {
            Self::Other
        }
    }
}

/// Verdict for a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Sleep for the given delay, then try again
    Retry(Duration),
    /// Stop; the last attempt's result is final
    GiveUp,
}

/// Retry strategy shared read-only by every worker
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff_base: Duration,
    backoff_max: Duration,
    retryable_statuses: HashSet<u16>,
    never_retry_statuses: HashSet<u16>,
    respect_retry_after: bool,
}

impl RetryPolicy {
    pub fn new(
        max_attempts: u32,
        backoff_base: Duration,
        retryable_statuses: impl IntoIterator<Item = u16>,
        never_retry_statuses: impl IntoIterator<Item = u16>,
    ) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff_base,
            backoff_max: Duration::from_secs(120),
            retryable_statuses: retryable_statuses.into_iter().collect(),
            never_retry_statuses: never_retry_statuses.into_iter().collect(),
            respect_retry_after: true,
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(
            config.max_attempts,
            Duration::from_millis(config.backoff_base_ms),
            config.retryable_statuses.iter().copied(),
            config.never_retry_statuses.iter().copied(),
        )
        .with_backoff_max(Duration::from_millis(config.backoff_max_ms))
        .with_respect_retry_after(config.respect_retry_after)
    }

    pub fn with_backoff_max(mut self, backoff_max: Duration) -> Self {
        self.backoff_max = backoff_max;
        self
    }

    pub fn with_respect_retry_after(mut self, respect: bool) -> Self {
        self.respect_retry_after = respect;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Decides what to do after attempt number `attempt` (1-based) ended with `outcome`
    pub fn decide(&self, attempt: u32, outcome: &AttemptOutcome) -> RetryDecision {
        match outcome {
            AttemptOutcome::Status { code, retry_after } => {
                if !self.is_retryable_status(*code) || attempt >= self.max_attempts {
                    return RetryDecision::GiveUp;
                }

                let mut delay = self.backoff(attempt);
                if self.respect_retry_after {
                    if let Some(hint) = retry_after {
                        delay = (*hint).min(self.backoff_max);
                    }
                }
                RetryDecision::Retry(delay)
            }
            AttemptOutcome::Transport(kind) => {
                if matches!(kind, TransportErrorKind::Other) || attempt >= self.max_attempts {
                    return RetryDecision::GiveUp;
                }
                RetryDecision::Retry(self.backoff(attempt))
            }
        }
    }

    /// Whether a response with `code` is worth another attempt
    ///
    /// The never-retry set wins over everything else.
    pub fn is_retryable_status(&self, code: u16) -> bool {
        !self.never_retry_statuses.contains(&code)
            && !(200..300).contains(&code)
            && self.retryable_statuses.contains(&code)
    }

    /// `backoff_base * 2^(attempt-1)`, capped at `backoff_max`
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        self.backoff_base
            .saturating_mul(1u32 << exponent)
            .min(self.backoff_max)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

/// Parses a `Retry-After` header given in delta-seconds
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_404_gives_up_on_first_attempt() {
        let policy = RetryPolicy::default();
        assert_eq!(
            policy.decide(1, &AttemptOutcome::status(404)),
            RetryDecision::GiveUp
        );
    }

    #[test]
    fn test_404_gives_up_even_if_marked_retryable() {
        let policy = RetryPolicy::new(50, Duration::from_millis(1), [404, 503], [404]);
        for attempt in 1..=50 {
            assert_eq!(
                policy.decide(attempt, &AttemptOutcome::status(404)),
                RetryDecision::GiveUp
            );
        }
    }

    #[test]
    fn test_503_retries_until_five_attempts() {
        let policy = RetryPolicy::default();
        for attempt in 1..5 {
            assert!(matches!(
                policy.decide(attempt, &AttemptOutcome::status(503)),
                RetryDecision::Retry(_)
            ));
        }
        assert_eq!(
            policy.decide(5, &AttemptOutcome::status(503)),
            RetryDecision::GiveUp
        );
    }

    #[test]
    fn test_all_retryable_server_errors() {
        let policy = RetryPolicy::default();
        for code in [500, 502, 503, 504] {
            assert!(matches!(
                policy.decide(1, &AttemptOutcome::status(code)),
                RetryDecision::Retry(_)
            ));
        }
    }

    #[test]
    fn test_success_never_retries() {
        let policy = RetryPolicy::default();
        assert_eq!(
            policy.decide(1, &AttemptOutcome::status(200)),
            RetryDecision::GiveUp
        );
    }

    #[test]
    fn test_other_client_errors_give_up() {
        let policy = RetryPolicy::default();
        for code in [400, 401, 403, 410, 429, 501] {
            assert_eq!(
                policy.decide(1, &AttemptOutcome::status(code)),
                RetryDecision::GiveUp
            );
        }
    }

    #[test]
    fn test_backoff_doubles_from_base() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(1), Duration::from_millis(100));
        assert_eq!(policy.backoff(2), Duration::from_millis(200));
        assert_eq!(policy.backoff(3), Duration::from_millis(400));
        assert_eq!(policy.backoff(4), Duration::from_millis(800));
        assert_eq!(
            policy.decide(2, &AttemptOutcome::status(502)),
            RetryDecision::Retry(Duration::from_millis(200))
        );
    }

    #[test]
    fn test_backoff_is_capped() {
        let policy = RetryPolicy::default().with_backoff_max(Duration::from_millis(300));
        assert_eq!(policy.backoff(10), Duration::from_millis(300));
        assert_eq!(policy.backoff(u32::MAX), Duration::from_millis(300));
    }

    #[test]
    fn test_transport_errors() {
        let policy = RetryPolicy::default();
        let connect = AttemptOutcome::Transport(TransportErrorKind::Connect);
        let timeout = AttemptOutcome::Transport(TransportErrorKind::Timeout);
        let other = AttemptOutcome::Transport(TransportErrorKind::Other);

        assert!(matches!(policy.decide(1, &connect), RetryDecision::Retry(_)));
        assert!(matches!(policy.decide(4, &timeout), RetryDecision::Retry(_)));
        assert_eq!(policy.decide(5, &connect), RetryDecision::GiveUp);
        assert_eq!(policy.decide(1, &other), RetryDecision::GiveUp);
    }

    #[test]
    fn test_retry_after_overrides_backoff() {
        let policy = RetryPolicy::default();
        let outcome = AttemptOutcome::Status {
            code: 503,
            retry_after: Some(Duration::from_secs(3)),
        };
        assert_eq!(
            policy.decide(1, &outcome),
            RetryDecision::Retry(Duration::from_secs(3))
        );

        let capped = policy.clone().with_backoff_max(Duration::from_secs(1));
        assert_eq!(
            capped.decide(1, &outcome),
            RetryDecision::Retry(Duration::from_secs(1))
        );

        let ignoring = policy.with_respect_retry_after(false);
        assert_eq!(
            ignoring.decide(1, &outcome),
            RetryDecision::Retry(Duration::from_millis(100))
        );
    }

    #[test]
    fn test_parse_retry_after() {
        assert_eq!(parse_retry_after("7"), Some(Duration::from_secs(7)));
        assert_eq!(parse_retry_after(" 0 "), Some(Duration::from_secs(0)));
        assert_eq!(parse_retry_after("Wed, 21 Oct 2015 07:28:00 GMT"), None);
    }

    #[test]
    fn test_single_attempt_policy_never_retries() {
        let policy = RetryPolicy::new(1, Duration::from_millis(10), [503], [404]);
        assert_eq!(
            policy.decide(1, &AttemptOutcome::status(503)),
            RetryDecision::GiveUp
        );
    }
}
