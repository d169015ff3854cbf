use serde::Deserialize;
use std::time::Duration;

/// Solutions archive the crawler targets by default
pub const DEFAULT_URL_TEMPLATE: &str =
    "https://paraulogicavui.com/{date}-solucions-del-paraulogic-davui/";

/// Date rendering used in archive URLs (`DD-MM-YYYY`)
pub const DEFAULT_DATE_FORMAT: &str = "%d-%m-%Y";

/// Element holding the solutions list on each page
pub const DEFAULT_CONTENT_SELECTOR: &str = "div.entry-content";

/// Lower bound for the default concurrency; fetching is network-bound
pub const MIN_DEFAULT_CONCURRENCY: usize = 32;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub retry: RetryConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// URL with a `{date}` placeholder
    #[serde(rename = "url-template")]
    pub url_template: String,

    /// strftime format the date is rendered with before substitution
    #[serde(rename = "date-format")]
    pub date_format: String,

    /// CSS selector of the content region
    #[serde(rename = "content-selector")]
    pub content_selector: String,

    /// Maximum number of concurrent page fetches
    #[serde(rename = "max-concurrent-fetches")]
    pub max_concurrent_fetches: usize,

    /// Whole-request timeout in seconds
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Connection establishment timeout in seconds
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            content_selector: DEFAULT_CONTENT_SELECTOR.to_string(),
            max_concurrent_fetches: default_concurrency(),
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

impl CrawlerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Retry behavior for page requests
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts per page, first request included
    #[serde(rename = "max-attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry; doubles on each subsequent retry
    #[serde(rename = "backoff-base-ms")]
    pub backoff_base_ms: u64,

    /// Upper bound for any single delay
    #[serde(rename = "backoff-max-ms")]
    pub backoff_max_ms: u64,

    /// Statuses treated as transient server failures
    #[serde(rename = "retryable-statuses")]
    pub retryable_statuses: Vec<u16>,

    /// Statuses that are never retried, whatever else is configured
    #[serde(rename = "never-retry-statuses")]
    pub never_retry_statuses: Vec<u16>,

    /// Honour `Retry-After` on retryable responses
    #[serde(rename = "respect-retry-after")]
    pub respect_retry_after: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff_base_ms: 100,
            backoff_max_ms: 120_000,
            retryable_statuses: vec![500, 502, 503, 504],
            never_retry_statuses: vec![404],
            respect_retry_after: true,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Format: CrawlerName/Version
    pub fn header_value(&self) -> String {
        format!("{}/{}", self.crawler_name, self.crawler_version)
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the JSON words file
    pub path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "words.json".to_string(),
        }
    }
}

/// `max(cpu cores, 32)`
pub fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .max(MIN_DEFAULT_CONCURRENCY)
}
