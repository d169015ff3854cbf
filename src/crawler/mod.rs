//! Crawler module for solutions page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - Turning dates into crawl tasks
//! - HTTP fetching with retry logic
//! - Extracting words from the page content region
//! - Bounded concurrent execution and overall crawl coordination

mod coordinator;
mod extractor;
mod fetcher;
mod pool;
mod retry;
mod task;

pub use coordinator::{run_crawl, Coordinator, CrawlReport};
pub use extractor::{ContentExtractor, TOKEN_PATTERN};
pub use fetcher::{build_http_client, FailureReason, FetchOutcome, PageFetcher};
pub use pool::CrawlWorkerPool;
pub use retry::{parse_retry_after, AttemptOutcome, RetryDecision, RetryPolicy, TransportErrorKind};
pub use task::{build_tasks, CrawlTask};
