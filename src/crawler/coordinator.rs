//! Crawler coordinator - main crawl orchestration logic
//!
//! The coordinator wires the pipeline together:
//! - Rendering one task per date of the range
//! - Sharing a single HTTP client, retry policy and extractor across workers
//! - Fanning tasks out to the worker pool
//! - Collecting every outcome into one aggregate result

use crate::config::Config;
use crate::crawler::extractor::ContentExtractor;
use crate::crawler::fetcher::{build_http_client, PageFetcher};
use crate::crawler::pool::CrawlWorkerPool;
use crate::crawler::retry::RetryPolicy;
use crate::crawler::task::build_tasks;
use crate::dates::DateRange;
use crate::output::{AggregateResult, CrawlStatistics, ResultAggregator};
use crate::url::UrlTemplate;
use crate::Result;
use std::sync::Arc;

/// Everything a finished run hands to the output stage
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub result: AggregateResult,
    pub statistics: CrawlStatistics,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    template: UrlTemplate,
    fetcher: Arc<PageFetcher>,
    pool: CrawlWorkerPool,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration, already validated
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(CrawlError)` - The template, selector or HTTP client could not be built
    pub fn new(config: &Config) -> Result<Self> {
        let template = UrlTemplate::new(&config.crawler.url_template, &config.crawler.date_format)?;
        let extractor = ContentExtractor::new(&config.crawler.content_selector)?;
        let policy = RetryPolicy::from_config(&config.retry);
        let client = build_http_client(&config.crawler, &config.user_agent)?;

        tracing::debug!(
            "Coordinator ready: template {}, {} attempts per page",
            template.as_str(),
            policy.max_attempts()
        );

        Ok(Self {
            template,
            fetcher: Arc::new(PageFetcher::new(client, policy, extractor)),
            pool: CrawlWorkerPool::new(config.crawler.max_concurrent_fetches),
        })
    }

    /// Crawls every date of `range`
    ///
    /// Per-date failures are counted in the report and never abort the run.
    /// The only error is a date whose URL cannot be rendered, which is
    /// detected before any request is sent.
    pub async fn run(&self, range: DateRange) -> Result<CrawlReport> {
        tracing::info!(
            "Crawling {} dates from {} to {}",
            range.num_days(),
            range.start(),
            range.end()
        );

        let tasks = build_tasks(range, &self.template)?;
        let mut aggregator = ResultAggregator::new();

        let fetcher = Arc::clone(&self.fetcher);
        self.pool
            .run(
                tasks,
                move |task| {
                    let fetcher = Arc::clone(&fetcher);
                    async move { fetcher.fetch(&task).await }
                },
                &mut aggregator,
            )
            .await;

        let statistics = aggregator.statistics();
        let result = aggregator.finish();

        tracing::info!(
            "Crawl completed: {} unique words, {} failed dates",
            result.words.len(),
            result.failed
        );

        Ok(CrawlReport { result, statistics })
    }
}

/// Runs the main crawl operation
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `range` - Dates to crawl
///
/// # Example
///
/// ```no_run
/// use paraulogic_crawler::config::Config;
/// use paraulogic_crawler::crawler::run_crawl;
/// use paraulogic_crawler::dates::DateRange;
/// use chrono::NaiveDate;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let range = DateRange::new(
///     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
/// )?;
/// let report = run_crawl(&Config::default(), range).await?;
/// println!("{} words", report.result.words.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config, range: DateRange) -> Result<CrawlReport> {
    let coordinator = Coordinator::new(config)?;
    coordinator.run(range).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CrawlError;

    #[test]
    fn test_coordinator_creation() {
        let coordinator = Coordinator::new(&Config::default()).unwrap();
        assert!(coordinator.pool.concurrency() >= 32);
    }

    #[test]
    fn test_invalid_selector_rejected() {
        let mut config = Config::default();
        config.crawler.content_selector = "div[".to_string();

        assert!(matches!(
            Coordinator::new(&config),
            Err(CrawlError::Extract(_))
        ));
    }

    #[test]
    fn test_template_without_placeholder_rejected() {
        let mut config = Config::default();
        config.crawler.url_template = "https://example.com/solucions/".to_string();

        assert!(matches!(
            Coordinator::new(&config),
            Err(CrawlError::UrlError(_))
        ));
    }
}
