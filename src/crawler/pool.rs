//! Bounded worker pool for crawl tasks
//!
//! Every task is spawned onto the runtime up front and then waits for one of
//! `concurrency` semaphore permits before fetching. Completed outcomes are
//! handed to the [`ResultAggregator`] in completion order, from this single
//! loop, so the aggregator never sees two writers at once.

use crate::crawler::fetcher::FetchOutcome;
use crate::crawler::task::CrawlTask;
use crate::output::ResultAggregator;
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Runs crawl tasks with a fixed concurrency limit
#[derive(Debug, Clone)]
pub struct CrawlWorkerPool {
    concurrency: usize,
}

impl CrawlWorkerPool {
    /// Creates a pool; a limit of zero is raised to one
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Executes every task and feeds each outcome to `aggregator`
    ///
    /// Returns once all tasks have produced exactly one outcome. A task that
    /// panics is recorded as a transient failure for its date; its siblings
    /// keep running.
    ///
    /// # Arguments
    ///
    /// * `tasks` - Work items, consumed
    /// * `fetch` - Turns one task into its outcome
    /// * `aggregator` - Receives outcomes as they complete
    pub async fn run<F, Fut>(&self, tasks: Vec<CrawlTask>, fetch: F, aggregator: &mut ResultAggregator)
    where
        F: Fn(CrawlTask) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = FetchOutcome> + Send + 'static,
    {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let fetch = Arc::new(fetch);
        let mut in_flight = JoinSet::new();

        tracing::info!(
            "Submitting {} tasks with concurrency {}",
            tasks.len(),
            self.concurrency
        );
        aggregator.expect(tasks.len());

        for task in tasks {
            let semaphore = Arc::clone(&semaphore);
            let fetch = Arc::clone(&fetch);

            in_flight.spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return FetchOutcome::crashed(&task, "worker pool closed"),
                };

                let guarded = AssertUnwindSafe(async { (*fetch)(task.clone()).await });
                match guarded.catch_unwind().await {
                    Ok(outcome) => outcome,
                    Err(panic) => {
                        let cause = format!("worker panicked: {}", panic_message(panic.as_ref()));
                        tracing::error!("Task for {} crashed: {}", task.date, cause);
                        FetchOutcome::crashed(&task, cause)
                    }
                }
            });
        }

        while let Some(joined) = in_flight.join_next().await {
            match joined {
                Ok(outcome) => aggregator.record(outcome),
                // Only reachable if the runtime cancels the task
                Err(e) => {
                    tracing::error!("Crawl task did not complete: {}", e);
                    aggregator.record_lost(e.to_string());
                }
            }
        }

        tracing::debug!("Worker pool drained");
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
