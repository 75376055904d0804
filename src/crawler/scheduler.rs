//! Bounded fan-out of crawl tasks
//!
//! Every fan-out point (listing pages of a category, review pages of a
//! product) owns a `FanOut` pool. An item's future is only built and spawned
//! once a permit from the pool's semaphore is held, so at most `limit` tasks
//! of one pool exist at a time regardless of how many items are fed in.
//! Results are collected in completion order once every task has finished.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// A bounded worker pool for one fan-out point
#[derive(Debug, Clone)]
pub struct FanOut {
    /// Name used in log messages
    label: &'static str,

    /// Permits limiting live tasks
    semaphore: Arc<Semaphore>,

    limit: usize,
}

/// Outputs of one `FanOut::run`
#[derive(Debug)]
pub struct FanOutResults<T> {
    /// Outputs of the tasks that finished, in completion order
    pub completed: Vec<T>,

    /// Tasks that panicked and produced no output
    pub panicked: usize,
}

impl FanOut {
    /// Creates a pool running at most `limit` tasks at once
    ///
    /// A limit of 0 is treated as 1.
    pub fn new(label: &'static str, limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            label,
            semaphore: Arc::new(Semaphore::new(limit)),
            limit,
        }
    }

    /// Returns the maximum number of concurrently live tasks
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Runs one task per item and waits for all of them
    ///
    /// Items are pulled lazily: the next one is turned into a task only after
    /// a running task has released its permit. A task that panics is logged
    /// and counted in `panicked`; its siblings keep running.
    pub async fn run<I, F, Fut, T>(&self, items: I, task: F) -> FanOutResults<T>
    where
        I: IntoIterator,
        F: Fn(I::Item) -> Fut,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let mut tasks = JoinSet::new();
        let mut results = FanOutResults {
            completed: Vec::new(),
            panicked: 0,
        };

        for item in items {
            // The semaphore is never closed
            let Ok(permit) = Arc::clone(&self.semaphore).acquire_owned().await else {
                break;
            };

            while let Some(joined) = tasks.try_join_next() {
                self.collect(joined, &mut results);
            }

            let work = task(item);
            tasks.spawn(async move {
                let output = work.await;
                drop(permit);
                output
            });
        }

        while let Some(joined) = tasks.join_next().await {
            self.collect(joined, &mut results);
        }

        tracing::debug!(
            "{}: {} tasks finished, {} panicked",
            self.label,
            results.completed.len(),
            results.panicked
        );

        results
    }

    fn collect<T>(
        &self,
        joined: Result<T, tokio::task::JoinError>,
        results: &mut FanOutResults<T>,
    ) {
        match joined {
            Ok(output) => results.completed.push(output),
            Err(e) => {
                tracing::error!("{} task failed: {}", self.label, e);
                results.panicked += 1;
            }
        }
    }
}
