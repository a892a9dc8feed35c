//! Bounded fetch pool
//!
//! Fans a list of endpoint paths out to a fixed number of workers that share
//! one queue. Each fetched body is handed to a handler on the worker; the
//! handler's accepted values flow back to the caller over a channel.
//!
//! The first fetch failure stops the pass: remaining workers are cancelled and
//! the error is returned. Dropping the pass (for example when an enclosing
//! `tokio::time::timeout` elapses) aborts every worker.

use crate::crawler::PageFetcher;
use crate::CrawlError;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Fixed-size pool of fetch workers
#[derive(Clone)]
pub struct FetchPool {
    fetcher: Arc<dyn PageFetcher>,
    workers: usize,
}

impl FetchPool {
    /// Creates a pool that never runs more than `workers` fetches at once
    pub fn new(fetcher: Arc<dyn PageFetcher>, workers: usize) -> Self {
        Self {
            fetcher,
            workers: workers.max(1),
        }
    }

    /// Fetches a single page under `host`, honoring cancellation
    pub async fn fetch_one(
        &self,
        host: &str,
        path: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, CrawlError> {
        tokio::select! {
            _ = cancel.cancelled() => Err(CrawlError::Cancelled),
            fetched = self.fetcher.fetch(host, path) => Ok(fetched?),
        }
    }

    /// Fetches every path under `host` and collects the handler's accepted values
    ///
    /// The handler receives the path and the full body; returning `None`
    /// drops that page from the result. Results arrive in completion order.
    pub async fn run<T, H>(
        &self,
        host: &str,
        paths: Vec<String>,
        cancel: &CancellationToken,
        handler: H,
    ) -> Result<Vec<T>, CrawlError>
    where
        T: Send + 'static,
        H: Fn(&str, &[u8]) -> Option<T> + Send + Sync + 'static,
    {
        if paths.is_empty() {
            return Ok(Vec::new());
        }

        let total = paths.len();
        let worker_count = self.workers.min(total);
        tracing::debug!(
            "Fetching {} endpoints on {} with {} workers",
            total,
            host,
            worker_count
        );

        // Cancelled when this pass ends for any reason
        let local = cancel.child_token();
        let _stop_workers = local.clone().drop_guard();

        let queue = Arc::new(Mutex::new(VecDeque::from(paths)));
        let handler = Arc::new(handler);
        let (tx, mut rx) = mpsc::channel::<Result<Option<T>, CrawlError>>(worker_count);

        let mut workers = JoinSet::new();
        for _ in 0..worker_count {
            let queue = Arc::clone(&queue);
            let fetcher = Arc::clone(&self.fetcher);
            let handler = Arc::clone(&handler);
            let tx = tx.clone();
            let cancel = local.clone();
            let host = host.to_string();

            workers.spawn(async move {
                loop {
                    let Some(path) = queue.lock().await.pop_front() else {
                        break;
                    };

                    let outcome = tokio::select! {
                        _ = cancel.cancelled() => Err(CrawlError::Cancelled),
                        fetched = fetcher.fetch(&host, &path) => fetched
                            .map(|body| (*handler)(&path, &body))
                            .map_err(CrawlError::from),
                    };

                    let failed = outcome.is_err();
                    if tx.send(outcome).await.is_err() || failed {
                        break;
                    }
                }
            });
        }
        drop(tx);

        let mut accepted = Vec::new();
        while let Some(outcome) = rx.recv().await {
            match outcome {
                Ok(Some(item)) => accepted.push(item),
                Ok(None) => {}
                Err(e) => {
                    local.cancel();
                    return Err(e);
                }
            }
        }

        // Every sender is gone, so the workers have finished or panicked
        while let Some(joined) = workers.join_next().await {
            joined?;
        }

        Ok(accepted)
    }
}
