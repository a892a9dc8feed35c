//! In-memory page fetcher for unit tests

use crate::crawler::PageFetcher;
use crate::FetchError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone)]
enum MockPage {
    Body(Vec<u8>),
    Slow(Duration, Vec<u8>),
    Failure,
}

/// Serves canned bodies keyed by (host, path) and records every call
#[derive(Debug, Default)]
pub(crate) struct MockFetcher {
    pages: HashMap<(String, String), MockPage>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    requested: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_page(mut self, host: &str, path: &str, body: &str) -> Self {
        self.pages.insert(
            (host.to_string(), path.to_string()),
            MockPage::Body(body.as_bytes().to_vec()),
        );
        self
    }

    pub(crate) fn with_slow_page(
        mut self,
        host: &str,
        path: &str,
        delay: Duration,
        body: &str,
    ) -> Self {
        self.pages.insert(
            (host.to_string(), path.to_string()),
            MockPage::Slow(delay, body.as_bytes().to_vec()),
        );
        self
    }

    pub(crate) fn with_failure(mut self, host: &str, path: &str) -> Self {
        self.pages
            .insert((host.to_string(), path.to_string()), MockPage::Failure);
        self
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Paths requested so far, in call order
    pub(crate) fn requested_paths(&self) -> Vec<String> {
        self.requested
            .lock()
            .map(|paths| paths.clone())
            .unwrap_or_default()
    }
}

fn unavailable(host: &str, path: &str, reason: &str) -> FetchError {
    FetchError::Unavailable {
        host: host.to_string(),
        path: path.to_string(),
        reason: reason.to_string(),
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch(&self, host: &str, path: &str) -> Result<Vec<u8>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requested) = self.requested.lock() {
            requested.push(path.to_string());
        }

        let page = self
            .pages
            .get(&(host.to_string(), path.to_string()))
            .cloned();

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let result = match page {
            Some(MockPage::Body(body)) => Ok(body),
            Some(MockPage::Slow(delay, body)) => {
                tokio::time::sleep(delay).await;
                Ok(body)
            }
            Some(MockPage::Failure) => Err(unavailable(host, path, "connection refused")),
            None => Err(unavailable(host, path, "no page registered for this path")),
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_failures_report_unavailable_page() {
        let fetcher = MockFetcher::new().with_failure("https://a.example", "/down");

        let failed = fetcher.fetch("https://a.example", "/down").await;
        assert!(matches!(
            failed,
            Err(FetchError::Unavailable { ref path, ref reason, .. })
                if path == "/down" && reason == "connection refused"
        ));

        let missing = fetcher.fetch("https://a.example", "/nowhere").await;
        match missing {
            Err(err @ FetchError::Unavailable { .. }) => {
                assert!(err.to_string().contains("/nowhere"));
            }
            other => panic!("expected unavailable page, got {:?}", other),
        }
        assert_eq!(fetcher.call_count(), 2);
    }
}
