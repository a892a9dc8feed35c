//! Phrase search for a single host
//!
//! Cached confirmations are returned without any network cost. Every other
//! known endpoint is fetched through the pool and scanned for the phrase.
//! The pass is all-or-nothing: one failed fetch, an expired budget or a
//! failed commit fails the host, and nothing from the pass is persisted.

use crate::crawler::FetchPool;
use crate::scanner::{contains_phrase, extract_title};
use crate::storage::{EndpointStore, Host, PageMatch};
use crate::CrawlError;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Returns every endpoint of `host` whose body contains `phrase`
///
/// Newly confirmed endpoints are written to the store in one transaction
/// before returning.
pub async fn search_host(
    store: &dyn EndpointStore,
    pool: &FetchPool,
    host: &Host,
    phrase: &str,
    budget: Duration,
    cancel: &CancellationToken,
) -> Result<Vec<PageMatch>, CrawlError> {
    let (mut pages, misses) = store.partition_endpoints(host, phrase)?;

    tracing::info!(
        "Searching {} for {:?}: {} cached, {} to fetch",
        host.name,
        phrase,
        pages.len(),
        misses.len()
    );

    if misses.is_empty() {
        return Ok(pages);
    }

    let needle = phrase.to_string();
    let pass = pool.run(&host.name, misses, cancel, move |path, body| {
        contains_phrase(body, &needle).then(|| PageMatch::new(path, extract_title(body)))
    });

    let confirmed = match tokio::time::timeout(budget, pass).await {
        Ok(result) => result?,
        Err(_) => {
            tracing::warn!("Search of {} exceeded {:?}", host.name, budget);
            return Err(CrawlError::Timeout {
                scope: format!("host {}", host.name),
                budget,
            });
        }
    };

    if !confirmed.is_empty() {
        let mut tx = store.begin_host_transaction(host);
        for page in &confirmed {
            if !store.endpoint_exists(host, &page.path)? {
                tx.record_endpoint(&page.path, &page.title);
            }
            tx.record_confirmation(&page.path, phrase, &page.title);
        }
        store.commit(tx)?;

        tracing::info!(
            "Confirmed {} new endpoints on {} for {:?}",
            confirmed.len(),
            host.name,
            phrase
        );
    }

    pages.extend(confirmed);
    Ok(pages)
}
