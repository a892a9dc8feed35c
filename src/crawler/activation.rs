//! Host activation
//!
//! Registers hosts, crawls each front page once, and records the title of
//! every host-relative link it finds. A host becomes searchable only after
//! its endpoints are committed. Unlike search, any failure aborts the whole
//! batch; hosts activated earlier in the batch stay activated.

use crate::config::validate_host_name;
use crate::crawler::FetchPool;
use crate::scanner::{extract_links, extract_title};
use crate::storage::{EndpointStore, PageMatch, StorageError};
use crate::CrawlError;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Activates every named host in order and returns the endpoints added
///
/// All names are validated before any host is touched.
pub async fn activate_hosts(
    store: &dyn EndpointStore,
    pool: &FetchPool,
    names: &[String],
    budget: Duration,
    cancel: &CancellationToken,
) -> Result<usize, CrawlError> {
    if names.is_empty() {
        return Err(CrawlError::Validation(
            "at least one host name is required".to_string(),
        ));
    }

    for name in names {
        validate_host_name(name).map_err(|e| CrawlError::Validation(e.to_string()))?;
    }

    let mut added = 0;
    for name in names {
        added += activate_host(store, pool, name, budget, cancel).await?;
    }

    tracing::info!("Activated {} hosts, {} new endpoints", names.len(), added);
    Ok(added)
}

async fn activate_host(
    store: &dyn EndpointStore,
    pool: &FetchPool,
    name: &str,
    budget: Duration,
    cancel: &CancellationToken,
) -> Result<usize, CrawlError> {
    if store.create_host(name)? {
        tracing::info!("Registered host {}", name);
    }
    let host = store
        .get_host(name)?
        .ok_or_else(|| StorageError::HostNotFound(name.to_string()))?;

    let crawl = async {
        let front_page = pool.fetch_one(&host.name, "/", cancel).await?;
        let links = extract_links(&front_page);

        // Known endpoints keep the title they were first recorded with
        let mut unknown = Vec::with_capacity(links.len());
        for link in links {
            if !store.endpoint_exists(&host, &link)? {
                unknown.push(link);
            }
        }

        tracing::debug!("{} has {} unrecorded endpoints", host.name, unknown.len());

        let pages = pool
            .run(&host.name, unknown, cancel, |path, body| {
                Some(PageMatch::new(path, extract_title(body)))
            })
            .await?;
        Ok::<_, CrawlError>(pages)
    };

    let pages = match tokio::time::timeout(budget, crawl).await {
        Ok(result) => result?,
        Err(_) => {
            return Err(CrawlError::Timeout {
                scope: format!("activation of {}", host.name),
                budget,
            })
        }
    };

    let mut tx = store.begin_host_transaction(&host);
    for page in &pages {
        tx.record_endpoint(&page.path, &page.title);
    }
    let added = store.commit(tx)?;
    store.mark_host_searchable(&host)?;

    tracing::info!("Host {} is searchable ({} new endpoints)", host.name, added);
    Ok(added)
}
