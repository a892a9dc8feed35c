//! Crawler coordinator - entry point for searches and activations
//!
//! The coordinator owns the shared store and the fetch pool. A search fans
//! out one task per known host, bounded by the global time budget; the first
//! host error aborts the whole search and the remaining host tasks are
//! cancelled.

use crate::config::{Config, SearchConfig};
use crate::crawler::activation::activate_hosts;
use crate::crawler::orchestrator::search_host;
use crate::crawler::{FetchPool, HttpFetcher, PageFetcher};
use crate::storage::{open_storage, EndpointStore, HostMatches};
use crate::CrawlError;
use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Main coordinator structure
pub struct Coordinator {
    store: Arc<dyn EndpointStore>,
    pool: FetchPool,
    settings: SearchConfig,
}

impl Coordinator {
    /// Creates a coordinator over an existing store and fetcher
    pub fn new(
        store: Arc<dyn EndpointStore>,
        fetcher: Arc<dyn PageFetcher>,
        settings: SearchConfig,
    ) -> Self {
        let pool = FetchPool::new(fetcher, settings.max_concurrent_fetches);
        Self {
            store,
            pool,
            settings,
        }
    }

    /// Opens the configured database and builds the HTTP fetcher
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to search and activate
    /// * `Err(CrawlError)` - The database or HTTP client could not be set up
    pub fn from_config(config: &Config) -> Result<Self, CrawlError> {
        let store = open_storage(Path::new(&config.storage.database_path))?;
        let fetcher = HttpFetcher::new(&config.fetcher)?;

        Ok(Self::new(
            Arc::new(store),
            Arc::new(fetcher),
            config.search.clone(),
        ))
    }

    pub fn store(&self) -> &dyn EndpointStore {
        self.store.as_ref()
    }

    /// Searches every known host for `phrase`
    ///
    /// Hosts without any matching page are left out of the result. Groups
    /// arrive in completion order.
    pub async fn search(
        &self,
        phrase: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<HostMatches>, CrawlError> {
        validate_phrase(phrase)?;

        let hosts = self.store.list_hosts()?;
        tracing::info!("Searching {} hosts for {:?}", hosts.len(), phrase);

        // Stops every host pass once the search returns
        let local = cancel.child_token();
        let _stop_hosts = local.clone().drop_guard();

        let mut passes = JoinSet::new();
        for host in hosts {
            let store = Arc::clone(&self.store);
            let pool = self.pool.clone();
            let phrase = phrase.to_string();
            let budget = self.settings.host_time_budget();
            let cancel = local.clone();

            passes.spawn(async move {
                let pages =
                    search_host(store.as_ref(), &pool, &host, &phrase, budget, &cancel).await;
                (host.name, pages)
            });
        }

        let gather = async {
            let mut groups = Vec::new();
            while let Some(joined) = passes.join_next().await {
                let (host, pages) = joined?;
                let pages = pages.map_err(|e| {
                    tracing::error!("Search of {} failed: {}", host, e);
                    e
                })?;
                if !pages.is_empty() {
                    groups.push(HostMatches { host, pages });
                }
            }
            Ok::<_, CrawlError>(groups)
        };

        let budget = self.settings.global_time_budget();
        match tokio::time::timeout(budget, gather).await {
            Ok(result) => {
                let groups = result?;
                tracing::info!("{} hosts matched {:?}", groups.len(), phrase);
                Ok(groups)
            }
            Err(_) => {
                tracing::warn!("Search for {:?} exceeded {:?}", phrase, budget);
                Err(CrawlError::Timeout {
                    scope: "search across all hosts".to_string(),
                    budget,
                })
            }
        }
    }

    /// Activates each named host and returns the number of endpoints added
    pub async fn activate(
        &self,
        names: &[String],
        cancel: &CancellationToken,
    ) -> Result<usize, CrawlError> {
        activate_hosts(
            self.store.as_ref(),
            &self.pool,
            names,
            self.settings.activation_time_budget(),
            cancel,
        )
        .await
    }
}

/// Rejects an empty or whitespace-only phrase
pub fn validate_phrase(phrase: &str) -> Result<(), CrawlError> {
    if phrase.trim().is_empty() {
        return Err(CrawlError::Validation(
            "search phrase cannot be empty".to_string(),
        ));
    }
    Ok(())
}
