//! Storage traits and error types
//!
//! This module defines the trait interface for endpoint cache backends and
//! associated error types.

use crate::storage::{Host, HostTransaction, HostWithEndpoints, PageMatch};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Host not found: {0}")]
    HostNotFound(String),

    #[error("Database connection lock poisoned")]
    LockPoisoned,
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for endpoint cache backends
///
/// The store is the sole durable owner of hosts, endpoints, phrases and
/// confirmations. Implementations must be safe to share between concurrent
/// searches; each host's writes arrive as one `HostTransaction`.
pub trait EndpointStore: Send + Sync {
    // ===== Hosts =====

    /// Lists every known host
    fn list_hosts(&self) -> StorageResult<Vec<Host>>;

    /// Gets a host by its name
    fn get_host(&self, name: &str) -> StorageResult<Option<Host>>;

    /// Inserts a host; returns false when the name already exists
    fn create_host(&self, name: &str) -> StorageResult<bool>;

    /// Flips a host to searchable once activation has committed
    fn mark_host_searchable(&self, host: &Host) -> StorageResult<()>;

    // ===== Endpoints =====

    /// Endpoints of `host` already confirmed to contain `phrase`
    fn get_confirmed_endpoints(&self, host: &Host, phrase: &str) -> StorageResult<Vec<PageMatch>>;

    /// Paths of `host` not yet confirmed for `phrase`
    ///
    /// Confirmations for other phrases do not exclude a path.
    fn get_unconfirmed_endpoints(&self, host: &Host, phrase: &str) -> StorageResult<Vec<String>>;

    /// Splits the endpoints of `host` into those confirmed for `phrase` and
    /// the paths not yet confirmed, from one consistent read
    ///
    /// Every endpoint lands in exactly one of the two sets even while other
    /// searches commit confirmations for the same phrase.
    fn partition_endpoints(
        &self,
        host: &Host,
        phrase: &str,
    ) -> StorageResult<(Vec<PageMatch>, Vec<String>)>;

    /// Checks whether `path` is a known endpoint of `host`
    fn endpoint_exists(&self, host: &Host, path: &str) -> StorageResult<bool>;

    /// Every endpoint of `host` with its title
    fn list_endpoints(&self, host: &Host) -> StorageResult<Vec<PageMatch>>;

    /// Phrases confirmed for one endpoint
    fn list_endpoint_phrases(&self, host: &Host, path: &str) -> StorageResult<Vec<String>>;

    // ===== Writes =====

    /// Opens a write batch scoped to `host`
    fn begin_host_transaction(&self, host: &Host) -> HostTransaction {
        HostTransaction::begin(host)
    }

    /// Applies a write batch atomically
    ///
    /// Returns the number of endpoint rows that did not exist before.
    fn commit(&self, tx: HostTransaction) -> StorageResult<usize>;

    // ===== Reporting =====

    /// Every host together with its endpoints
    fn list_hosts_with_endpoints(&self) -> StorageResult<Vec<HostWithEndpoints>> {
        self.list_hosts()?
            .into_iter()
            .map(|host| {
                let endpoints = self.list_endpoints(&host)?;
                Ok::<_, StorageError>(HostWithEndpoints {
                    host: host.name,
                    is_searchable: host.is_searchable,
                    endpoints,
                })
            })
            .collect()
    }
}
