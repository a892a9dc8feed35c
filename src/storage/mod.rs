//! Storage module for the endpoint cache
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Host registration and activation state
//! - Endpoint titles and phrase confirmations
//! - Atomic per-host write batches

mod schema;
mod sqlite;
mod traits;
mod transaction;

pub use sqlite::SqliteStorage;
pub use traits::{EndpointStore, StorageError, StorageResult};
pub use transaction::{HostTransaction, PendingWrite};

use crate::CrawlError;
use std::path::Path;

/// Opens (or creates) the endpoint cache at `path`
pub fn open_storage(path: &Path) -> Result<SqliteStorage, CrawlError> {
    Ok(SqliteStorage::new(path)?)
}

/// A crawlable origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    pub id: i64,
    /// Base URL as registered, e.g. `https://example.com/`
    pub name: String,
    /// Set once activation has recorded every front-page endpoint
    pub is_searchable: bool,
    pub created_at: String,
}

/// A page path together with its recorded title
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageMatch {
    pub path: String,
    pub title: String,
}

impl PageMatch {
    pub fn new(path: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            title: title.into(),
        }
    }
}

/// Search result group for one host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostMatches {
    pub host: String,
    pub pages: Vec<PageMatch>,
}

/// A host with every endpoint known for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostWithEndpoints {
    pub host: String,
    pub is_searchable: bool,
    pub endpoints: Vec<PageMatch>,
}
