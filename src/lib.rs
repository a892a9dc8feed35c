//! Phrase-Crawl: cached phrase search over a set of crawled hosts
//!
//! This crate activates hosts by crawling their front page into an endpoint
//! cache, then answers phrase searches by reusing cached confirmations and
//! fetching only the endpoints that have not yet been confirmed.

pub mod config;
pub mod crawler;
pub mod scanner;
pub mod storage;

use std::time::Duration;
use thiserror::Error;

/// Main error type for Phrase-Crawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Time limit exceeded for {scope} after {budget:?}")]
    Timeout { scope: String, budget: Duration },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Worker task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors produced while retrieving a single page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Cannot build URL from host {host:?} and path {path:?}: {source}")]
    InvalidUrl {
        host: String,
        path: String,
        source: ::url::ParseError,
    },

    #[error("HTTP error for {url}: {source}")]
    Transport { url: String, source: reqwest::Error },

    /// Failure reported by a fetcher that is not backed by reqwest
    #[error("Page {path} on {host} is unavailable: {reason}")]
    Unavailable {
        host: String,
        path: String,
        reason: String,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, HttpFetcher, PageFetcher};
pub use scanner::{extract_links, extract_title};
pub use storage::{EndpointStore, Host, HostMatches, PageMatch, SqliteStorage};
