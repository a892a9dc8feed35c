//! Crawler module for page fetching, phrase search and host activation
//!
//! This module contains the network-facing logic, including:
//! - HTTP fetching behind the `PageFetcher` trait
//! - A bounded, cancellable fetch pool
//! - Per-host phrase search with cache reuse
//! - Cross-host search coordination and host activation

mod activation;
mod coordinator;
mod fetcher;
mod orchestrator;
mod pool;

#[cfg(test)]
pub(crate) mod testing;

pub use activation::activate_hosts;
pub use coordinator::{validate_phrase, Coordinator};
pub use fetcher::{build_http_client, compose_url, strip_scheme, HttpFetcher, PageFetcher};
pub use orchestrator::search_host;
pub use pool::FetchPool;
