//! HTTP fetcher implementation
//!
//! This module performs exactly one GET per page:
//! - The URL is composed from the configured scheme, the host name with any
//!   scheme prefix stripped, and the endpoint path
//! - Redirects follow the transport's default policy
//! - The status code is not inspected; any body that arrives is returned
//! - There is no retry; transport failures surface as a single `FetchError`

use crate::config::FetcherConfig;
use crate::FetchError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Retrieves the raw bytes of one page under a host
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches `path` under `host` and returns the full response body
    async fn fetch(&self, host: &str, path: &str) -> Result<Vec<u8>, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use phrase_crawl::config::FetcherConfig;
/// use phrase_crawl::crawler::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Removes a leading `http://` or `https://` and any trailing slashes
pub fn strip_scheme(host: &str) -> &str {
    host.strip_prefix("https://")
        .or_else(|| host.strip_prefix("http://"))
        .unwrap_or(host)
        .trim_end_matches('/')
}

/// Composes the request URL for `path` under `host`
///
/// The path always stays on `host`: it is set as the URL path (plus query),
/// never resolved as a reference, and any fragment is dropped.
pub fn compose_url(scheme: &str, host: &str, path: &str) -> Result<Url, FetchError> {
    let invalid = |source| FetchError::InvalidUrl {
        host: host.to_string(),
        path: path.to_string(),
        source,
    };

    let mut url = Url::parse(&format!("{}://{}/", scheme, strip_scheme(host))).map_err(invalid)?;

    let without_fragment = path.split_once('#').map_or(path, |(before, _)| before);
    let (path_part, query) = match without_fragment.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (without_fragment, None),
    };

    url.set_path(path_part);
    url.set_query(query);
    Ok(url)
}

/// reqwest-backed page fetcher
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    scheme: String,
}

impl HttpFetcher {
    pub fn new(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
            scheme: config.scheme.clone(),
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, host: &str, path: &str) -> Result<Vec<u8>, FetchError> {
        let url = compose_url(&self.scheme, host, path)?;
        tracing::debug!("Fetching {}", url);

        let transport = |source| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(transport)?;
        let body = response.bytes().await.map_err(transport)?;

        Ok(body.to_vec())
    }
}
