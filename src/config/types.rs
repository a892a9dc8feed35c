use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Phrase-Crawl
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    pub storage: StorageConfig,
    /// Hosts activated by `activate` when no names are given
    #[serde(default, rename = "host")]
    pub hosts: Vec<HostEntry>,
}

/// Search fan-out behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Time budget for one host's pass (seconds)
    #[serde(rename = "host-time-budget-secs")]
    pub host_time_budget_secs: u64,

    /// Time budget for a whole multi-host call (seconds)
    #[serde(rename = "global-time-budget-secs")]
    pub global_time_budget_secs: u64,

    /// Worker pool size for one host's fetches
    #[serde(rename = "max-concurrent-fetches")]
    pub max_concurrent_fetches: usize,

    /// Time budget for crawling one host during activation (seconds)
    #[serde(rename = "activation-time-budget-secs")]
    pub activation_time_budget_secs: u64,
}

impl SearchConfig {
    pub fn host_time_budget(&self) -> Duration {
        Duration::from_secs(self.host_time_budget_secs)
    }

    pub fn global_time_budget(&self) -> Duration {
        Duration::from_secs(self.global_time_budget_secs)
    }

    pub fn activation_time_budget(&self) -> Duration {
        Duration::from_secs(self.activation_time_budget_secs)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            host_time_budget_secs: 60,
            global_time_budget_secs: 120,
            max_concurrent_fetches: 16,
            activation_time_budget_secs: 60,
        }
    }
}

/// HTTP fetcher configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// URL scheme used for every request
    pub scheme: String,

    /// Transport-level timeout for a single request (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            scheme: "https".to_string(),
            request_timeout_secs: 30,
            user_agent: format!("phrase-crawl/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Persistent store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

/// A host to activate
#[derive(Debug, Clone, Deserialize)]
pub struct HostEntry {
    /// Base URL, e.g. `https://www.example.com/`
    pub name: String,
}
