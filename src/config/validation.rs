use crate::config::types::{Config, FetcherConfig, HostEntry, SearchConfig, StorageConfig};
use crate::ConfigError;
use url::Url;

const MAX_CONCURRENT_FETCHES: usize = 256;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_search_config(&config.search)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_storage_config(&config.storage)?;
    validate_hosts(&config.hosts)?;
    Ok(())
}

/// Validates search budgets and pool size
fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    if config.host_time_budget_secs < 1 {
        return Err(ConfigError::Validation(
            "host-time-budget-secs must be >= 1".to_string(),
        ));
    }

    if config.global_time_budget_secs < config.host_time_budget_secs {
        return Err(ConfigError::Validation(format!(
            "global-time-budget-secs ({}) must be >= host-time-budget-secs ({})",
            config.global_time_budget_secs, config.host_time_budget_secs
        )));
    }

    if config.activation_time_budget_secs < 1 {
        return Err(ConfigError::Validation(
            "activation-time-budget-secs must be >= 1".to_string(),
        ));
    }

    if config.max_concurrent_fetches < 1 || config.max_concurrent_fetches > MAX_CONCURRENT_FETCHES {
        return Err(ConfigError::Validation(format!(
            "max-concurrent-fetches must be between 1 and {}, got {}",
            MAX_CONCURRENT_FETCHES, config.max_concurrent_fetches
        )));
    }

    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.scheme != "https" && config.scheme != "http" {
        return Err(ConfigError::Validation(format!(
            "scheme must be 'https' or 'http', got '{}'",
            config.scheme
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "request-timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates storage configuration
fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates host entries
fn validate_hosts(hosts: &[HostEntry]) -> Result<(), ConfigError> {
    for entry in hosts {
        validate_host_name(&entry.name)?;
    }
    Ok(())
}

/// Validates a single host name as accepted by activation
pub fn validate_host_name(name: &str) -> Result<(), ConfigError> {
    if name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "host name cannot be empty".to_string(),
        ));
    }

    if name.chars().any(char::is_whitespace) {
        return Err(ConfigError::Validation(format!(
            "host name '{}' cannot contain whitespace",
            name
        )));
    }

    // Bare hosts are accepted; anything carrying a scheme must parse as a URL
    if name.contains("://") {
        Url::parse(name)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid host '{}': {}", name, e)))?;
    }

    Ok(())
}
