//! Application initialization and resource setup.
//!
//! This module provides functions to initialize shared resources:
//! - Logger (plain or JSON, to stderr)
//! - HTTP client (with the lookup timeout)
//! - Reputation lookup and remote store selected from `Config`

mod client;
mod logger;

use std::sync::Arc;

use crate::config::Config;
use crate::error_handling::InitializationError;
use crate::reputation::AbuseIpDbClient;
use crate::sync::{GitHubRemote, LocalOnly, RemoteStore};

pub use client::init_client;
pub use logger::init_logger_with;

/// Builds the reputation client.
///
/// # Errors
///
/// Returns `InitializationError::ConfigError` if no API key is configured.
pub fn init_lookup(
    http: Arc<reqwest::Client>,
    config: &Config,
) -> Result<AbuseIpDbClient, InitializationError> {
    AbuseIpDbClient::new(http, config)
}

/// Selects the remote store: GitHub unless sync is disabled.
///
/// # Errors
///
/// Returns `InitializationError::ConfigError` if sync is enabled but the
/// repository coordinates are incomplete.
pub fn init_remote(
    http: Arc<reqwest::Client>,
    config: &Config,
) -> Result<Box<dyn RemoteStore>, InitializationError> {
    if config.no_sync {
        log::info!("Remote sync disabled, using local store only");
        return Ok(Box::new(LocalOnly));
    }
    let remote = GitHubRemote::new(http, config)?;
    log::debug!("Remote store: {}", remote.raw_url());
    Ok(Box::new(remote))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_remote_no_sync_is_local() {
        let config = Config {
            no_sync: true,
            ..Default::default()
        };
        let http = init_client(&config).expect("client");
        assert!(init_remote(http, &config).is_ok());
    }

    #[test]
    fn test_init_remote_requires_repository() {
        let config = Config::default();
        let http = init_client(&config).expect("client");
        assert!(matches!(
            init_remote(http, &config),
            Err(InitializationError::ConfigError(_))
        ));
    }

    #[test]
    fn test_init_lookup_requires_api_key() {
        let config = Config::default();
        let http = init_client(&config).expect("client");
        assert!(matches!(
            init_lookup(http, &config),
            Err(InitializationError::ConfigError(_))
        ));
    }
}
