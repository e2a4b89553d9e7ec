//! AbuseIPDB `check` endpoint client.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Local;
use reqwest::header::ACCEPT;
use url::Url;

use super::types::parse_check_response;
use super::ReputationLookup;
use crate::config::{Config, Secret};
use crate::error_handling::{categorize_reqwest_error, InitializationError, LookupError};
use crate::store::EnrichmentRecord;

/// Header carrying the API key.
const API_KEY_HEADER: &str = "Key";

/// Production reputation client.
///
/// Issues exactly one request per lookup; the per-request timeout lives on
/// the shared `reqwest::Client` (see `initialization::init_client`).
pub struct AbuseIpDbClient {
    http: Arc<reqwest::Client>,
    check_url: Url,
    api_key: Secret,
    max_age_days: Option<u16>,
}

impl std::fmt::Debug for AbuseIpDbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AbuseIpDbClient")
            .field("check_url", &self.check_url.as_str())
            .field("api_key", &self.api_key)
            .field("max_age_days", &self.max_age_days)
            .finish()
    }
}

impl AbuseIpDbClient {
    /// Builds a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::ConfigError` if the API key is missing or
    /// the base URL is invalid.
    pub fn new(http: Arc<reqwest::Client>, config: &Config) -> Result<Self, InitializationError> {
        if config.api_key.is_empty() {
            return Err(InitializationError::ConfigError(
                "AbuseIPDB API key is not set (use --api-key or ABUSEIPDB_API_KEY)".to_string(),
            ));
        }
        let check_url = check_endpoint(&config.api_base_url)?;
        Ok(Self {
            http,
            check_url,
            api_key: config.api_key.clone(),
            max_age_days: config.max_age_days,
        })
    }
}

#[async_trait]
impl ReputationLookup for AbuseIpDbClient {
    async fn lookup(&self, ip: &str) -> Result<EnrichmentRecord, LookupError> {
        let mut request = self
            .http
            .get(self.check_url.clone())
            .query(&[("ipAddress", ip)])
            .header(ACCEPT, "application/json")
            .header(API_KEY_HEADER, self.api_key.expose());
        if let Some(days) = self.max_age_days {
            request = request.query(&[("maxAgeInDays", days)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| categorize_reqwest_error(&e))?
            .error_for_status()
            .map_err(|e| categorize_reqwest_error(&e))?;

        let body = response
            .text()
            .await
            .map_err(|e| categorize_reqwest_error(&e))?;

        parse_check_response(&body, ip, Local::now())
    }
}

fn check_endpoint(base: &str) -> Result<Url, InitializationError> {
    let normalized = if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{base}/")
    };
    Url::parse(&normalized)
        .and_then(|u| u.join("check"))
        .map_err(|e| InitializationError::ConfigError(format!("invalid API base URL {base:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_endpoint_with_and_without_slash() {
        assert_eq!(
            check_endpoint("https://api.abuseipdb.com/api/v2/")
                .expect("url")
                .as_str(),
            "https://api.abuseipdb.com/api/v2/check"
        );
        assert_eq!(
            check_endpoint("http://127.0.0.1:8080/api/v2")
                .expect("url")
                .as_str(),
            "http://127.0.0.1:8080/api/v2/check"
        );
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        assert!(matches!(
            check_endpoint("not a url"),
            Err(InitializationError::ConfigError(_))
        ));
    }

    #[test]
    fn test_missing_api_key_rejected() {
        let config = Config::default();
        let result = AbuseIpDbClient::new(Arc::new(reqwest::Client::new()), &config);
        assert!(matches!(result, Err(InitializationError::ConfigError(_))));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = Config {
            api_key: Secret::new("0123456789abcdef"),
            ..Default::default()
        };
        let client =
            AbuseIpDbClient::new(Arc::new(reqwest::Client::new()), &config).expect("client");
        let rendered = format!("{:?}", client);
        assert!(!rendered.contains("0123456789abcdef"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
