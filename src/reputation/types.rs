//! AbuseIPDB `check` response shapes and their mapping to records.

use chrono::{DateTime, Local, Utc};
use serde::Deserialize;

use super::countries::country_name;
use crate::error_handling::LookupError;
use crate::store::EnrichmentRecord;

/// Top-level `check` response.
#[derive(Debug, Deserialize)]
pub(crate) struct CheckResponse {
    pub(crate) data: Option<CheckData>,
}

/// The `data` object. Every field is optional on the wire.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CheckData {
    pub(crate) ip_address: Option<String>,
    pub(crate) is_public: Option<bool>,
    pub(crate) ip_version: Option<u8>,
    pub(crate) is_whitelisted: Option<bool>,
    pub(crate) abuse_confidence_score: Option<u8>,
    pub(crate) country_code: Option<String>,
    pub(crate) country_name: Option<String>,
    pub(crate) usage_type: Option<String>,
    pub(crate) isp: Option<String>,
    pub(crate) domain: Option<String>,
    #[serde(default)]
    pub(crate) hostnames: Vec<String>,
    pub(crate) is_tor: Option<bool>,
    pub(crate) total_reports: Option<u64>,
    pub(crate) num_distinct_users: Option<u64>,
    pub(crate) last_reported_at: Option<String>,
}

impl CheckData {
    /// Maps the response into a record for `queried_ip`.
    ///
    /// A missing or empty country name is resolved from the country code.
    pub(crate) fn into_record(
        self,
        queried_ip: &str,
        timestamp: DateTime<Local>,
    ) -> Result<EnrichmentRecord, LookupError> {
        if let Some(score) = self.abuse_confidence_score {
            if score > 100 {
                return Err(LookupError::Unexpected(format!(
                    "abuseConfidenceScore out of range: {score}"
                )));
            }
        }

        let last_reported_at = match self.last_reported_at.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(
                DateTime::parse_from_rfc3339(raw)
                    .map_err(|e| {
                        LookupError::Unexpected(format!("invalid lastReportedAt {raw:?}: {e}"))
                    })?
                    .with_timezone(&Utc),
            ),
        };

        let country_code = self.country_code.unwrap_or_default();
        let country_name = match self.country_name {
            Some(name) if !name.trim().is_empty() => name,
            _ => country_name(&country_code).to_string(),
        };

        Ok(EnrichmentRecord {
            timestamp,
            ip_address: self.ip_address.unwrap_or_else(|| queried_ip.to_string()),
            is_public: self.is_public,
            ip_version: self.ip_version,
            is_whitelisted: self.is_whitelisted,
            abuse_confidence_score: self.abuse_confidence_score,
            country_code,
            country_name,
            usage_type: self.usage_type.unwrap_or_default(),
            isp: self.isp.unwrap_or_default(),
            domain: self.domain.unwrap_or_default(),
            hostnames: self.hostnames,
            is_tor: self.is_tor,
            total_reports: self.total_reports,
            num_distinct_users: self.num_distinct_users,
            last_reported_at,
        })
    }
}

/// Parses a `check` response body into a record.
pub(crate) fn parse_check_response(
    body: &str,
    queried_ip: &str,
    timestamp: DateTime<Local>,
) -> Result<EnrichmentRecord, LookupError> {
    let response: CheckResponse = serde_json::from_str(body)
        .map_err(|e| LookupError::Unexpected(format!("malformed response: {e}")))?;
    let data = response
        .data
        .ok_or_else(|| LookupError::Unexpected("response has no data object".to_string()))?;
    data.into_record(queried_ip, timestamp)
}
