//! Enrichment record and its persisted line format.

use chrono::{DateTime, Local, Utc};

use crate::config::{STORE_COLUMN_COUNT, STORE_IP_COLUMN, STORE_TIMESTAMP_FORMAT};

/// One reputation lookup result.
///
/// Optional fields are ones the service may omit; they render as empty
/// columns. `country_name` is always resolved (see `reputation::countries`).
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentRecord {
    /// Local time of the lookup
    pub timestamp: DateTime<Local>,
    /// Address as echoed by the service
    pub ip_address: String,
    /// Publicly routable
    pub is_public: Option<bool>,
    /// 4 or 6
    pub ip_version: Option<u8>,
    /// On the service's whitelist
    pub is_whitelisted: Option<bool>,
    /// 0-100
    pub abuse_confidence_score: Option<u8>,
    /// ISO alpha-2, empty when the service has none
    pub country_code: String,
    /// Display name; from `country_code` when the service omits it
    pub country_name: String,
    /// Service's usage classification
    pub usage_type: String,
    /// Internet service provider
    pub isp: String,
    /// Domain registered for the ISP
    pub domain: String,
    /// Reverse DNS names
    pub hostnames: Vec<String>,
    /// Known Tor exit node
    pub is_tor: Option<bool>,
    /// Reports within the age window
    pub total_reports: Option<u64>,
    /// Distinct reporters within the age window
    pub num_distinct_users: Option<u64>,
    /// Most recent report
    pub last_reported_at: Option<DateTime<Utc>>,
}

impl EnrichmentRecord {
    /// Confidence score, treating a missing score as zero.
    pub fn confidence(&self) -> u8 {
        self.abuse_confidence_score.unwrap_or(0)
    }

    /// Renders the record as one store line keyed by `ip`.
    ///
    /// `ip` is the address as it appeared in the input, which is what the
    /// membership check reads back.
    pub fn to_line(&self, ip: &str) -> String {
        let columns = [
            self.timestamp.format(STORE_TIMESTAMP_FORMAT).to_string(),
            ip.to_string(),
            render_bool(self.is_public),
            render_opt(self.ip_version),
            render_bool(self.is_whitelisted),
            render_opt(self.abuse_confidence_score),
            self.country_code.clone(),
            self.country_name.clone(),
            self.usage_type.clone(),
            self.isp.clone(),
            self.domain.clone(),
            render_hostnames(&self.hostnames),
            render_bool(self.is_tor),
            render_opt(self.total_reports),
            render_opt(self.num_distinct_users),
            self.last_reported_at
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| "None".to_string()),
        ];
        debug_assert_eq!(columns.len(), STORE_COLUMN_COUNT);

        columns
            .iter()
            .map(|c| sanitize_field(c))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Extracts the IP column from a store line.
pub fn ip_column(line: &str) -> Option<&str> {
    line.split(',')
        .nth(STORE_IP_COLUMN)
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
}

// Keeps each record on one line with a fixed column count
fn sanitize_field(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            ',' => ';',
            '\n' | '\r' => ' ',
            other => other,
        })
        .collect()
}

fn render_bool(value: Option<bool>) -> String {
    match value {
        Some(true) => "True".to_string(),
        Some(false) => "False".to_string(),
        None => String::new(),
    }
}

fn render_opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn render_hostnames(hostnames: &[String]) -> String {
    let quoted: Vec<String> = hostnames.iter().map(|h| format!("'{h}'")).collect();
    format!("[{}]", quoted.join(", "))
}
