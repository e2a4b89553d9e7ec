#![allow(dead_code)]

// Shared test helpers for store setup and a fake reputation service.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::io::Write;
use std::path::{Path, PathBuf};

use ip_ledger::config::{Secret, STORE_HEADER};
use ip_ledger::{ColorChoice, Config, LogFormat, LogLevel};
use serde_json::json;
use tempfile::{NamedTempFile, TempDir};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a temporary directory for the store and lock file.
pub fn create_temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

/// Writes `text` to a temporary input file.
pub fn write_input_file(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(text.as_bytes()).expect("Failed to write input");
    file.flush().expect("Failed to flush input");
    file
}

/// Writes a store with a header and one data line per IP.
pub fn write_store(dir: &Path, ips: &[&str]) -> PathBuf {
    let store = dir.join("ip_data.txt");
    let mut content = format!("{STORE_HEADER}\n");
    for ip in ips {
        content.push_str(&format!(
            "2024-01-01 00:00:00,{ip},True,4,False,0,AU,Australia,,APNIC,apnic.net,[],False,1,1,None\n"
        ));
    }
    std::fs::write(&store, content).expect("Failed to write store");
    store
}

/// Data lines of the store (header excluded).
pub fn store_lines(store: &Path) -> Vec<String> {
    std::fs::read_to_string(store)
        .expect("Failed to read store")
        .lines()
        .skip(1)
        .filter(|l| !l.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Config for a local-only run against a mock reputation service.
pub fn create_test_config(store_path: PathBuf, api_base_url: String) -> Config {
    Config {
        store_path,
        api_key: Secret::new("test-api-key"),
        api_base_url,
        timeout_seconds: 2,
        no_sync: true,
        color: ColorChoice::Never,
        log_level: LogLevel::Error,
        log_format: LogFormat::Plain,
        ..Default::default()
    }
}

/// A `check` response body for `ip`.
pub fn check_body(ip: &str, score: u8, isp: &str) -> serde_json::Value {
    json!({
        "data": {
            "ipAddress": ip,
            "isPublic": true,
            "ipVersion": 4,
            "isWhitelisted": false,
            "abuseConfidenceScore": score,
            "countryCode": "DE",
            "usageType": "Data Center/Web Hosting/Transit",
            "isp": isp,
            "domain": "example.net",
            "hostnames": [],
            "isTor": false,
            "totalReports": 3,
            "numDistinctUsers": 2,
            "lastReportedAt": "2024-06-01T08:00:00+00:00"
        }
    })
}

/// Mounts a successful `check` response for `ip`.
pub async fn mount_check(server: &MockServer, ip: &str, score: u8, isp: &str) {
    Mock::given(method("GET"))
        .and(path("/api/v2/check"))
        .and(query_param("ipAddress", ip))
        .respond_with(ResponseTemplate::new(200).set_body_json(check_body(ip, score, isp)))
        .mount(server)
        .await;
}

/// API base URL for `server`.
pub fn api_base(server: &MockServer) -> String {
    format!("{}/api/v2/", server.uri())
}
