//! Configuration constants.
//!
//! This module defines the constants used throughout the application,
//! including timeouts, default paths, and the persisted store layout.

use std::time::Duration;

/// Per-lookup timeout for the reputation service.
/// A lookup that exceeds this is classified as a timeout and ends the run.
pub const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Default AbuseIPDB API base URL (the `check` endpoint is appended).
pub const DEFAULT_API_BASE_URL: &str = "https://api.abuseipdb.com/api/v2/";

/// Default raw-content host used to pull the store.
pub const DEFAULT_RAW_BASE_URL: &str = "https://raw.githubusercontent.com/";

/// Default local store file.
pub const DEFAULT_STORE_PATH: &str = "ip_data.txt";

/// Default path of the store inside the remote repository.
pub const DEFAULT_REMOTE_PATH: &str = "ip_data.txt";

/// Default branch the store is pulled from and force-pushed to.
pub const DEFAULT_REMOTE_BRANCH: &str = "main";

/// Default git remote name used for pushing.
pub const DEFAULT_GIT_REMOTE: &str = "origin";

/// Default append-only error log.
pub const DEFAULT_ERROR_LOG_PATH: &str = "error_log.txt";

/// Store header row, in persisted column order.
///
/// The remote viewer reads column names from this row, so the order here is
/// the wire contract for every data line.
pub const STORE_HEADER: &str = "timestamp,ipAddress,isPublic,ipVersion,isWhitelisted,abuseConfidenceScore,countryCode,countryName,usageType,isp,domain,hostnames,isTor,totalReports,numDistinctUsers,lastReportedAt";

/// Number of columns in every store line.
pub const STORE_COLUMN_COUNT: usize = 16;

/// Zero-based column holding the IP address.
pub const STORE_IP_COLUMN: usize = 1;

/// Timestamp format for the first store column.
pub const STORE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Placeholder for a country code missing from the lookup table.
pub const COUNTRY_NOT_AVAILABLE: &str = "Not available";

/// Placeholder for skipped-entry fields that could not be backfilled.
pub const NOT_APPLICABLE: &str = "N/A";

// Abuse confidence thresholds used for coloring
/// Scores at or above this are rendered as high risk.
pub const CONFIDENCE_HIGH_THRESHOLD: u8 = 70;
/// Scores at or above this (and below high) are rendered as medium risk.
pub const CONFIDENCE_MEDIUM_THRESHOLD: u8 = 30;

/// Width of the progress bar in characters.
pub const PROGRESS_BAR_WIDTH: usize = 50;

/// User-Agent sent with every request.
pub const USER_AGENT: &str = concat!("ip_ledger/", env!("CARGO_PKG_VERSION"));
