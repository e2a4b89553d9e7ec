//! Configuration types and CLI options.
//!
//! This module defines the `Config` struct (parsed from the command line and
//! environment) and the enums used by it.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_ERROR_LOG_PATH, DEFAULT_GIT_REMOTE, DEFAULT_RAW_BASE_URL,
    DEFAULT_REMOTE_BRANCH, DEFAULT_REMOTE_PATH, DEFAULT_STORE_PATH, LOOKUP_TIMEOUT,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// When to color reporter output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Color when stdout is a terminal and `NO_COLOR` is unset
    Auto,
    /// Always emit ANSI colors
    Always,
    /// Never emit ANSI colors
    Never,
}

/// A credential that never shows up in `Debug` output or logs.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    /// Wraps a credential.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw value, for request headers only.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// True when unset or whitespace.
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl std::str::FromStr for Secret {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

/// Application configuration.
///
/// Parsed from command-line flags with environment-variable fallbacks (a `.env`
/// file is loaded by the binary before parsing). It can also be constructed
/// programmatically.
///
/// # Examples
///
/// ```no_run
/// use ip_ledger::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     input: Some(PathBuf::from("iocs.txt")),
///     no_sync: true,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "ip_ledger",
    version,
    about = "Enrich IP addresses with AbuseIPDB reputation data and append them to a synced ledger"
)]
pub struct Config {
    /// Text file to extract IP addresses from (`-` for stdin). Prompted for when omitted.
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Local store file (append-only ledger)
    #[arg(long, value_name = "FILE", env = "IP_LEDGER_STORE", default_value = DEFAULT_STORE_PATH)]
    pub store_path: PathBuf,

    /// Append-only log receiving full error chains
    #[arg(long, value_name = "FILE", default_value = DEFAULT_ERROR_LOG_PATH)]
    pub error_log: PathBuf,

    /// AbuseIPDB API key
    #[arg(long, env = "ABUSEIPDB_API_KEY", hide_env_values = true, default_value = "")]
    pub api_key: Secret,

    /// AbuseIPDB API base URL
    #[arg(long, env = "ABUSEIPDB_BASE_URL", default_value = DEFAULT_API_BASE_URL)]
    pub api_base_url: String,

    /// Only consider reports newer than this many days (service default when omitted)
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..=365))]
    pub max_age_days: Option<u16>,

    /// Per-lookup timeout in seconds
    #[arg(long, default_value_t = LOOKUP_TIMEOUT.as_secs())]
    pub timeout_seconds: u64,

    /// Owner of the remote repository holding the store
    #[arg(long, env = "IP_LEDGER_REPO_OWNER", default_value = "")]
    pub repo_owner: String,

    /// Name of the remote repository holding the store
    #[arg(long, env = "IP_LEDGER_REPO_NAME", default_value = "")]
    pub repo_name: String,

    /// Path of the store inside the remote repository
    #[arg(long, env = "IP_LEDGER_REPO_PATH", default_value = DEFAULT_REMOTE_PATH)]
    pub repo_path: String,

    /// Branch to pull from and force-push to
    #[arg(long, env = "IP_LEDGER_REPO_BRANCH", default_value = DEFAULT_REMOTE_BRANCH)]
    pub repo_branch: String,

    /// Git remote name used for pushing
    #[arg(long, default_value = DEFAULT_GIT_REMOTE)]
    pub git_remote: String,

    /// Raw-content host the store is pulled from
    #[arg(long, env = "IP_LEDGER_RAW_BASE_URL", default_value = DEFAULT_RAW_BASE_URL)]
    pub raw_base_url: String,

    /// User for authenticated raw-content pulls
    #[arg(long, env = "GITHUB_USER")]
    pub remote_user: Option<String>,

    /// Token for authenticated raw-content pulls
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub remote_token: Option<Secret>,

    /// Work on the local store only (no pull, no push)
    #[arg(long)]
    pub no_sync: bool,

    /// When to color terminal output
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: None,
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            error_log: PathBuf::from(DEFAULT_ERROR_LOG_PATH),
            api_key: Secret::default(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            max_age_days: None,
            timeout_seconds: LOOKUP_TIMEOUT.as_secs(),
            repo_owner: String::new(),
            repo_name: String::new(),
            repo_path: DEFAULT_REMOTE_PATH.to_string(),
            repo_branch: DEFAULT_REMOTE_BRANCH.to_string(),
            git_remote: DEFAULT_GIT_REMOTE.to_string(),
            raw_base_url: DEFAULT_RAW_BASE_URL.to_string(),
            remote_user: None,
            remote_token: None,
            no_sync: false,
            color: ColorChoice::Auto,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}

impl Config {
    /// Returns the directory git commands run in (the store's parent).
    pub fn repo_dir(&self) -> PathBuf {
        match self.store_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_secret_debug_is_redacted() {
        let secret = Secret::new("super-secret-key");
        let rendered = format!("{:?}", secret);
        assert_eq!(rendered, "[REDACTED]");
        assert_eq!(secret.expose(), "super-secret-key");
    }

    #[test]
    fn test_config_debug_does_not_leak_credentials() {
        let config = Config {
            api_key: Secret::new("abc123"),
            remote_token: Some(Secret::new("ghp_token")),
            ..Default::default()
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("abc123"));
        assert!(!rendered.contains("ghp_token"));
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.timeout_seconds, 10);
        assert_eq!(config.store_path, PathBuf::from("ip_data.txt"));
        assert_eq!(config.repo_branch, "main");
        assert!(!config.no_sync);
        assert!(config.api_key.is_empty());
    }

    #[test]
    fn test_config_parses_cli_flags() {
        let config = Config::try_parse_from([
            "ip_ledger",
            "--input",
            "iocs.txt",
            "--store-path",
            "data/ip_data.txt",
            "--no-sync",
            "--color",
            "never",
            "--api-key",
            "k",
        ])
        .expect("flags should parse");
        assert_eq!(config.input, Some(PathBuf::from("iocs.txt")));
        assert_eq!(config.store_path, PathBuf::from("data/ip_data.txt"));
        assert!(config.no_sync);
        assert_eq!(config.color, ColorChoice::Never);
        assert_eq!(config.api_key.expose(), "k");
    }

    #[test]
    fn test_max_age_days_out_of_range_rejected() {
        let result = Config::try_parse_from(["ip_ledger", "--max-age-days", "400"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_repo_dir_defaults_to_current_dir() {
        let config = Config::default();
        assert_eq!(config.repo_dir(), PathBuf::from("."));

        let nested = Config {
            store_path: PathBuf::from("ledger/ip_data.txt"),
            ..Default::default()
        };
        assert_eq!(nested.repo_dir(), PathBuf::from("ledger"));
    }
}
