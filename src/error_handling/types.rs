//! Error type definitions.
//!
//! This module defines the error enums used by each component, plus the
//! top-level `RunError` the orchestrator returns to the binary.

use std::path::PathBuf;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// A required setting is missing or malformed.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Error types for the persisted record store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store could not be read or written.
    #[error("Store unavailable at {path}: {source}")]
    Unavailable {
        /// Store file
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Another run holds the store lock.
    #[error("Store {0} is locked by another run")]
    Locked(PathBuf),
}

/// Error types for input parsing.
#[derive(Error, Debug)]
pub enum InputError {
    /// The text contained no dotted-quad addresses.
    #[error("No valid IP addresses found in the input")]
    NoIpsFound,

    /// The input file does not exist.
    #[error("File not found at {0}")]
    NotFound(PathBuf),

    /// The input could not be read.
    #[error("Error reading input: {0}")]
    Read(#[from] std::io::Error),
}

/// Error types for a single reputation lookup.
#[derive(Error, Debug)]
pub enum LookupError {
    /// The request exceeded the lookup timeout.
    #[error("Timeout error occurred: {0}")]
    Timeout(String),

    /// Connection, DNS, non-2xx status, or body transfer failure.
    #[error("Request error occurred: {message}")]
    Transport {
        /// Client error text
        message: String,
        /// HTTP status, when the service answered
        status: Option<u16>,
    },

    /// The service answered but the response could not be mapped.
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

impl LookupError {
    /// Network-class failures end the run; everything else is per-IP.
    pub fn is_fatal(&self) -> bool {
        matches!(self, LookupError::Timeout(_) | LookupError::Transport { .. })
    }

    /// Returns the failure kind used for statistics.
    pub fn kind(&self) -> LookupFailureKind {
        match self {
            LookupError::Timeout(_) => LookupFailureKind::Timeout,
            LookupError::Transport {
                status: Some(429), ..
            } => LookupFailureKind::TooManyRequests,
            LookupError::Transport {
                status: Some(401 | 403),
                ..
            } => LookupFailureKind::Unauthorized,
            LookupError::Transport {
                status: Some(_), ..
            } => LookupFailureKind::HttpStatus,
            LookupError::Transport { status: None, .. } => LookupFailureKind::Connection,
            LookupError::Unexpected(_) => LookupFailureKind::Unexpected,
        }
    }
}

/// Error types for the remote store transport.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Fetching the latest store failed.
    #[error("Error downloading store from {url}: {message}")]
    Pull {
        /// Raw-content URL that was fetched
        url: String,
        /// Client or status error text
        message: String,
    },

    /// Writing the pulled store locally failed.
    #[error("Error saving pulled store to {path}: {source}")]
    Save {
        /// Local store path
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// A git step of the push sequence failed.
    #[error("git {step} failed: {message}")]
    Git {
        /// Git subcommand that failed
        step: &'static str,
        /// Stderr of the failed command
        message: String,
    },
}

/// Terminal failure of a run, as returned to the binary.
#[derive(Error, Debug)]
pub enum RunError {
    /// Client or configuration setup failed.
    #[error(transparent)]
    Initialization(#[from] InitializationError),

    /// The store is locked, unreadable or unwritable.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The pull before the run failed.
    #[error("Remote store unavailable: {0}")]
    SyncUnavailable(#[source] SyncError),

    /// The input is missing or has no addresses.
    #[error(transparent)]
    Input(#[from] InputError),

    /// A network-class lookup failure stopped the run after `appended` records.
    #[error("{ip} - {source}")]
    FatalLookup {
        /// Address whose lookup failed
        ip: String,
        /// Records appended before the failure
        appended: usize,
        /// The lookup failure
        #[source]
        source: LookupError,
    },

    /// Anything else, including a panic in the run task.
    #[error(transparent)]
    Unhandled(#[from] anyhow::Error),
}

impl From<tokio::task::JoinError> for RunError {
    fn from(error: tokio::task::JoinError) -> Self {
        if !error.is_panic() {
            return RunError::Unhandled(anyhow::anyhow!("Run task did not complete: {error}"));
        }
        let payload = error.into_panic();
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        RunError::Unhandled(anyhow::anyhow!("Run task panicked: {message}"))
    }
}

impl RunError {
    /// Process exit status for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunError::FatalLookup { .. } | RunError::Unhandled(_) => 1,
            RunError::Initialization(_) => 1,
            RunError::SyncUnavailable(_) => 2,
            RunError::Store(_) => 3,
            RunError::Input(_) => 4,
        }
    }
}

/// Lookup failure categories tracked in run statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum LookupFailureKind {
    /// Request timed out
    Timeout,
    /// No HTTP response at all
    Connection,
    /// HTTP 429
    TooManyRequests,
    /// HTTP 401 or 403
    Unauthorized,
    /// Any other non-2xx status
    HttpStatus,
    /// Response could not be mapped
    Unexpected,
}

impl std::fmt::Display for LookupFailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl LookupFailureKind {
    /// Label used in the failure statistics.
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupFailureKind::Timeout => "Lookup timeout",
            LookupFailureKind::Connection => "Connection error",
            LookupFailureKind::TooManyRequests => "Too many requests (429)",
            LookupFailureKind::Unauthorized => "Unauthorized (401/403)",
            LookupFailureKind::HttpStatus => "HTTP status error",
            LookupFailureKind::Unexpected => "Unexpected response",
        }
    }
}
