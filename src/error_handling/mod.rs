//! Error handling and failure statistics.
//!
//! This module provides:
//! - Error type definitions for every component and for the run as a whole
//! - Classification of HTTP client errors into fatal and per-IP classes
//! - Failure statistics tracking
//!
//! Lookup failures fall into two classes:
//! - **Fatal**: timeouts and transport failures end the run after a push
//! - **Per-IP**: unexpected responses are logged and the run continues

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::categorize_reqwest_error;
pub use stats::FailureStats;
pub use types::{
    InitializationError, InputError, LookupError, LookupFailureKind, RunError, StoreError,
    SyncError,
};
