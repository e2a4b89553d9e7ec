//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, default paths, store layout)
//! - CLI option types and parsing

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{ColorChoice, Config, LogFormat, LogLevel, Secret};
