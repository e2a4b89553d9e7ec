//! Main application modules.
//!
//! This module provides run input handling, the local error log, panic
//! capture and end-of-run statistics used by the binary and the run
//! orchestrator.

pub mod error_log;
pub mod input;
pub mod panic;
pub mod statistics;

// Re-export public API
pub use error_log::append_error_log;
pub use input::{prompt_for_candidates, read_candidates, InputSource};
pub use panic::{install_panic_hook, take_panic_report};
pub use statistics::{print_failure_statistics, print_run_statistics};
