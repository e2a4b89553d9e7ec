//! Append-only local error log.
//!
//! The terminal gets one line per fatal error; the full source chain goes
//! here with a timestamp, followed by the panic backtrace when there is one.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use chrono::Local;

/// Appends `error` and its source chain to the log at `path`.
///
/// `trace` is written after the chain, indented, when present.
///
/// # Errors
///
/// Returns the I/O error if the log cannot be opened or written.
pub fn append_error_log(
    path: &Path,
    error: &dyn std::error::Error,
    trace: Option<&str>,
) -> std::io::Result<()> {
    let mut entry = format!(
        "\n\nError at {}:\n{}",
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        error
    );
    let mut source = error.source();
    while let Some(cause) = source {
        entry.push_str(&format!("\n  caused by: {cause}"));
        source = cause.source();
    }
    if let Some(trace) = trace {
        entry.push_str("\n  panic:");
        for line in trace.lines() {
            entry.push_str("\n    ");
            entry.push_str(line);
        }
    }
    entry.push('\n');

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(entry.as_bytes())?;
    file.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::{LookupError, RunError};
    use tempfile::TempDir;

    #[test]
    fn test_append_error_log_writes_chain() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("error_log.txt");
        let error = RunError::FatalLookup {
            ip: "8.8.8.8".into(),
            appended: 0,
            source: LookupError::Timeout("operation timed out".into()),
        };

        append_error_log(&path, &error, None).expect("first entry");
        append_error_log(&path, &error, None).expect("second entry");

        let log = std::fs::read_to_string(&path).expect("read");
        assert_eq!(log.matches("Error at ").count(), 2);
        assert!(log.contains("8.8.8.8 - Timeout error occurred: operation timed out"));
        assert!(log.contains("caused by: Timeout error occurred"));
        assert!(!log.contains("panic:"));
    }

    #[test]
    fn test_append_error_log_writes_panic_trace() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("error_log.txt");
        let error = RunError::from(anyhow::anyhow!("Run task panicked: index out of bounds"));
        let trace = "panicked at src/pipeline/mod.rs:10:5:\nindex out of bounds\n\nBacktrace:\n   0: ip_ledger::pipeline";

        append_error_log(&path, &error, Some(trace)).expect("entry");

        let log = std::fs::read_to_string(&path).expect("read");
        assert!(log.contains("Run task panicked: index out of bounds"));
        assert!(log.contains("\n  panic:\n    panicked at src/pipeline/mod.rs:10:5:"));
        assert!(log.contains("\n    Backtrace:"));
        assert!(log.ends_with("0: ip_ledger::pipeline\n"));
    }
}
