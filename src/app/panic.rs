//! Panic capture for the error log.
//!
//! The binary runs the enrichment in a spawned task. A panic inside it comes
//! back as a `JoinError`, which becomes `RunError::Unhandled`; the hook
//! installed here keeps the panic location and a backtrace so they can go to
//! the error log next to that error instead of the terminal.

use std::backtrace::Backtrace;
use std::sync::Mutex;

static LAST_PANIC: Mutex<Option<String>> = Mutex::new(None);

/// Replaces the default panic hook with one that records instead of printing.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        record_panic(format!("{info}\n\nBacktrace:\n{}", Backtrace::force_capture()));
    }));
}

/// Takes the report of the most recent panic, if any.
pub fn take_panic_report() -> Option<String> {
    LAST_PANIC
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .take()
}

fn record_panic(report: String) {
    *LAST_PANIC
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(report);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_is_taken_once() {
        record_panic("panicked at src/lib.rs:1:1:\nboom".to_string());

        let report = take_panic_report().expect("report recorded");
        assert!(report.contains("boom"));
        assert!(take_panic_report().is_none());
    }
}
