//! End-of-run statistics logging.

use std::time::Duration;

use log::info;
use strum::IntoEnumIterator;

use crate::error_handling::{FailureStats, LookupFailureKind};
use crate::pipeline::RunOutcome;

/// Logs a one-line run summary followed by the failure breakdown.
pub fn print_run_statistics(outcome: &RunOutcome, stats: &FailureStats, elapsed: Duration) {
    info!("{}", summary_line(outcome, elapsed.as_secs_f64()));
    print_failure_statistics(stats);
}

/// Logs lookup failure counts per kind.
pub fn print_failure_statistics(stats: &FailureStats) {
    for line in failure_lines(stats) {
        info!("{line}");
    }
}

fn summary_line(outcome: &RunOutcome, elapsed_seconds: f64) -> String {
    let total = outcome.appended.len() + outcome.skipped.len() + outcome.failed.len();
    format!(
        "✅ Processed {} IP{} ({} appended, {} skipped, {} failed) in {:.1}s",
        total,
        if total == 1 { "" } else { "s" },
        outcome.appended.len(),
        outcome.skipped.len(),
        outcome.failed.len(),
        elapsed_seconds
    )
}

/// Heading plus one line per kind with a non-zero count; empty without failures.
fn failure_lines(stats: &FailureStats) -> Vec<String> {
    let total_failures = stats.total();
    if total_failures == 0 {
        return Vec::new();
    }

    let mut lines = vec![format!("Lookup Failure Counts ({} total):", total_failures)];
    for kind in LookupFailureKind::iter() {
        let count = stats.get(kind);
        if count > 0 {
            lines.push(format!("   {}: {}", kind.as_str(), count));
        }
    }
    lines
}
