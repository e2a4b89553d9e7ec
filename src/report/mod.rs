//! Run reporting.
//!
//! Renders a live progress line while lookups run, one line per lookup
//! result, and the end-of-run summary. Owns no state beyond the current run
//! and never touches the store.

mod presentation;

use std::io::Write;

use crate::config::PROGRESS_BAR_WIDTH;
use crate::error_handling::LookupError;
use crate::pipeline::RunOutcome;
use crate::store::EnrichmentRecord;

pub use presentation::{confidence_tone, Presentation, Tone};

/// Terminal reporter for one run.
pub struct RunReporter {
    presentation: Presentation,
    out: Box<dyn Write + Send>,
    progress_visible: bool,
}

impl RunReporter {
    /// Reporter writing to stdout.
    pub fn stdout(presentation: Presentation) -> Self {
        Self::new(presentation, Box::new(std::io::stdout()))
    }

    /// Reporter writing to `out`.
    pub fn new(presentation: Presentation, out: Box<dyn Write + Send>) -> Self {
        Self {
            presentation,
            out,
            progress_visible: false,
        }
    }

    /// Redraws the progress line: `done` of `total` candidates handled.
    pub fn progress(&mut self, done: usize, total: usize) {
        let line = render_progress(done, total, PROGRESS_BAR_WIDTH);
        let bar = self.presentation.paint(&line, Tone::Success);
        let _ = write!(self.out, "\rIP Lookup {bar} Complete");
        let _ = self.out.flush();
        self.progress_visible = true;
    }

    /// Announces a successful lookup.
    pub fn lookup_succeeded(&mut self, ip: &str, record: &EnrichmentRecord) {
        self.clear_progress();
        let p = self.presentation;
        let tone = confidence_tone(record.confidence());
        let total_reports = record
            .total_reports
            .map(|n| n.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        let _ = writeln!(
            self.out,
            "[{}] {} - AbuseConfidence: {}% - Country Name: {} - Total Reports: {}",
            p.paint("SUCCESS", Tone::Success),
            ip,
            p.paint(&record.confidence().to_string(), tone),
            p.paint(&record.country_name, Tone::Info),
            p.paint(&total_reports, Tone::Accent),
        );
    }

    /// Announces a lookup that failed.
    pub fn lookup_failed(&mut self, ip: &str, error: &LookupError) {
        self.clear_progress();
        let _ = writeln!(
            self.out,
            "[{}] {} - {}",
            self.presentation.paint("FAILED", Tone::Danger),
            ip,
            self.presentation.paint(&error.to_string(), Tone::Danger),
        );
    }

    /// Ends the progress line so later output starts on a fresh line.
    pub fn finish_progress(&mut self) {
        self.clear_progress();
    }

    /// Renders the end-of-run summary.
    pub fn summary(&mut self, outcome: &RunOutcome) {
        self.clear_progress();
        let p = self.presentation;
        let rule = "-".repeat(50);

        let _ = writeln!(self.out, "\nSummary of Appended Information:");
        for appended in &outcome.appended {
            let record = &appended.record;
            let whitelisted = match record.is_whitelisted {
                Some(true) => "True",
                Some(false) => "False",
                None => "N/A",
            };
            let _ = writeln!(self.out, "\nIP Address: {}", appended.ip);
            let _ = writeln!(
                self.out,
                "AbuseConfidence: {}",
                p.paint(
                    &record.confidence().to_string(),
                    confidence_tone(record.confidence())
                )
            );
            let _ = writeln!(
                self.out,
                "Whitelisted: {}",
                p.paint(whitelisted, Tone::Success)
            );
            let _ = writeln!(self.out, "\n{rule}");
        }

        let _ = writeln!(self.out, "\nSummary of Skipped IPs:");
        for skipped in &outcome.skipped {
            let _ = writeln!(
                self.out,
                "\n[{}] IP Address: {}",
                p.paint("SKIPPED", Tone::Warning),
                skipped.ip
            );
            let _ = writeln!(self.out, "ISP: {}", skipped.isp);
            let _ = writeln!(self.out, "Country: {}", skipped.country);
        }

        if !outcome.failed.is_empty() {
            let _ = writeln!(self.out, "\nFailed Lookups:");
            for failed in &outcome.failed {
                let _ = writeln!(
                    self.out,
                    "[{}] {} - {}",
                    p.paint("FAILED", Tone::Danger),
                    failed.ip,
                    failed.error
                );
            }
        }

        let _ = writeln!(self.out, "\nSummary:");
        for line in render_count_table(&[
            ("Appended", outcome.appended.len()),
            ("Skipped", outcome.skipped.len()),
            ("Failed", outcome.failed.len()),
        ]) {
            let _ = writeln!(self.out, "{line}");
        }
        let _ = self.out.flush();
    }

    fn clear_progress(&mut self) {
        if self.progress_visible {
            let _ = writeln!(self.out);
            self.progress_visible = false;
        }
    }
}

fn render_progress(done: usize, total: usize, width: usize) -> String {
    let (percent, filled) = if total == 0 {
        (100.0, width)
    } else {
        let done = done.min(total);
        (
            100.0 * done as f64 / total as f64,
            width * done / total,
        )
    };
    format!(
        "|{}{}| {:.1}%",
        "█".repeat(filled),
        "-".repeat(width - filled),
        percent
    )
}

fn render_count_table(rows: &[(&str, usize)]) -> Vec<String> {
    let label_width = rows.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
    let value_width = rows
        .iter()
        .map(|(_, v)| v.to_string().len())
        .max()
        .unwrap_or(1);
    let border = format!("+{}+{}+", "-".repeat(label_width + 2), "-".repeat(value_width + 2));

    let mut lines = vec![border.clone()];
    for (label, value) in rows {
        lines.push(format!(
            "| {label:<label_width$} | {value:>value_width$} |"
        ));
    }
    lines.push(border);
    lines
}
