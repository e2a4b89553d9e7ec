//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `ip_ledger` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - Panic capture, the one-line fatal diagnostic, the error log and the
//!   exit status
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use ip_ledger::app::{append_error_log, install_panic_hook, take_panic_report};
use ip_ledger::initialization::init_logger_with;
use ip_ledger::report::{Presentation, Tone};
use ip_ledger::{run_enrichment, Config, RunError};

#[tokio::main]
async fn main() -> Result<()> {
    // Credentials usually live in .env; try the current directory first,
    // then next to the executable
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let config = Config::parse();
    let presentation = Presentation::detect(config.color);
    presentation.apply();

    init_logger_with(config.log_level.into(), config.log_format)
        .context("Failed to initialize logger")?;

    let error_log = config.error_log.clone();
    install_panic_hook();
    let result = match tokio::spawn(run_enrichment(config)).await {
        Ok(result) => result,
        Err(join_error) => Err(RunError::from(join_error)),
    };

    match result {
        Ok(report) => {
            println!(
                "{}: {} appended, {} skipped, {} failed in {:.1}s{}",
                presentation.paint("SUCCESS", Tone::Success),
                report.appended,
                report.skipped,
                report.failed,
                report.elapsed_seconds,
                if report.pushed { "" } else { " (store not pushed)" }
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("{}: {}", presentation.paint("ERROR", Tone::Danger), e);
            let trace = take_panic_report();
            if let Err(log_err) = append_error_log(&error_log, &e, trace.as_deref()) {
                log::warn!(
                    "Could not write error log {}: {}",
                    error_log.display(),
                    log_err
                );
            }
            process::exit(e.exit_code());
        }
    }
}
