//! ip_ledger library: IP reputation enrichment into an append-only ledger
//!
//! This library extracts IPv4 candidates from free-form text, looks each new
//! address up against the AbuseIPDB `check` endpoint, and appends one line per
//! result to a text store that is pulled from and force-pushed to a GitHub
//! repository around every run. Addresses already in the store are skipped, so
//! re-running over the same input resumes where a previous run stopped.
//!
//! # Example
//!
//! ```no_run
//! use ip_ledger::{run_enrichment, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     input: Some(std::path::PathBuf::from("report.txt")),
//!     no_sync: true,
//!     ..Default::default()
//! };
//!
//! let report = run_enrichment(config).await?;
//! println!("{} appended, {} skipped, {} failed",
//!          report.appended, report.skipped, report.failed);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Lookups are awaited one after
//! another; nothing is spawned.

#![warn(missing_docs)]

pub mod app;
pub mod config;
pub mod error_handling;
pub mod initialization;
pub mod parse;
pub mod pipeline;
pub mod report;
pub mod reputation;
pub mod store;
pub mod sync;

// Re-export public API
pub use config::{ColorChoice, Config, LogFormat, LogLevel};
pub use error_handling::RunError;
pub use run::{run_enrichment, run_with, RunReport};

// Internal run module (the top-level orchestration)
mod run {
    use std::path::{Path, PathBuf};
    use std::time::Instant;

    use log::{info, warn};

    use crate::app::{print_failure_statistics, print_run_statistics, read_candidates, InputSource};
    use crate::config::Config;
    use crate::error_handling::{InitializationError, RunError};
    use crate::initialization::{init_client, init_lookup, init_remote};
    use crate::pipeline::{enter, EnrichmentPipeline, RunPhase};
    use crate::report::{Presentation, RunReporter};
    use crate::reputation::ReputationLookup;
    use crate::store::{RecordStore, StoreLock};
    use crate::sync::RemoteStore;

    /// Results of a completed run.
    #[derive(Debug, Clone)]
    pub struct RunReport {
        /// Number of records appended to the store
        pub appended: usize,
        /// Number of candidates that already had a record
        pub skipped: usize,
        /// Number of non-fatal per-IP lookup failures
        pub failed: usize,
        /// Store file the run appended to
        pub store_path: PathBuf,
        /// Whether the store was pushed to the remote
        pub pushed: bool,
        /// Elapsed time in seconds
        pub elapsed_seconds: f64,
    }

    /// Runs one enrichment pass with the provided configuration.
    ///
    /// Builds the HTTP client, reputation client and remote store from
    /// `config`, then delegates to [`run_with`] with a stdout reporter.
    ///
    /// # Errors
    ///
    /// Returns `RunError::Initialization` for missing credentials or
    /// repository settings; see [`run_with`] for the rest.
    pub async fn run_enrichment(config: Config) -> Result<RunReport, RunError> {
        let presentation = Presentation::detect(config.color);
        let http = init_client(&config).map_err(InitializationError::from)?;
        let lookup = init_lookup(http.clone(), &config)?;
        let remote = init_remote(http, &config)?;
        let source = InputSource::from_arg(config.input.as_deref());
        let mut reporter = RunReporter::stdout(presentation);

        run_with(&config, &source, &lookup, remote.as_ref(), &mut reporter).await
    }

    /// Runs one enrichment pass against injected collaborators.
    ///
    /// Sequence: lock the store, pull it, load the membership set, read and
    /// parse the input, look up and append new addresses, backfill skipped
    /// entries, summarize, push. After a fatal lookup failure the store is
    /// still pushed before the error is returned.
    ///
    /// # Errors
    ///
    /// - `RunError::Store` if the store is locked, unreadable or unwritable
    /// - `RunError::SyncUnavailable` if the pull fails
    /// - `RunError::Input` if the input is missing or has no IPs
    /// - `RunError::FatalLookup` on a timeout or transport failure
    pub async fn run_with(
        config: &Config,
        source: &InputSource,
        lookup: &dyn ReputationLookup,
        remote: &dyn RemoteStore,
        reporter: &mut RunReporter,
    ) -> Result<RunReport, RunError> {
        let start_time = Instant::now();
        let _lock = StoreLock::acquire(&config.store_path)?;

        enter(RunPhase::Loading);
        let store_path = remote
            .pull(&config.store_path)
            .await
            .map_err(RunError::SyncUnavailable)?;
        let store = RecordStore::new(store_path);
        store.ensure_exists()?;
        let snapshot = store.load()?;

        enter(RunPhase::Parsing);
        let candidates = read_candidates(source)?;
        info!("Found {} candidate IPs in the input", candidates.len());

        let mut membership = snapshot.existing_ips;
        let pipeline = EnrichmentPipeline::new(&store, lookup);
        let mut outcome = match pipeline
            .enrich(&candidates, &mut membership, reporter)
            .await
        {
            Ok(outcome) => outcome,
            Err(halted) => {
                info!(
                    "Run halted after {} appended records",
                    halted.outcome.appended.len()
                );
                print_failure_statistics(pipeline.stats());
                enter(RunPhase::Syncing);
                push_best_effort(remote, store.path()).await;
                enter(RunPhase::Terminal);
                return Err(halted.cause);
            }
        };

        pipeline.backfill_skipped(&mut outcome.skipped).await;

        enter(RunPhase::Summarizing);
        reporter.summary(&outcome);
        print_run_statistics(&outcome, pipeline.stats(), start_time.elapsed());

        enter(RunPhase::Syncing);
        let pushed = push_best_effort(remote, store.path()).await;
        enter(RunPhase::Terminal);

        Ok(RunReport {
            appended: outcome.appended.len(),
            skipped: outcome.skipped.len(),
            failed: outcome.failed.len(),
            store_path: store.path().to_path_buf(),
            pushed,
            elapsed_seconds: start_time.elapsed().as_secs_f64(),
        })
    }

    /// Pushes the store; a failure is logged and does not fail the run.
    async fn push_best_effort(remote: &dyn RemoteStore, store_path: &Path) -> bool {
        match remote.push(store_path).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to push store {}: {}", store_path.display(), e);
                false
            }
        }
    }
}
