//! Enrichment pipeline.
//!
//! Splits the candidates of a run into already-known and new addresses,
//! looks the new ones up one at a time, and appends each success to the
//! store before the next lookup starts. A network-class failure halts the
//! run with everything appended so far already on disk.

use std::collections::HashSet;

use log::{debug, info, warn};

use crate::config::NOT_APPLICABLE;
use crate::error_handling::{FailureStats, LookupError, RunError};
use crate::parse::CandidateSet;
use crate::report::RunReporter;
use crate::reputation::ReputationLookup;
use crate::store::{EnrichmentRecord, RecordStore};

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Pulling and reading the store
    Loading,
    /// Reading and parsing the input
    Parsing,
    /// Splitting candidates against the store
    Deduping,
    /// Looking up the candidate at this zero-based queue index
    LookingUp(usize),
    /// Fetching display details for skipped addresses
    BackfillingSkipped,
    /// Printing the end-of-run summary
    Summarizing,
    /// Pushing the store
    Syncing,
    /// Done, successfully or not
    Terminal,
}

impl std::fmt::Display for RunPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunPhase::Loading => f.write_str("Loading"),
            RunPhase::Parsing => f.write_str("Parsing"),
            RunPhase::Deduping => f.write_str("Deduping"),
            RunPhase::LookingUp(i) => write!(f, "LookingUp({i})"),
            RunPhase::BackfillingSkipped => f.write_str("BackfillingSkipped"),
            RunPhase::Summarizing => f.write_str("Summarizing"),
            RunPhase::Syncing => f.write_str("Syncing"),
            RunPhase::Terminal => f.write_str("Terminal"),
        }
    }
}

/// Logs a phase transition.
pub fn enter(phase: RunPhase) {
    debug!("Run phase: {phase}");
}

/// A candidate that already had a record and was not looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    /// Candidate address
    pub ip: String,
    /// ISP, `N/A` until known
    pub isp: String,
    /// Country name, `N/A` until known
    pub country: String,
    /// Details came from a record appended earlier in this run
    pub from_this_run: bool,
}

impl SkippedEntry {
    /// Entry for an address the store already had. Backfill fills the details.
    pub fn new(ip: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            isp: NOT_APPLICABLE.to_string(),
            country: NOT_APPLICABLE.to_string(),
            from_this_run: false,
        }
    }

    /// Entry for a repeat of an address appended earlier in this run.
    pub fn from_record(ip: impl Into<String>, record: &EnrichmentRecord) -> Self {
        let or_na = |value: &str| {
            if value.is_empty() {
                NOT_APPLICABLE.to_string()
            } else {
                value.to_string()
            }
        };
        Self {
            ip: ip.into(),
            isp: or_na(&record.isp),
            country: or_na(&record.country_name),
            from_this_run: true,
        }
    }
}

/// A record appended during this run.
#[derive(Debug, Clone)]
pub struct AppendedRecord {
    /// Address as it appeared in the input
    pub ip: String,
    /// The record written to the store
    pub record: EnrichmentRecord,
}

/// A non-fatal per-IP failure.
#[derive(Debug)]
pub struct FailedLookup {
    /// Address whose lookup failed
    pub ip: String,
    /// Why it failed
    pub error: LookupError,
}

/// What a run did, in input order.
#[derive(Debug, Default)]
pub struct RunOutcome {
    /// Records appended to the store
    pub appended: Vec<AppendedRecord>,
    /// Candidates that were not looked up
    pub skipped: Vec<SkippedEntry>,
    /// Non-fatal per-IP failures
    pub failed: Vec<FailedLookup>,
}

/// A run stopped before the lookup queue was exhausted.
#[derive(Debug)]
pub struct HaltedRun {
    /// Everything done before the halt (all of it already persisted)
    pub outcome: RunOutcome,
    /// `RunError::FatalLookup` or `RunError::Store`
    pub cause: RunError,
}

/// Splits candidates into a lookup queue and skipped entries.
///
/// Input order is preserved in both. Repeats of a queued address stay in the
/// queue; the lookup loop skips them once the first occurrence is appended.
pub fn partition(
    candidates: &CandidateSet,
    existing: &HashSet<String>,
) -> (Vec<String>, Vec<SkippedEntry>) {
    let mut queue = Vec::new();
    let mut skipped = Vec::new();
    for ip in candidates {
        if existing.contains(ip) {
            skipped.push(SkippedEntry::new(ip));
        } else {
            queue.push(ip.to_string());
        }
    }
    debug!(
        "Partitioned {} candidates: {} to look up, {} already stored",
        candidates.len(),
        queue.len(),
        skipped.len()
    );
    (queue, skipped)
}

/// Drives lookups against one store.
pub struct EnrichmentPipeline<'a> {
    store: &'a RecordStore,
    lookup: &'a dyn ReputationLookup,
    stats: FailureStats,
}

impl<'a> EnrichmentPipeline<'a> {
    /// Pipeline appending to `store` with results from `lookup`.
    pub fn new(store: &'a RecordStore, lookup: &'a dyn ReputationLookup) -> Self {
        Self {
            store,
            lookup,
            stats: FailureStats::new(),
        }
    }

    /// Failure counts so far.
    pub fn stats(&self) -> &FailureStats {
        &self.stats
    }

    /// Runs dedup and the lookup loop.
    ///
    /// `membership` is the store's IP set; addresses appended here are added
    /// to it.
    ///
    /// # Errors
    ///
    /// Returns a `HaltedRun` on the first network-class lookup failure or the
    /// first failed append. Its outcome holds the records appended before it.
    pub async fn enrich(
        &self,
        candidates: &CandidateSet,
        membership: &mut HashSet<String>,
        reporter: &mut RunReporter,
    ) -> Result<RunOutcome, HaltedRun> {
        enter(RunPhase::Deduping);
        let (queue, skipped) = partition(candidates, membership);
        let mut outcome = RunOutcome {
            skipped,
            ..Default::default()
        };

        let total = queue.len();
        for (i, ip) in queue.into_iter().enumerate() {
            enter(RunPhase::LookingUp(i));
            reporter.progress(i, total);

            if membership.contains(&ip) {
                debug!("{ip} was appended earlier in this run, skipping");
                let entry = outcome
                    .appended
                    .iter()
                    .find(|a| a.ip == ip)
                    .map(|a| SkippedEntry::from_record(&ip, &a.record))
                    .unwrap_or_else(|| SkippedEntry::new(&ip));
                outcome.skipped.push(entry);
                continue;
            }

            match self.lookup.lookup(&ip).await {
                Ok(record) => {
                    if let Err(e) = self.store.append(&ip, &record) {
                        return Err(HaltedRun {
                            outcome,
                            cause: RunError::Store(e),
                        });
                    }
                    reporter.lookup_succeeded(&ip, &record);
                    membership.insert(ip.clone());
                    outcome.appended.push(AppendedRecord { ip, record });
                }
                Err(error) => {
                    self.stats.increment(error.kind());
                    reporter.lookup_failed(&ip, &error);
                    if error.is_fatal() {
                        warn!("Lookup for {ip} failed, stopping run: {error}");
                        let appended = outcome.appended.len();
                        return Err(HaltedRun {
                            outcome,
                            cause: RunError::FatalLookup {
                                ip,
                                appended,
                                source: error,
                            },
                        });
                    }
                    outcome.failed.push(FailedLookup { ip, error });
                }
            }
        }
        reporter.progress(total, total);
        reporter.finish_progress();

        info!(
            "Lookups finished: {} appended, {} skipped, {} failed",
            outcome.appended.len(),
            outcome.skipped.len(),
            outcome.failed.len()
        );
        Ok(outcome)
    }

    /// Fills ISP and country for skipped entries with a fresh lookup.
    ///
    /// Repeats of addresses appended this run already carry their details
    /// and are not looked up again. Nothing is persisted. Any failure,
    /// timeouts included, leaves `N/A`.
    pub async fn backfill_skipped(&self, skipped: &mut [SkippedEntry]) {
        enter(RunPhase::BackfillingSkipped);
        for entry in skipped.iter_mut().filter(|e| !e.from_this_run) {
            match self.lookup.lookup(&entry.ip).await {
                Ok(record) => {
                    if !record.isp.is_empty() {
                        entry.isp = record.isp;
                    }
                    if !record.country_name.is_empty() {
                        entry.country = record.country_name;
                    }
                }
                Err(e) => debug!("Backfill for {} failed: {e}", entry.ip),
            }
        }
    }
}
