//! IP reputation lookups.
//!
//! This module provides:
//! - The `ReputationLookup` seam the pipeline drives
//! - `AbuseIpDbClient`, the production implementation
//! - Country code to name resolution for responses without a country name

mod client;
mod countries;
mod types;

use async_trait::async_trait;

use crate::error_handling::LookupError;
use crate::store::EnrichmentRecord;

pub use client::AbuseIpDbClient;
pub use countries::country_name;

/// A single-attempt reputation lookup for one IP.
///
/// Implementations must not retry: a failure is reported once and the
/// caller decides whether it ends the run (`LookupError::is_fatal`).
#[async_trait]
pub trait ReputationLookup: Send + Sync {
    /// Looks up `ip` once.
    async fn lookup(&self, ip: &str) -> Result<EnrichmentRecord, LookupError>;
}
