//! Candidate IP extraction from free-form text.
//!
//! Any text is accepted: log excerpts, threat reports, pasted tables. Every
//! dotted-quad substring is a candidate. Octets are not range-checked, so
//! `999.999.999.999` is a candidate too; the reputation service answers it
//! with an HTTP error, which ends the run. Duplicates are kept in input order; deduplication
//! happens against the store, not here.

use std::sync::LazyLock;

use regex::Regex;

use crate::error_handling::InputError;

static IPV4_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:\d{1,3}\.){3}\d{1,3}\b").expect("IPv4 pattern is a valid regex")
});

/// The candidate IPs of one run, in first-occurrence order.
///
/// Iterating does not consume the set, so it can be walked again (e.g. for
/// partitioning and again for reporting).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSet {
    ips: Vec<String>,
}

impl CandidateSet {
    /// Candidates in input order, repeats included.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.ips.iter().map(String::as_str)
    }

    /// Number of candidates, repeats included.
    pub fn len(&self) -> usize {
        self.ips.len()
    }

    /// True when no candidates were found.
    pub fn is_empty(&self) -> bool {
        self.ips.is_empty()
    }
}

impl<'a> IntoIterator for &'a CandidateSet {
    type Item = &'a str;
    type IntoIter = std::iter::Map<std::slice::Iter<'a, String>, fn(&String) -> &str>;

    fn into_iter(self) -> Self::IntoIter {
        self.ips.iter().map(String::as_str as fn(&String) -> &str)
    }
}

/// Extracts candidate IPs from `raw_text`.
///
/// # Errors
///
/// Returns `InputError::NoIpsFound` if the text contains no dotted-quad.
pub fn parse_ips(raw_text: &str) -> Result<CandidateSet, InputError> {
    let ips: Vec<String> = IPV4_PATTERN
        .find_iter(raw_text)
        .map(|m| m.as_str().to_string())
        .collect();

    if ips.is_empty() {
        return Err(InputError::NoIpsFound);
    }
    log::debug!("Parsed {} candidate IPs", ips.len());
    Ok(CandidateSet { ips })
}
