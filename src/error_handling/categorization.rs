//! Classification of HTTP client errors into lookup failure classes.

use super::types::LookupError;

/// Categorizes a `reqwest::Error` into a `LookupError`.
///
/// Timeouts are checked first since a timed-out body read also reports as a
/// body error. Decode failures mean the service answered with something we
/// cannot map, so they are the only non-fatal class here.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> LookupError {
    if error.is_timeout() {
        return LookupError::Timeout(error.to_string());
    }
    if error.is_decode() {
        return LookupError::Unexpected(error.to_string());
    }
    LookupError::Transport {
        message: error.to_string(),
        status: error.status().map(|s| s.as_u16()),
    }
}
