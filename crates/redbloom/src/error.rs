//! Error types for the remote Bloom filter

use thiserror::Error;

/// Errors surfaced by filter construction and by `insert` / `may_exist`
#[derive(Debug, Error)]
pub enum FilterError {
    /// Caller error: empty filter name, empty element, zero TTL
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Degenerate sizing inputs; the filter cannot be constructed
    #[error("Invalid filter sizing (n={expected_elements}, fpp={fpp}): {reason}")]
    Sizing {
        expected_elements: u64,
        fpp: f64,
        reason: String,
    },

    /// A `BloomConfig` value no filter could use
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The bit store failed; the batch may have been partially applied
    #[error("Bit store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
}

impl FilterError {
    pub(crate) fn sizing(expected_elements: u64, fpp: f64, reason: impl Into<String>) -> Self {
        FilterError::Sizing {
            expected_elements,
            fpp,
            reason: reason.into(),
        }
    }

    /// Whether the caller may reasonably retry the same call later
    pub fn is_transient(&self) -> bool {
        matches!(self, FilterError::StoreUnavailable(_))
    }
}

/// Errors from a bit store round trip
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Timeout")]
    Timeout,

    #[error("Protocol error: {0}")]
    Protocol(String),
}
