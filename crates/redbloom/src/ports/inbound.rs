//! Inbound Ports (Driving Ports)
//!
//! The operations surrounding code (HTTP handlers, CLIs, jobs) calls on a
//! remote Bloom filter.

use async_trait::async_trait;

use crate::domain::FilterParameters;
use crate::error::FilterError;

/// Remote Bloom filter API (Driving Port)
#[async_trait]
pub trait BloomFilterApi: Send + Sync {
    /// Sizing shared by every writer and reader of this filter layout
    fn parameters(&self) -> &FilterParameters;

    /// Add `element` to the filter `name`, (re)arming its TTL.
    ///
    /// Every call renews the bitmap's expiry, even when the element was
    /// already present.
    ///
    /// # Errors
    /// - `InvalidArgument` for an empty name or element, or a zero TTL
    /// - `StoreUnavailable` if the batched write failed; some bits may have
    ///   been set anyway
    async fn insert(&self, name: &str, element: &[u8], ttl_secs: u64) -> Result<(), FilterError>;

    /// Test whether `element` may be in the filter `name`.
    ///
    /// `false` is authoritative. `true` may be a false positive.
    async fn may_exist(&self, name: &str, element: &[u8]) -> Result<bool, FilterError>;
}
