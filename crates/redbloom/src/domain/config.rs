//! Filter configuration and validation
//!
//! # Example
//!
//! ```
//! use redbloom::domain::{BloomConfigBuilder, MatchPolicy};
//!
//! let config = BloomConfigBuilder::new()
//!     .expected_elements(10_000)
//!     .target_fpp(0.01)
//!     .key_prefix("bf:")
//!     .match_policy(MatchPolicy::AllBitsSet)
//!     .build()
//!     .expect("valid config");
//! assert_eq!(config.expected_elements, 10_000);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::FilterError;

/// Namespace prepended to every filter name to form its bitmap key
pub const DEFAULT_KEY_PREFIX: &str = "bf:";

/// One day
pub const DEFAULT_TTL_SECS: u64 = 60 * 60 * 24;

/// How `may_exist` folds the bits read back from the store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Possibly present if any probed bit is set.
    ///
    /// This is the rule existing deployments of this filter answer with, so
    /// it stays the default for readers sharing their bitmaps.
    #[default]
    AnyBitSet,
    /// Possibly present only if every probed bit is set (classic Bloom rule).
    AllBitsSet,
}

impl MatchPolicy {
    /// Fold the probed bits into a membership answer.
    pub fn matches(self, bits: &[bool]) -> bool {
        match self {
            MatchPolicy::AnyBitSet => bits.iter().any(|&bit| bit),
            MatchPolicy::AllBitsSet => !bits.is_empty() && bits.iter().all(|&bit| bit),
        }
    }
}

/// Remote Bloom filter configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BloomConfig {
    /// Planned capacity (n)
    pub expected_elements: u64,
    /// Tolerated false positive probability, within [0, 1)
    pub target_fpp: f64,
    /// Prefix namespacing bitmap keys in the shared store
    pub key_prefix: String,
    /// TTL used by callers that do not pick their own
    pub default_ttl_secs: u64,
    pub match_policy: MatchPolicy,
}

impl Default for BloomConfig {
    fn default() -> Self {
        Self {
            expected_elements: 3000,
            target_fpp: 0.03,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            default_ttl_secs: DEFAULT_TTL_SECS,
            match_policy: MatchPolicy::AnyBitSet,
        }
    }
}

impl BloomConfig {
    /// Validate the configuration.
    ///
    /// Sizing itself (bitmap length, hash count) is checked when the filter
    /// is constructed; this only rejects values no filter could use.
    pub fn validate(&self) -> Result<(), FilterError> {
        if self.expected_elements == 0 {
            return Err(FilterError::InvalidConfig(
                "expected_elements cannot be 0".to_string(),
            ));
        }

        if self.target_fpp.is_nan() || !(0.0..1.0).contains(&self.target_fpp) {
            return Err(FilterError::InvalidConfig(format!(
                "target_fpp must be within [0, 1), got {}",
                self.target_fpp
            )));
        }

        if self.default_ttl_secs == 0 {
            return Err(FilterError::InvalidConfig(
                "default_ttl_secs cannot be 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Builder-style method to set the key prefix
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Builder-style method to set the match policy
    pub fn with_match_policy(mut self, policy: MatchPolicy) -> Self {
        self.match_policy = policy;
        self
    }
}

/// Fluent builder for [`BloomConfig`]; unset fields take the defaults.
#[derive(Default)]
pub struct BloomConfigBuilder {
    expected_elements: Option<u64>,
    target_fpp: Option<f64>,
    key_prefix: Option<String>,
    default_ttl_secs: Option<u64>,
    match_policy: Option<MatchPolicy>,
}

impl BloomConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expected_elements(mut self, n: u64) -> Self {
        self.expected_elements = Some(n);
        self
    }

    pub fn target_fpp(mut self, fpp: f64) -> Self {
        self.target_fpp = Some(fpp);
        self
    }

    pub fn key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    pub fn default_ttl_secs(mut self, secs: u64) -> Self {
        self.default_ttl_secs = Some(secs);
        self
    }

    pub fn match_policy(mut self, policy: MatchPolicy) -> Self {
        self.match_policy = Some(policy);
        self
    }

    /// Build the configuration, validating all fields
    pub fn build(self) -> Result<BloomConfig, FilterError> {
        let defaults = BloomConfig::default();

        let config = BloomConfig {
            expected_elements: self.expected_elements.unwrap_or(defaults.expected_elements),
            target_fpp: self.target_fpp.unwrap_or(defaults.target_fpp),
            key_prefix: self.key_prefix.unwrap_or(defaults.key_prefix),
            default_ttl_secs: self.default_ttl_secs.unwrap_or(defaults.default_ttl_secs),
            match_policy: self.match_policy.unwrap_or(defaults.match_policy),
        };

        config.validate()?;
        Ok(config)
    }
}
