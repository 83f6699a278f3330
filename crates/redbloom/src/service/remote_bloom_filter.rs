//! Remote Bloom Filter Service
//!
//! Composes sizing and offset generation with a [`BitStore`]: each call
//! computes the element's offsets once and sends them in a single batch.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::domain::{bit_offsets, bitmap_key, BitBatch, BloomConfig, FilterParameters};
use crate::error::{FilterError, StoreError};
use crate::metrics::{MetricsRecorder, NoOpMetrics};
use crate::ports::{BitStore, BloomFilterApi};

/// Bloom filter whose bitmap lives in a remote bit store.
///
/// Holds only immutable sizing; the bitmap itself is shared state owned by
/// the store and may be written concurrently by other processes.
pub struct RemoteBloomFilter<S: BitStore> {
    /// Bit store holding the bitmaps (driven port)
    store: Arc<S>,
    params: FilterParameters,
    config: BloomConfig,
    metrics: Arc<dyn MetricsRecorder>,
}

impl<S: BitStore + 'static> RemoteBloomFilter<S> {
    /// Size a filter for `expected_elements` at false positive probability
    /// `fpp`, with the default key prefix and match policy.
    ///
    /// # Errors
    /// `FilterError::Sizing` if the inputs give a degenerate bitmap.
    pub fn new(store: Arc<S>, expected_elements: u64, fpp: f64) -> Result<Self, FilterError> {
        let params = FilterParameters::new(expected_elements, fpp)?;
        let config = BloomConfig {
            expected_elements,
            target_fpp: fpp,
            ..BloomConfig::default()
        };
        Ok(Self::from_parts(store, params, config))
    }

    /// Create from a full configuration.
    pub fn with_config(store: Arc<S>, config: BloomConfig) -> Result<Self, FilterError> {
        config.validate()?;
        let params = FilterParameters::new(config.expected_elements, config.target_fpp)?;
        Ok(Self::from_parts(store, params, config))
    }

    fn from_parts(store: Arc<S>, params: FilterParameters, config: BloomConfig) -> Self {
        info!(
            expected_elements = params.expected_elements(),
            fpp = params.false_positive_probability(),
            bitmap_length = params.bitmap_length(),
            hash_functions = params.hash_functions(),
            key_prefix = %config.key_prefix,
            "Remote bloom filter sized"
        );
        Self {
            store,
            params,
            config,
            metrics: Arc::new(NoOpMetrics),
        }
    }

    /// Report operations to `metrics`
    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsRecorder>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn config(&self) -> &BloomConfig {
        &self.config
    }

    /// Store key of the bitmap backing filter `name`
    pub fn bitmap_key(&self, name: &str) -> String {
        bitmap_key(&self.config.key_prefix, name)
    }

    /// Bit offsets `element` maps to under this filter's sizing
    pub fn offsets(&self, element: &[u8]) -> Vec<u64> {
        bit_offsets(
            element,
            self.params.hash_functions(),
            self.params.bitmap_length(),
        )
    }

    /// Insert a string element (hashed as its UTF-8 bytes).
    pub async fn insert_str(
        &self,
        name: &str,
        element: &str,
        ttl_secs: u64,
    ) -> Result<(), FilterError> {
        self.insert(name, element.as_bytes(), ttl_secs).await
    }

    /// Insert with the configured default TTL.
    pub async fn insert_with_default_ttl(
        &self,
        name: &str,
        element: &[u8],
    ) -> Result<(), FilterError> {
        self.insert(name, element, self.config.default_ttl_secs).await
    }

    /// Test a string element (hashed as its UTF-8 bytes).
    pub async fn may_exist_str(&self, name: &str, element: &str) -> Result<bool, FilterError> {
        self.may_exist(name, element.as_bytes()).await
    }

    fn store_failure(&self, key: &str, err: StoreError) -> FilterError {
        warn!(key = %key, error = %err, "Bit store request failed");
        self.metrics.record_store_failure();
        FilterError::StoreUnavailable(err)
    }
}

fn validate_arguments(name: &str, element: &[u8]) -> Result<(), FilterError> {
    if name.is_empty() {
        return Err(FilterError::InvalidArgument(
            "filter name must not be empty".to_string(),
        ));
    }
    if element.is_empty() {
        return Err(FilterError::InvalidArgument(
            "element must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[async_trait]
impl<S: BitStore + 'static> BloomFilterApi for RemoteBloomFilter<S> {
    fn parameters(&self) -> &FilterParameters {
        &self.params
    }

    async fn insert(&self, name: &str, element: &[u8], ttl_secs: u64) -> Result<(), FilterError> {
        validate_arguments(name, element)?;
        if ttl_secs == 0 {
            return Err(FilterError::InvalidArgument(
                "ttl must be at least one second".to_string(),
            ));
        }

        let key = self.bitmap_key(name);
        let offsets = self.offsets(element);
        let batch = BitBatch::for_insert(&key, &offsets, ttl_secs);

        let start = Instant::now();
        self.store
            .execute(&batch)
            .await
            .map_err(|e| self.store_failure(&key, e))?;
        self.metrics.record_insert(start.elapsed(), offsets.len());

        debug!(key = %key, offsets = offsets.len(), ttl_secs, "Element inserted");
        Ok(())
    }

    async fn may_exist(&self, name: &str, element: &[u8]) -> Result<bool, FilterError> {
        validate_arguments(name, element)?;

        let key = self.bitmap_key(name);
        let offsets = self.offsets(element);
        let batch = BitBatch::for_lookup(&key, &offsets);

        let start = Instant::now();
        let bits = self
            .store
            .execute(&batch)
            .await
            .map_err(|e| self.store_failure(&key, e))?;
        if bits.len() != offsets.len() {
            let err = StoreError::Protocol(format!(
                "expected {} bits, store returned {}",
                offsets.len(),
                bits.len()
            ));
            return Err(self.store_failure(&key, err));
        }

        let found = self.config.match_policy.matches(&bits);
        self.metrics.record_lookup(start.elapsed(), found);

        debug!(key = %key, found, "Membership checked");
        Ok(found)
    }
}
