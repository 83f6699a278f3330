//! # redbloom
//!
//! Bloom filters whose bitmap lives in a shared remote bit store (Redis),
//! so many processes can write to and query the same filter. Each filter
//! name maps to one bitmap key with a time-to-live that every insert renews.
//!
//! ## Architecture
//!
//! Hexagonal layout (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): Pure logic, no I/O
//!   - `FilterParameters`: bitmap length and hash count from (n, p)
//!   - `bit_offsets`: murmur3 x64/128 double hashing
//!   - `BitBatch`: the pipelined request sent to a store
//!   - `BloomConfig` / `BloomConfigBuilder`
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `BloomFilterApi`: Driving port (inbound API)
//!   - `BitStore`: Driven port (remote bitmap storage)
//!
//! - **Service Layer** (`service/`)
//!   - `RemoteBloomFilter`: Implements `BloomFilterApi` over any `BitStore`
//!
//! - **Adapters Layer** (`adapters/`)
//!   - `RedisBitStore`: pipelined SETBIT/GETBIT/EXPIRE (feature `redis`)
//!   - `InMemoryBitStore`: process-local store with the same semantics
//!
//! ## Invariants
//!
//! - No false negatives while the bitmap key is alive: an inserted element
//!   is always reported as possibly present.
//! - Every offset is in `[0, bitmap_length)`.
//! - One store round trip per `insert` and per `may_exist`.
//!
//! ## Usage Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use redbloom::{BloomFilterApi, RedisBitStore, RedisConfig, RemoteBloomFilter};
//!
//! let store = Arc::new(RedisBitStore::connect(&RedisConfig::from_env()).await?);
//! let filter = RemoteBloomFilter::new(store, 3000, 0.03)?;
//!
//! filter.insert_str("topic_read:8839540:20190609", "76930242", 86_400).await?;
//! assert!(filter.may_exist_str("topic_read:8839540:20190609", "76930242").await?);
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use adapters::InMemoryBitStore;
#[cfg(feature = "redis")]
pub use adapters::{RedisBitStore, RedisConfig};
pub use domain::{BitBatch, BitCommand, BloomConfig, BloomConfigBuilder, FilterParameters, MatchPolicy};
pub use error::{FilterError, StoreError};
pub use metrics::{Metrics, MetricsRecorder, MetricsSnapshot, NoOpMetrics};
pub use ports::{BitStore, BloomFilterApi};
pub use service::RemoteBloomFilter;
