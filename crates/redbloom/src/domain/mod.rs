//! Domain Layer - Pure logic
//!
//! This layer contains:
//! - Filter sizing (bitmap length, hash count)
//! - Bit offset generation (double hashing)
//! - Configuration
//! - The batched request model sent to bit stores
//!
//! RULES:
//! - No I/O operations
//! - No async code

pub mod batch;
pub mod config;
pub mod hash_functions;
pub mod parameters;

pub use batch::{bitmap_key, BitBatch, BitCommand};
pub use config::{BloomConfig, BloomConfigBuilder, MatchPolicy, DEFAULT_KEY_PREFIX, DEFAULT_TTL_SECS};
pub use hash_functions::{bit_offsets, murmur_seeds};
pub use parameters::{
    estimated_false_positive_rate, optimal_bitmap_length, optimal_hash_function_count,
    FilterParameters, MAX_BITMAP_LENGTH,
};
