//! Adapters Layer (Driven Adapters)
//!
//! Implementations of the `BitStore` port.
//!
//! ## Adapters
//!
//! - `RedisBitStore` - Pipelined Redis connection (feature `redis`)
//! - `InMemoryBitStore` - Process-local emulation for tests and offline runs

pub mod in_memory;
#[cfg(feature = "redis")]
pub mod redis_store;

pub use in_memory::InMemoryBitStore;
#[cfg(feature = "redis")]
pub use redis_store::{RedisBitStore, RedisConfig};
