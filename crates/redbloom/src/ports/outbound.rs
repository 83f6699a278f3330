//! Outbound Ports (Driven Ports)
//!
//! The bit-addressable, TTL-capable key-value store holding filter bitmaps.
//!
//! Production: `RedisBitStore` (adapters/redis_store.rs)
//! Testing: `InMemoryBitStore` (adapters/in_memory.rs)

use async_trait::async_trait;

use crate::domain::BitBatch;
use crate::error::StoreError;

/// Remote bit store (Driven Port)
///
/// Bitmaps are shared with other processes: implementations must not cache
/// bit values between batches.
#[async_trait]
pub trait BitStore: Send + Sync {
    /// Execute `batch` in a single round trip.
    ///
    /// Returns one value per `GetBit` command, in command order. There is no
    /// atomicity across commands: on error, any prefix of the batch may have
    /// been applied.
    async fn execute(&self, batch: &BitBatch) -> Result<Vec<bool>, StoreError>;
}
