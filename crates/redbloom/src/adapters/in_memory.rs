//! In-memory bit store
//!
//! Emulates the parts of Redis a filter uses: `SETBIT`, `GETBIT` and
//! `EXPIRE` on string keys. Bits use Redis order (offset 0 is the most
//! significant bit of byte 0) and bitmaps grow a byte at a time on write.
//!
//! Expiry is checked lazily against `tokio::time::Instant`, so tests can use
//! `tokio::time::pause()` / `advance()` instead of sleeping.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bitvec::prelude::*;
use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::trace;

use crate::domain::{BitBatch, BitCommand};
use crate::error::StoreError;
use crate::ports::BitStore;

struct Bitmap {
    bits: BitVec<u8, Msb0>,
    expires_at: Option<Instant>,
}

impl Bitmap {
    fn new() -> Self {
        Self {
            bits: BitVec::new(),
            expires_at: None,
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }

    fn set(&mut self, offset: u64) {
        let index = offset as usize;
        if index >= self.bits.len() {
            // Redis grows the string to the byte holding the offset
            self.bits.resize((index / 8 + 1) * 8, false);
        }
        self.bits.set(index, true);
    }

    fn get(&self, offset: u64) -> bool {
        self.bits
            .get(offset as usize)
            .map(|bit| *bit)
            .unwrap_or(false)
    }
}

/// Process-local bit store with Redis bitmap and TTL semantics.
#[derive(Default)]
pub struct InMemoryBitStore {
    bitmaps: Mutex<HashMap<String, Bitmap>>,
    unavailable: AtomicBool,
    round_trips: AtomicU64,
}

impl InMemoryBitStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate an outage: while unavailable, every batch fails with a
    /// connection error and nothing is applied.
    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::SeqCst);
    }

    /// Batches received, including failed ones
    pub fn round_trips(&self) -> u64 {
        self.round_trips.load(Ordering::SeqCst)
    }

    /// Whether `key` holds a live (unexpired) bitmap
    pub fn exists(&self, key: &str) -> bool {
        self.with_live(key, |_| ()).is_some()
    }

    /// Remaining time-to-live of `key`, `None` if absent or without expiry
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        self.with_live(key, |bitmap| bitmap.expires_at.map(|at| at - now))
            .flatten()
    }

    /// Number of bits set in `key`'s bitmap
    pub fn bits_set(&self, key: &str) -> usize {
        self.with_live(key, |bitmap| bitmap.bits.count_ones())
            .unwrap_or(0)
    }

    /// The bitmap as Redis would return it from `GET key`
    pub fn raw_bytes(&self, key: &str) -> Option<Vec<u8>> {
        self.with_live(key, |bitmap| bitmap.bits.as_raw_slice().to_vec())
    }

    /// Number of live keys
    pub fn key_count(&self) -> usize {
        let now = Instant::now();
        let mut bitmaps = self.bitmaps.lock();
        bitmaps.retain(|_, bitmap| !bitmap.is_expired(now));
        bitmaps.len()
    }

    fn with_live<R>(&self, key: &str, f: impl FnOnce(&Bitmap) -> R) -> Option<R> {
        let now = Instant::now();
        let mut bitmaps = self.bitmaps.lock();
        live(&mut bitmaps, key, now).map(|bitmap| f(bitmap))
    }
}

/// Drop `key` if it has expired, then return it.
fn live<'a>(
    bitmaps: &'a mut HashMap<String, Bitmap>,
    key: &str,
    now: Instant,
) -> Option<&'a mut Bitmap> {
    if bitmaps.get(key).is_some_and(|bitmap| bitmap.is_expired(now)) {
        bitmaps.remove(key);
    }
    bitmaps.get_mut(key)
}

#[async_trait]
impl BitStore for InMemoryBitStore {
    async fn execute(&self, batch: &BitBatch) -> Result<Vec<bool>, StoreError> {
        self.round_trips.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Connection(
                "in-memory store marked unavailable".to_string(),
            ));
        }

        let now = Instant::now();
        let mut bitmaps = self.bitmaps.lock();
        let mut replies = Vec::with_capacity(batch.reply_count());

        for command in batch.commands() {
            match command {
                BitCommand::SetBit { key, offset } => {
                    live(&mut bitmaps, key, now);
                    bitmaps
                        .entry(key.clone())
                        .or_insert_with(Bitmap::new)
                        .set(*offset);
                }
                BitCommand::GetBit { key, offset } => {
                    let bit = live(&mut bitmaps, key, now)
                        .map(|bitmap| bitmap.get(*offset))
                        .unwrap_or(false);
                    replies.push(bit);
                }
                BitCommand::Expire { key, ttl_secs } => {
                    // No-op on a missing key, like Redis
                    if let Some(bitmap) = live(&mut bitmaps, key, now) {
                        bitmap.expires_at = now.checked_add(Duration::from_secs(*ttl_secs));
                    }
                }
            }
        }

        trace!(commands = batch.len(), replies = replies.len(), "In-memory batch applied");
        Ok(replies)
    }
}
