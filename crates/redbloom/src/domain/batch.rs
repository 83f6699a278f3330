//! Batched bit store requests
//!
//! A filter operation never talks to the store offset by offset. It builds a
//! single [`BitBatch`] covering all k offsets, and the store adapter sends it
//! as one pipelined round trip.

/// Full bitmap key for a logical filter name.
pub fn bitmap_key(prefix: &str, name: &str) -> String {
    let mut key = String::with_capacity(prefix.len() + name.len());
    key.push_str(prefix);
    key.push_str(name);
    key
}

/// One command inside a pipelined batch
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BitCommand {
    /// Set the bit at `offset` to 1
    SetBit { key: String, offset: u64 },
    /// Read the bit at `offset`; produces one reply
    GetBit { key: String, offset: u64 },
    /// (Re)arm the key's time-to-live
    Expire { key: String, ttl_secs: u64 },
}

impl BitCommand {
    pub fn key(&self) -> &str {
        match self {
            BitCommand::SetBit { key, .. }
            | BitCommand::GetBit { key, .. }
            | BitCommand::Expire { key, .. } => key,
        }
    }
}

/// Ordered commands executed in one round trip.
///
/// Only `GetBit` commands produce replies; a store returns them in command
/// order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BitBatch {
    commands: Vec<BitCommand>,
}

impl BitBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set every offset, then refresh the TTL once.
    ///
    /// `EXPIRE` is idempotent, so one refresh after the writes has the same
    /// observable effect as refreshing after every bit.
    pub fn for_insert(key: &str, offsets: &[u64], ttl_secs: u64) -> Self {
        let mut batch = Self {
            commands: Vec::with_capacity(offsets.len() + 1),
        };
        for &offset in offsets {
            batch.set_bit(key, offset);
        }
        batch.expire(key, ttl_secs);
        batch
    }

    /// Read every offset.
    pub fn for_lookup(key: &str, offsets: &[u64]) -> Self {
        let mut batch = Self {
            commands: Vec::with_capacity(offsets.len()),
        };
        for &offset in offsets {
            batch.get_bit(key, offset);
        }
        batch
    }

    pub fn set_bit(&mut self, key: &str, offset: u64) -> &mut Self {
        self.commands.push(BitCommand::SetBit {
            key: key.to_string(),
            offset,
        });
        self
    }

    pub fn get_bit(&mut self, key: &str, offset: u64) -> &mut Self {
        self.commands.push(BitCommand::GetBit {
            key: key.to_string(),
            offset,
        });
        self
    }

    pub fn expire(&mut self, key: &str, ttl_secs: u64) -> &mut Self {
        self.commands.push(BitCommand::Expire {
            key: key.to_string(),
            ttl_secs,
        });
        self
    }

    pub fn commands(&self) -> &[BitCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of replies a store must return for this batch
    pub fn reply_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|cmd| matches!(cmd, BitCommand::GetBit { .. }))
            .count()
    }
}
