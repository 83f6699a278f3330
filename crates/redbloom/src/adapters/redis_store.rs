//! Redis bit store
//!
//! Sends each [`BitBatch`] as one Redis pipeline (`SETBIT` / `GETBIT` /
//! `EXPIRE`) over a multiplexed, auto-reconnecting connection. The pipeline
//! is not wrapped in `MULTI`: per-bit atomicity is all a filter needs.

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use tokio::time::timeout;
use tracing::{debug, info};

use crate::domain::{BitBatch, BitCommand};
use crate::error::StoreError;
use crate::ports::BitStore;

/// Connection settings for [`RedisBitStore`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedisConfig {
    /// `redis://[:password@]host:port[/db]`
    pub url: String,
    /// Upper bound on one pipelined round trip
    pub command_timeout: Duration,
    /// Upper bound on establishing the initial connection
    pub connect_timeout: Duration,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            command_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

impl RedisConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `REDBLOOM_REDIS_URL`: Redis URL (default: redis://127.0.0.1:6379)
    /// - `REDBLOOM_COMMAND_TIMEOUT_MS`: Per-batch timeout (default: 5000)
    /// - `REDBLOOM_CONNECT_TIMEOUT_MS`: Connect timeout (default: 5000)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let millis = |name: &str, default: Duration| {
            lookup(name)
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_millis)
                .unwrap_or(default)
        };

        Self {
            url: lookup("REDBLOOM_REDIS_URL").unwrap_or(defaults.url),
            command_timeout: millis("REDBLOOM_COMMAND_TIMEOUT_MS", defaults.command_timeout),
            connect_timeout: millis("REDBLOOM_CONNECT_TIMEOUT_MS", defaults.connect_timeout),
        }
    }
}

impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_timeout() {
            StoreError::Timeout
        } else if err.is_connection_refusal() || err.is_connection_dropped() || err.is_io_error()
        {
            StoreError::Connection(err.to_string())
        } else {
            StoreError::Protocol(err.to_string())
        }
    }
}

/// Bit store backed by a Redis server
#[derive(Clone)]
pub struct RedisBitStore {
    connection: ConnectionManager,
    command_timeout: Duration,
}

impl RedisBitStore {
    /// Connect to the server named by `config.url`.
    pub async fn connect(config: &RedisConfig) -> Result<Self, StoreError> {
        let client = redis::Client::open(config.url.as_str())
            .map_err(|e| StoreError::Connection(format!("invalid redis url: {e}")))?;

        let connection = timeout(config.connect_timeout, client.get_connection_manager())
            .await
            .map_err(|_| StoreError::Timeout)??;

        info!(url = %redacted(&config.url), "Connected to Redis bit store");

        Ok(Self {
            connection,
            command_timeout: config.command_timeout,
        })
    }

    /// Round-trip a `PING`.
    pub async fn ping(&self) -> Result<(), StoreError> {
        let mut connection = self.connection.clone();
        let reply: String = timeout(
            self.command_timeout,
            redis::cmd("PING").query_async(&mut connection),
        )
        .await
        .map_err(|_| StoreError::Timeout)??;

        if reply == "PONG" {
            Ok(())
        } else {
            Err(StoreError::Protocol(format!("unexpected PING reply: {reply}")))
        }
    }
}

/// Translate a batch into a Redis pipeline whose only replies are the
/// `GETBIT` results.
fn build_pipeline(batch: &BitBatch) -> redis::Pipeline {
    let mut pipe = redis::pipe();
    for command in batch.commands() {
        match command {
            BitCommand::SetBit { key, offset } => {
                pipe.cmd("SETBIT").arg(key).arg(*offset).arg(1).ignore();
            }
            BitCommand::GetBit { key, offset } => {
                pipe.cmd("GETBIT").arg(key).arg(*offset);
            }
            BitCommand::Expire { key, ttl_secs } => {
                pipe.cmd("EXPIRE").arg(key).arg(*ttl_secs).ignore();
            }
        }
    }
    pipe
}

#[async_trait]
impl BitStore for RedisBitStore {
    async fn execute(&self, batch: &BitBatch) -> Result<Vec<bool>, StoreError> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        let pipe = build_pipeline(batch);
        let mut connection = self.connection.clone();

        let replies: Vec<bool> = timeout(
            self.command_timeout,
            pipe.query_async(&mut connection),
        )
        .await
        .map_err(|_| StoreError::Timeout)??;

        if replies.len() != batch.reply_count() {
            return Err(StoreError::Protocol(format!(
                "expected {} GETBIT replies, got {}",
                batch.reply_count(),
                replies.len()
            )));
        }

        debug!(commands = batch.len(), replies = replies.len(), "Redis pipeline executed");
        Ok(replies)
    }
}

/// Hide the password part of a Redis URL for logging.
fn redacted(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***{}", &url[..scheme_end], &url[at..])
        }
        _ => url.to_string(),
    }
}
