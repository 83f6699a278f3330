//! redbloom: insert into and query remote Bloom filters from the shell.

mod commands;

use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use redbloom::domain::{DEFAULT_KEY_PREFIX, DEFAULT_TTL_SECS};
use redbloom::{
    BitStore, BloomConfig, BloomConfigBuilder, InMemoryBitStore, MatchPolicy, RedisBitStore,
    RedisConfig, RemoteBloomFilter,
};
use redbloom_telemetry::{init_telemetry, TelemetryConfig};

/// Remote Bloom filter harness
#[derive(Parser, Debug)]
#[command(name = "redbloom", version)]
#[command(about = "Insert into and query Bloom filters stored in Redis")]
struct Cli {
    /// Redis connection URL
    #[arg(
        long,
        env = "REDBLOOM_REDIS_URL",
        default_value = "redis://127.0.0.1:6379",
        global = true
    )]
    redis_url: String,

    /// Prefix prepended to every filter name to form the bitmap key
    #[arg(long, env = "REDBLOOM_PREFIX", default_value = DEFAULT_KEY_PREFIX, global = true)]
    prefix: String,

    /// Expected number of elements per filter
    #[arg(short = 'n', long, default_value_t = 3000, global = true)]
    expected_elements: u64,

    /// Target false positive probability
    #[arg(short = 'p', long, default_value_t = 0.03, global = true)]
    fpp: f64,

    /// Report membership only when every bit is set
    #[arg(long, global = true)]
    all_bits: bool,

    /// Use a process-local store instead of Redis
    #[arg(long, global = true)]
    in_memory: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// Print the sizing derived from --expected-elements and --fpp
    Params {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Insert elements into a filter
    Insert {
        /// Filter name
        name: String,

        #[arg(required = true)]
        elements: Vec<String>,

        /// Time-to-live of the filter in seconds, renewed on every insert
        #[arg(long, default_value_t = DEFAULT_TTL_SECS)]
        ttl: u64,
    },

    /// Test elements for membership
    Check {
        /// Filter name
        name: String,

        #[arg(required = true)]
        elements: Vec<String>,
    },

    /// Run the topic-read deduplication scenario
    Demo,
}

impl Cli {
    fn bloom_config(&self) -> Result<BloomConfig> {
        let policy = if self.all_bits {
            MatchPolicy::AllBitsSet
        } else {
            MatchPolicy::AnyBitSet
        };
        BloomConfigBuilder::new()
            .expected_elements(self.expected_elements)
            .target_fpp(self.fpp)
            .key_prefix(self.prefix.clone())
            .match_policy(policy)
            .build()
            .context("Invalid filter options")
    }

    fn redis_config(&self) -> RedisConfig {
        RedisConfig {
            url: self.redis_url.clone(),
            ..RedisConfig::from_env()
        }
    }
}

async fn run_with<S: BitStore + 'static>(
    store: Arc<S>,
    config: BloomConfig,
    command: &Command,
) -> Result<()> {
    let filter = RemoteBloomFilter::with_config(store, config).context("Failed to size filter")?;
    let mut out = io::stdout();

    match command {
        Command::Params { json } => commands::params(&filter, *json, &mut out),
        Command::Insert { name, elements, ttl } => {
            commands::insert(&filter, name, elements, *ttl, &mut out).await
        }
        Command::Check { name, elements } => {
            commands::check(&filter, name, elements, &mut out).await
        }
        Command::Demo => commands::demo(&filter, &mut out).await,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_telemetry(&TelemetryConfig::from_env()).context("Failed to initialize logging")?;

    let config = cli.bloom_config()?;

    // Sizing needs no store
    if cli.in_memory || matches!(cli.command, Command::Params { .. }) {
        return run_with(Arc::new(InMemoryBitStore::new()), config, &cli.command).await;
    }

    let redis = cli.redis_config();
    let store = RedisBitStore::connect(&redis)
        .await
        .context("Failed to connect to Redis")?;
    info!("Connected to bit store");

    run_with(Arc::new(store), config, &cli.command).await
}
