//! # redbloom telemetry
//!
//! Logging bootstrap shared by redbloom binaries.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use redbloom_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     init_telemetry(&TelemetryConfig::from_env())?;
//!     // spans and events are now printed
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `redbloom` | Service name in log lines |
//! | `REDBLOOM_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `REDBLOOM_JSON_LOGS` | `false` (`true` in containers) | JSON output |

mod config;
mod tracing_setup;

pub use config::TelemetryConfig;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to install tracing subscriber: {0}")]
    SubscriberInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Install the global subscriber.
///
/// Fails if the level filter does not parse or a global subscriber is
/// already installed.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    tracing_setup::init_subscriber(config)
}
