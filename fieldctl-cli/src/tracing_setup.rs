//! Tracing setup for the fieldctl CLI
//!
//! Usage:
//!   fieldctl --debug ...               # Debug logging to stderr
//!   RUST_LOG=fieldctl_core=debug ...   # Fine-grained log control
//!
//! Filter precedence: RUST_LOG, then --debug, then `log_level` from the
//! config file, then `info`. Logs go to stderr so stdout stays parseable.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Tracing configuration options
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Enable debug logging (sets debug level if RUST_LOG is not set)
    pub debug: bool,
    /// Level from the config file
    pub default_level: Option<String>,
}

impl TracingConfig {
    fn fallback_directive(&self) -> &str {
        if self.debug {
            "debug"
        } else {
            self.default_level.as_deref().unwrap_or("info")
        }
    }
}

pub fn init(config: &TracingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.fallback_directive()))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.debug) // Show targets in debug mode
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}
