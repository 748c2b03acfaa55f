//! Tracing subscriber setup
//!
//! Keeps log wiring in one place so applications embedding the library
//! initialise observability the same way.

use crate::Result;
use crate::config::LoggingConfig;
use crate::error::GuideError;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber from logging configuration.
///
/// `RUST_LOG` overrides the configured level. Fails when a subscriber is
/// already installed.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.clone()));

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if config.format == "compact" {
        registry.with(fmt::layer().compact()).try_init()
    } else {
        registry.with(fmt::layer().pretty()).try_init()
    };

    installed
        .map_err(|e| GuideError::config(format!("Failed to install tracing subscriber: {e}")))
}
