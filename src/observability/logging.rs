//! # Structured Logging
//!
//! Installs the global `tracing` subscriber. Output goes to stdout, either as
//! JSON lines (the `logstash` formatter) or human-readable text with full
//! timestamps. `RUST_LOG` takes precedence over the configured level.

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::ObservabilityConfig;
use crate::errors::{Result, VaultCertError};

/// Build the level filter for the given configuration.
pub fn env_filter(config: &ObservabilityConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_level()))
}

/// Initialise logging once for the whole process.
pub fn init_logging(config: &ObservabilityConfig) -> Result<()> {
    let builder = fmt().with_env_filter(env_filter(config)).with_writer(std::io::stdout);

    let result = if config.json_logging() {
        builder.json().with_current_span(false).try_init()
    } else {
        builder.with_ansi(false).try_init()
    };

    result.map_err(|e| VaultCertError::config(format!("Failed to initialise logging: {}", e)))
}
