// src/logging.rs

//! Logging setup using `tracing` + `tracing-subscriber`.
//!
//! The effective filter is chosen in this order:
//! 1. `--log-level` CLI flag
//! 2. `NDKDRIVE_LOG` environment variable; accepts full `EnvFilter`
//!    directives (e.g. "debug" or "info,ndkdrive::exec=trace")
//! 3. default to `info`

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::cli::LogLevel;

const ENV_VAR: &str = "NDKDRIVE_LOG";

/// Initialise the global logging subscriber. Call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let filter = match cli_level {
        Some(level) => EnvFilter::new(level.as_directive()),
        None => match EnvFilter::try_from_env(ENV_VAR) {
            Ok(filter) => filter,
            Err(_) => EnvFilter::new("info"),
        },
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|err| anyhow::anyhow!("{err}"))
        .context("installing the tracing subscriber")?;

    Ok(())
}

impl LogLevel {
    fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}
