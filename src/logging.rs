//! Logging setup using `tracing` + `tracing-subscriber`.
//!
//! The `--log-level` flag wins over `RUST_LOG`; without either the crate logs
//! at `info`. Output goes to stderr.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

use crate::cli::{LogFormat, LogLevel};

const CRATE_TARGET: &str = "stock_monitor";

pub fn init_logging(level: Option<LogLevel>, format: LogFormat) -> Result<()> {
    let filter = match level {
        Some(level) => EnvFilter::new(format!("{}={}", CRATE_TARGET, level_directive(level))),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("{}=info", CRATE_TARGET))),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
    .map_err(|e| anyhow!("failed to initialise logging: {}", e))
}

fn level_directive(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}
