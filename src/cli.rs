//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// One year.
pub const MAX_LOOP_MINUTES: u64 = 525_600;

/// Command-line arguments for `stock-monitor`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "stock-monitor",
    version,
    about = "Watch product pages for stock and price changes and post them to a webhook.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (JSON).
    #[arg(long, value_name = "PATH", default_value = "config.json")]
    pub config: PathBuf,

    /// Path to the persisted state file.
    #[arg(long, value_name = "PATH", default_value = ".state.json")]
    pub state_file: PathBuf,

    /// Run continuously, one cycle every N minutes (at most a year). Omitted or 0 runs a single cycle.
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(0..=MAX_LOOP_MINUTES))]
    pub loop_minutes: Option<u64>,

    /// Notify on every run instead of only on changes.
    #[arg(long)]
    pub notify_all: bool,

    /// Also notify when an in-stock product sells out.
    #[arg(long)]
    pub notify_unavailable: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `RUST_LOG` or a default of `info` is used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Log line format.
    #[arg(long, value_enum, value_name = "FORMAT", default_value = "text")]
    pub log_format: LogFormat,
}

impl CliArgs {
    /// Loop interval in minutes, if loop mode was requested.
    pub fn loop_interval_minutes(&self) -> Option<u64> {
        self.loop_minutes.filter(|m| *m > 0)
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_run_once() {
        let args = CliArgs::try_parse_from(["stock-monitor"]).unwrap();
        assert_eq!(args.config, PathBuf::from("config.json"));
        assert_eq!(args.state_file, PathBuf::from(".state.json"));
        assert_eq!(args.loop_interval_minutes(), None);
        assert!(!args.notify_all);
        assert!(!args.notify_unavailable);
        assert_eq!(args.log_format, LogFormat::Text);
    }

    #[test]
    fn test_loop_mode_and_overrides() {
        let args = CliArgs::try_parse_from([
            "stock-monitor",
            "--loop-minutes",
            "15",
            "--config",
            "/etc/stock/config.json",
            "--notify-unavailable",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(args.loop_interval_minutes(), Some(15));
        assert_eq!(args.config, PathBuf::from("/etc/stock/config.json"));
        assert!(args.notify_unavailable);
        assert!(matches!(args.log_level, Some(LogLevel::Debug)));
    }

    #[test]
    fn test_zero_minutes_means_run_once() {
        let args = CliArgs::try_parse_from(["stock-monitor", "--loop-minutes", "0"]).unwrap();
        assert_eq!(args.loop_interval_minutes(), None);
    }

    #[test]
    fn test_rejects_negative_minutes() {
        assert!(CliArgs::try_parse_from(["stock-monitor", "--loop-minutes", "-5"]).is_err());
    }

    #[test]
    fn test_loop_minutes_are_bounded() {
        let args = CliArgs::try_parse_from(["stock-monitor", "--loop-minutes", "525600"]).unwrap();
        assert_eq!(args.loop_interval_minutes(), Some(MAX_LOOP_MINUTES));

        let too_long = (u64::MAX / 10).to_string();
        assert!(CliArgs::try_parse_from(["stock-monitor", "--loop-minutes", too_long.as_str()]).is_err());
        assert!(CliArgs::try_parse_from(["stock-monitor", "--loop-minutes", "525601"]).is_err());
    }
}
