//! Command-line interface handling for the event pump.
//!
//! This module provides command-line argument parsing using the `clap` crate.
//! Every option except `--config` overrides a value from the configuration file.

use clap::{Arg, Command};
use std::path::PathBuf;

/// Configuration file used when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "event_pump.toml";

/// Command line arguments parsed from user input.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Path to the configuration file
    pub config_path: PathBuf,
    /// Optional override for log level
    pub log_level: Option<String>,
    /// Whether to force JSON log output
    pub json_logs: bool,
    /// Optional override for how long the simulation runs
    pub duration_ms: Option<u64>,
    /// Optional override for the frame interval
    pub frame_interval_ms: Option<u64>,
}

impl CliArgs {
    /// Parses the process arguments.
    pub fn parse() -> Self {
        Self::parse_from(std::env::args_os())
    }

    /// Parses `args`, where the first item is the binary name.
    ///
    /// Invalid input prints clap's usage message and exits the process.
    pub fn parse_from<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let matches = Self::command().get_matches_from(args);

        Self {
            config_path: PathBuf::from(
                matches
                    .get_one::<String>("config")
                    .cloned()
                    .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string()),
            ),
            log_level: matches.get_one::<String>("log-level").cloned(),
            json_logs: matches.get_flag("json-logs"),
            duration_ms: matches.get_one::<u64>("duration-ms").copied(),
            frame_interval_ms: matches.get_one::<u64>("frame-interval-ms").copied(),
        }
    }

    fn command() -> Command {
        Command::new("RNW Event Pump")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Headless host that drives the native-to-JS event dispatcher with synthetic input")
            .arg(
                Arg::new("config")
                    .short('c')
                    .long("config")
                    .value_name("FILE")
                    .help("Configuration file path")
                    .default_value(DEFAULT_CONFIG_PATH),
            )
            .arg(
                Arg::new("log-level")
                    .short('l')
                    .long("log-level")
                    .value_name("LEVEL")
                    .help("Log level (trace, debug, info, warn, error)"),
            )
            .arg(
                Arg::new("json-logs")
                    .long("json-logs")
                    .help("Output logs in JSON format")
                    .action(clap::ArgAction::SetTrue),
            )
            .arg(
                Arg::new("duration-ms")
                    .short('d')
                    .long("duration-ms")
                    .value_name("MILLIS")
                    .help("How long to feed synthetic input before shutting down")
                    .value_parser(clap::value_parser!(u64)),
            )
            .arg(
                Arg::new("frame-interval-ms")
                    .short('f')
                    .long("frame-interval-ms")
                    .value_name("MILLIS")
                    .help("Time between frame callbacks")
                    .value_parser(clap::value_parser!(u64)),
            )
    }
}
