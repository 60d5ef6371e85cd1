//! Configuration management for the event pump.
//!
//! This module handles loading and validation of the pump configuration from
//! TOML files, and applying command-line overrides on top of it.

use crate::cli::CliArgs;
use rnw_events::DispatcherConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

fn default_frame_interval_ms() -> u64 {
    16 // ~60 frames per second
}

fn default_duration_ms() -> u64 {
    2_000
}

fn default_pointers() -> u32 {
    2
}

fn default_moves_per_frame() -> u32 {
    4
}

fn default_key_events_per_second() -> u32 {
    20
}

fn default_view_tag_base() -> i32 {
    100
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Application configuration loaded from TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Event dispatcher tuning
    #[serde(default)]
    pub dispatcher: DispatcherConfig,
    /// Frame clock settings
    #[serde(default)]
    pub frame: FrameSettings,
    /// Synthetic input settings
    #[serde(default)]
    pub simulation: SimulationSettings,
    /// Logging configuration settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Frame clock configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameSettings {
    /// Time between frame callbacks in milliseconds
    #[serde(default = "default_frame_interval_ms")]
    pub interval_ms: u64,
}

/// Synthetic native input fed to the dispatcher.
///
/// Each pointer produces a burst of touch moves every frame, which the
/// dispatcher coalesces down to one per pointer. Key presses are produced on a
/// separate thread and are never coalesced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSettings {
    /// How long producers run before shutdown, in milliseconds
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,
    /// Number of simulated pointers
    #[serde(default = "default_pointers")]
    pub pointers: u32,
    /// Touch moves each pointer emits per frame
    #[serde(default = "default_moves_per_frame")]
    pub moves_per_frame: u32,
    /// Rate of key down/up pairs (0 disables the keyboard producer)
    #[serde(default = "default_key_events_per_second")]
    pub key_events_per_second: u32,
    /// First view tag handed to simulated views
    #[serde(default = "default_view_tag_base")]
    pub view_tag_base: i32,
}

/// Logging system configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Whether to output logs in JSON format
    #[serde(default)]
    pub json_format: bool,
}

impl Default for FrameSettings {
    fn default() -> Self {
        Self {
            interval_ms: default_frame_interval_ms(),
        }
    }
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            duration_ms: default_duration_ms(),
            pointers: default_pointers(),
            moves_per_frame: default_moves_per_frame(),
            key_events_per_second: default_key_events_per_second(),
            view_tag_base: default_view_tag_base(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from `path`, writing the default configuration
    /// there first if the file does not exist.
    pub async fn load_from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        if path.exists() {
            let content = tokio::fs::read_to_string(path).await?;
            let config: AppConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            let default_config = AppConfig::default();
            let toml_content = toml::to_string_pretty(&default_config)?;
            tokio::fs::write(path, toml_content).await?;
            info!("Created default configuration file: {}", path.display());
            Ok(default_config)
        }
    }

    /// Applies command-line overrides on top of the file configuration.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(level) = &args.log_level {
            self.logging.level = level.clone();
        }
        if args.json_logs {
            self.logging.json_format = true;
        }
        if let Some(duration_ms) = args.duration_ms {
            self.simulation.duration_ms = duration_ms;
        }
        if let Some(interval_ms) = args.frame_interval_ms {
            self.frame.interval_ms = interval_ms;
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        self.dispatcher.validate().map_err(|e| e.to_string())?;

        if self.frame.interval_ms == 0 {
            return Err("frame.interval_ms must be greater than 0".to_string());
        }

        if self.simulation.pointers > u32::from(u16::MAX) {
            return Err(format!(
                "simulation.pointers must be at most {}; pointer ids share a 16-bit coalescing key",
                u16::MAX
            ));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(format!(
                "Invalid log level: {}. Must be one of: {valid_levels:?}",
                &self.logging.level
            ));
        }

        Ok(())
    }
}
