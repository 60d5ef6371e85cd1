//! # RNW Event Pump - Main Entry Point
//!
//! A headless host for the native-to-JS event dispatcher. It runs a real frame
//! clock and a real JS queue thread, feeds the dispatcher synthetic touch, key,
//! focus and scroll input, and logs what the JavaScript side would receive.
//!
//! ## Quick Start
//!
//! ```bash
//! # Run with default configuration
//! event_pump
//!
//! # Specify custom configuration
//! event_pump --config stress.toml
//!
//! # Override specific settings
//! event_pump --duration-ms 10000 --frame-interval-ms 8 --log-level debug
//!
//! # JSON logging
//! event_pump --json-logs
//! ```
//!
//! ## Configuration
//!
//! The pump loads configuration from a TOML file (default: `event_pump.toml`).
//! If the file doesn't exist, a default configuration will be created.
//!
//! ## Signal Handling
//!
//! The pump stops early and shuts down gracefully on:
//! - SIGINT (Ctrl+C)
//! - SIGTERM (Unix systems)

use tracing::error;

pub mod app;
pub mod cli;
pub mod config;
pub mod emitter;
pub mod logging;
pub mod signals;
pub mod simulation;

use app::Application;
use cli::CliArgs;
use config::AppConfig;

pub use config::{FrameSettings, LoggingSettings, SimulationSettings};

/// Runs the pump: CLI parsing, logging setup, then the application itself.
///
/// Exits the process with status 1 if startup or the run fails.
pub async fn init() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Logging comes up before the application so its startup is visible.
    let mut config = AppConfig::load_from_file(&args.config_path).await.unwrap_or_default();
    config.apply_cli_overrides(&args);

    if let Err(e) = logging::setup_logging(&config.logging, args.json_logs) {
        eprintln!("❌ Failed to setup logging: {e}");
        std::process::exit(1);
    }

    match Application::new(args).await {
        Ok(app) => {
            if let Err(e) = app.run().await {
                error!("❌ Application error: {:?}", e);
                std::process::exit(1);
            }
        }
        Err(e) => {
            error!("❌ Failed to start application: {e:?}");
            std::process::exit(1);
        }
    }

    Ok(())
}
