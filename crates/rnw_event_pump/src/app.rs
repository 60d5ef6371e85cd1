//! Main application logic and lifecycle management.
//!
//! The `Application` wires the event dispatcher to a real frame loop and a
//! real JS queue thread, runs the synthetic input until the configured duration
//! elapses or a shutdown signal arrives, then shuts the host down in order.

use crate::emitter::LoggingEventEmitter;
use crate::simulation::Simulation;
use crate::{cli::CliArgs, config::AppConfig, logging::display_banner, signals::wait_for_shutdown_signal};
use rnw_events::{
    Choreographer, DispatcherStats, EventDispatcher, JsQueueThread, ReactContext, TracingEventListener,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Longest the shutdown path waits for in-flight events to reach the emitter.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Main application struct.
pub struct Application {
    /// Loaded application configuration
    config: AppConfig,
}

impl Application {
    /// Loads configuration, applies CLI overrides and validates the result.
    pub async fn new(args: CliArgs) -> Result<Self, Box<dyn std::error::Error>> {
        info!("🔧 Loading configuration from: {}", args.config_path.display());
        let mut config = AppConfig::load_from_file(&args.config_path).await?;
        config.apply_cli_overrides(&args);

        if let Err(e) = config.validate() {
            return Err(format!("Configuration validation failed: {e}").into());
        }
        info!("✅ Configuration loaded and validated successfully");

        display_banner();
        Ok(Self { config })
    }

    /// Creates an application from an already validated configuration.
    pub fn with_config(config: AppConfig) -> Self {
        Self { config }
    }

    /// Runs the host until the simulation ends or a signal arrives.
    ///
    /// Returns the dispatcher statistics collected during the run.
    pub async fn run(self) -> Result<DispatcherStats, Box<dyn std::error::Error>> {
        info!("🌟 Starting event pump");
        self.log_configuration_summary();

        let js_queue = Arc::new(JsQueueThread::spawn("js-queue")?);
        let context = Arc::new(ReactContext::new(js_queue));
        let emitter = Arc::new(LoggingEventEmitter::new());
        context.bind_event_emitter(emitter.clone());

        let choreographer = Arc::new(Choreographer::new());
        let dispatcher =
            EventDispatcher::with_config(context.clone(), choreographer.clone(), self.config.dispatcher.clone())?;
        dispatcher.add_listener(Arc::new(TracingEventListener));
        context.on_host_resume();

        let frame_interval = Duration::from_millis(self.config.frame.interval_ms);
        let mut frame_loop = choreographer.spawn_frame_loop(frame_interval)?;
        let mut simulation = Simulation::start(dispatcher.clone(), &self.config.simulation, frame_interval)?;

        info!("✅ Event pump is running");
        info!("🛑 Press Ctrl+C to stop early");

        let duration = Duration::from_millis(self.config.simulation.duration_ms);
        tokio::select! {
            _ = tokio::time::sleep(duration) => info!("⏱️ Simulation period elapsed"),
            result = wait_for_shutdown_signal() => result?,
        }

        info!("📡 Phase 1: Stopping input producers...");
        simulation.stop();

        info!("⏳ Phase 2: Waiting for in-flight events to flush...");
        if wait_for_drain(&dispatcher, DRAIN_TIMEOUT).await {
            info!("✅ All events processed successfully");
        } else {
            warn!("⏰ Timeout reached, proceeding with shutdown (some events may not have been flushed)");
        }

        info!("🧹 Phase 3: Stopping frame loop and tearing down the host...");
        frame_loop.stop();
        context.on_host_suspend();
        context.on_host_destroy();
        context.dispose();

        let stats = dispatcher.stats();
        log_final_statistics(&stats, &emitter);
        info!("✅ Event pump shutdown complete");
        Ok(stats)
    }

    fn log_configuration_summary(&self) {
        info!("📋 Configuration Summary:");
        info!("  🎞️ Frame interval: {}ms", self.config.frame.interval_ms);
        info!(
            "  📦 Dispatcher: callback '{}', initial buffer {}",
            self.config.dispatcher.callback_name, self.config.dispatcher.initial_buffer_capacity
        );
        info!(
            "  👆 Pointers: {} x {} moves/frame",
            self.config.simulation.pointers, self.config.simulation.moves_per_frame
        );
        info!("  ⌨️ Key presses: {}/s", self.config.simulation.key_events_per_second);
        info!("  ⏱️ Duration: {}ms", self.config.simulation.duration_ms);
    }
}

/// Polls until every received event has been dispatched, coalesced or failed.
async fn wait_for_drain(dispatcher: &EventDispatcher, timeout: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        let stats = dispatcher.stats();
        if stats.events_dispatched + stats.events_coalesced + stats.events_failed >= stats.events_received {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

fn log_final_statistics(stats: &DispatcherStats, emitter: &LoggingEventEmitter) {
    info!("📊 Final Statistics:");
    info!("  - Events received: {}", stats.events_received);
    info!("  - Events coalesced: {}", stats.events_coalesced);
    info!("  - Events dispatched: {}", stats.events_dispatched);
    if stats.events_failed > 0 {
        warn!("  - Events failed: {}", stats.events_failed);
    }
    info!("  - Frames drained: {} | Flushes: {}", stats.frames_drained, stats.flushes);
    info!("  - Largest batch: {} | Buffer capacity: {}", stats.max_batch_size, stats.buffer_capacity);
    for (name, count) in emitter.counts() {
        info!("  - {}: {}", name, count);
    }
    match serde_json::to_string(stats) {
        Ok(json) => info!(stats = %json, "dispatcher stats"),
        Err(e) => warn!("🟡 Could not serialize stats: {}", e),
    }
}
