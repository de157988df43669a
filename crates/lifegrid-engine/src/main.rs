//! Headless runner for the Lifegrid automaton.
//!
//! Loads configuration, seeds a grid, and runs the simulation controller
//! until a step limit is reached or the process receives Ctrl-C, logging
//! counters as it goes.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `$LIFEGRID_CONFIG` or `lifegrid-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Create and seed the grid
//! 4. Start the controller
//! 5. Watch published stats until the step limit or Ctrl-C
//! 6. Stop and log the final status

mod error;
mod seed;

use std::path::PathBuf;

use lifegrid_core::config::{LifegridConfig, LoggingConfig, RunConfig};
use lifegrid_core::controller::SimulationController;
use lifegrid_types::StepStats;
use lifegrid_world::Grid;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Environment variable naming an alternate config file.
const CONFIG_ENV: &str = "LIFEGRID_CONFIG";

/// Config file looked up in the working directory when the variable is unset.
const DEFAULT_CONFIG_PATH: &str = "lifegrid-config.yaml";

/// Why the engine stopped watching the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopReason {
    /// `run.max_steps` was reached.
    StepLimit,
    /// Ctrl-C was received (or could not be listened for).
    Interrupted,
    /// The stats channel closed.
    ChannelClosed,
}

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if configuration, seeding, or the run fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration. Logging depends on it, so report afterwards.
    let (config, source) = load_config()?;

    // 2. Initialize structured logging.
    init_logging(&config.logging)?;

    info!("lifegrid-engine starting");
    match &source {
        Some(path) => info!(path = %path.display(), "Configuration loaded"),
        None => info!("Config file not found, using defaults"),
    }
    info!(
        width = config.grid.width,
        height = config.grid.height,
        lower_death = config.rules.lower_death,
        upper_death = config.rules.upper_death,
        survive_a = config.rules.survive_a,
        survive_b = config.rules.survive_b,
        birth_count = config.rules.birth_count,
        fade = config.rules.fade_enabled,
        parallel = config.run.parallel,
        step_interval_ms = config.run.step_interval_ms,
        max_steps = config.run.max_steps,
        "Run parameters"
    );

    // 3. Create and seed the grid.
    let mut grid = Grid::new(config.grid.width, config.grid.height).map_err(EngineError::from)?;
    let alive = seed::seed_grid(&mut grid, &config.seed).map_err(EngineError::from)?;
    info!(alive, cells = grid.len(), "Grid seeded");

    // 4. Start the controller.
    let mut controller = SimulationController::new(
        grid,
        config.rules,
        config.run.step_mode(),
        config.run.step_interval_ms,
    );
    let mut stats_rx = controller.subscribe();
    controller.start();

    // 5. Watch until a stop condition.
    let reason = watch_run(&mut stats_rx, &config.run).await;

    // 6. Stop and report.
    controller.stop().await.map_err(EngineError::from)?;
    let status = controller.status().await;
    info!(
        ?reason,
        step_count = status.stats.step_count,
        alive = status.stats.alive_count,
        max_neighbors = status.stats.max_neighbor_count,
        elapsed_seconds = status.elapsed_seconds,
        "lifegrid-engine shutdown complete"
    );
    match serde_json::to_string(&status) {
        Ok(json) => info!(status = %json, "Final status"),
        Err(e) => warn!(error = %e, "Failed to serialize final status"),
    }

    Ok(())
}

/// Resolve the config path and load it.
///
/// A missing default file falls back to defaults. A missing file named by
/// `LIFEGRID_CONFIG` is an error. Returns the path actually read, if any.
fn load_config() -> Result<(LifegridConfig, Option<PathBuf>), EngineError> {
    if let Some(explicit) = std::env::var_os(CONFIG_ENV) {
        let path = PathBuf::from(explicit);
        let config = LifegridConfig::from_file(&path)?;
        return Ok((config, Some(path)));
    }

    let path = PathBuf::from(DEFAULT_CONFIG_PATH);
    if path.exists() {
        let config = LifegridConfig::from_file(&path)?;
        Ok((config, Some(path)))
    } else {
        Ok((LifegridConfig::default(), None))
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `logging.level` is used.
fn init_logging(logging: &LoggingConfig) -> Result<(), EngineError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&logging.level).map_err(|e| EngineError::Logging {
            message: format!("invalid log level {:?}: {e}", logging.level),
        })?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

/// Follow published stats, logging progress, until a stop condition.
async fn watch_run(stats_rx: &mut watch::Receiver<StepStats>, run: &RunConfig) -> StopReason {
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);
    let mut last_reported: u64 = 0;

    loop {
        tokio::select! {
            changed = stats_rx.changed() => {
                if changed.is_err() {
                    warn!("Stats channel closed");
                    return StopReason::ChannelClosed;
                }
                let stats = *stats_rx.borrow_and_update();
                if should_report(stats.step_count, last_reported, run.report_every) {
                    last_reported = stats.step_count;
                    info!(
                        step = stats.step_count,
                        alive = stats.alive_count,
                        max_neighbors = stats.max_neighbor_count,
                        "Progress"
                    );
                }
                if reached_limit(stats.step_count, run.max_steps) {
                    info!(max_steps = run.max_steps, "Step limit reached");
                    return StopReason::StepLimit;
                }
            }
            result = &mut shutdown => {
                match result {
                    Ok(()) => info!("Ctrl-C received, stopping"),
                    Err(e) => warn!(error = %e, "Failed to listen for Ctrl-C, stopping"),
                }
                return StopReason::Interrupted;
            }
        }
    }
}

/// Whether enough steps have passed since the last progress line.
///
/// Published stats can skip steps, so this compares distance rather than
/// divisibility. `every == 0` disables progress lines.
const fn should_report(step: u64, last_reported: u64, every: u64) -> bool {
    every > 0 && step.saturating_sub(last_reported) >= every
}

/// Whether `step` has reached a nonzero `max_steps`.
const fn reached_limit(step: u64, max_steps: u64) -> bool {
    max_steps > 0 && step >= max_steps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reporting_tolerates_skipped_steps() {
        assert!(!should_report(9, 0, 10));
        assert!(should_report(10, 0, 10));
        assert!(should_report(13, 0, 10));
        assert!(!should_report(22, 13, 10));
        assert!(should_report(23, 13, 10));
    }

    #[test]
    fn zero_interval_disables_reporting() {
        assert!(!should_report(1_000, 0, 0));
    }

    #[test]
    fn zero_limit_runs_forever() {
        assert!(!reached_limit(u64::MAX, 0));
        assert!(!reached_limit(4, 5));
        assert!(reached_limit(5, 5));
        assert!(reached_limit(6, 5));
    }
}
