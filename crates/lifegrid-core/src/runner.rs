//! Continuous stepping with operator controls.
//!
//! [`run_until_stopped`] is the body of the controller's background task.
//! It repeats [`run_step`] until the operator asks it to stop, and checks
//! the stop flag only between steps, so a stop never lands in the middle
//! of an evaluate or commit pass.
//!
//! The world lock is held from the start of evaluate until the statistics
//! for that step are computed. Anything else that takes the lock (toggles,
//! snapshots, rule changes) is therefore serialized between steps. On the
//! multi-thread runtime the step itself runs under `block_in_place`.
//!
//! [`run_step`]: crate::step::run_step

use std::time::Duration;

use lifegrid_types::StepStats;
use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};

use crate::operator::OperatorState;
use crate::step::{self, StepError, StepMode, StepSummary, World};

/// Errors that can occur during a run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A step failed.
    #[error("step error: {source}")]
    Step {
        /// The underlying step error.
        #[from]
        source: StepError,
    },
}

/// Result of one run, from start to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Steps executed during this run.
    pub steps_run: u64,
    /// Counters after the last completed step, if any.
    pub final_stats: Option<StepStats>,
}

/// Callback invoked after each step commits.
///
/// The world lock has already been released when this runs.
pub trait StepCallback: Send {
    /// Called after a step completes successfully.
    fn on_step(&mut self, summary: &StepSummary);
}

/// A no-op step callback for testing.
pub struct NoOpCallback;

impl StepCallback for NoOpCallback {
    fn on_step(&mut self, _summary: &StepSummary) {}
}

/// Publishes each step's counters on a `watch` channel.
///
/// Receivers always see the newest counters; intermediate values are
/// dropped if a receiver falls behind.
#[derive(Debug)]
pub struct WatchCallback {
    sender: std::sync::Arc<watch::Sender<StepStats>>,
}

impl WatchCallback {
    /// Publish through `sender`.
    pub const fn new(sender: std::sync::Arc<watch::Sender<StepStats>>) -> Self {
        Self { sender }
    }
}

impl StepCallback for WatchCallback {
    fn on_step(&mut self, summary: &StepSummary) {
        self.sender.send_replace(summary.stats);
        debug!(
            step = summary.stats.step_count,
            receivers = self.sender.receiver_count(),
            "Step stats published"
        );
    }
}

/// Step `world` until `operator` requests a stop.
///
/// Sleeps for the operator's step interval between steps, or just yields
/// to the runtime when the interval is zero.
///
/// # Errors
///
/// Returns [`RunnerError`] if a step fails. Steps are deterministic, so a
/// failure is not retried.
pub async fn run_until_stopped(
    world: &Mutex<World>,
    operator: &OperatorState,
    mode: StepMode,
    callback: &mut dyn StepCallback,
) -> Result<RunSummary, RunnerError> {
    let mut steps_run: u64 = 0;
    let mut final_stats: Option<StepStats> = None;

    info!(
        ?mode,
        step_interval_ms = operator.step_interval_ms(),
        "Run loop starting"
    );

    loop {
        // --- Check stop request (before step) ---
        if operator.is_stop_requested() {
            info!(steps_run, "Stop requested, run loop exiting");
            return Ok(RunSummary {
                steps_run,
                final_stats,
            });
        }

        // --- Execute step under the world lock ---
        let summary = {
            let mut guard = world.lock().await;
            step_on_worker(&mut guard, mode)?
        };

        steps_run = steps_run.saturating_add(1);
        final_stats = Some(summary.stats);

        // --- Notify callback ---
        callback.on_step(&summary);

        // --- Sleep for step interval ---
        let interval_ms = operator.step_interval_ms();
        if interval_ms > 0 {
            tokio::time::sleep(Duration::from_millis(interval_ms)).await;
        } else {
            tokio::task::yield_now().await;
        }
    }
}

/// Run one step without stalling other tasks on this worker.
///
/// On the multi-thread runtime the step runs under `block_in_place`, so a
/// large parallel step hands this worker's queued tasks to another thread.
/// `block_in_place` is not allowed on the current-thread runtime; there the
/// step runs inline.
fn step_on_worker(world: &mut World, mode: StepMode) -> Result<StepSummary, StepError> {
    if Handle::current().runtime_flavor() == RuntimeFlavor::MultiThread {
        tokio::task::block_in_place(|| step::run_step(world, mode))
    } else {
        step::run_step(world, mode)
    }
}

/// Log the end of a run.
pub fn log_run_end(summary: &RunSummary) {
    if let Some(stats) = summary.final_stats {
        info!(
            steps_run = summary.steps_run,
            step_count = stats.step_count,
            alive = stats.alive_count,
            max_neighbors = stats.max_neighbor_count,
            "Run ended"
        );
    } else {
        warn!("Run ended with no steps executed");
    }
}
