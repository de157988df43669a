//! The simulation controller.
//!
//! [`SimulationController`] is what a UI or the engine binary talks to. It
//! owns the [`World`] behind an async mutex, drives a background run task
//! for continuous stepping, and exposes the cell, reporting, and control
//! surfaces.
//!
//! # State machine
//!
//! ```text
//!            start                 stop
//!   Idle ────────────▶ Running ────────────▶ Paused
//!    ▲                   │  ▲                  │
//!    │       reset       │  └──── start ───────┘
//!    └───────────────────┴──── reset ──────────┘
//! ```
//!
//! `start` while running and `stop` while not running are no-ops. `reset`
//! never fails for being idle: it clears whatever cells were painted, and a
//! second `reset` changes nothing. `stop` waits for the step in progress to commit before it
//! returns, so callers never observe a half-stepped grid.

use std::sync::Arc;

use lifegrid_types::{
    ControllerState, GridSnapshot, RawRules, RuleError, RuleSet, StepStats, VisualState,
};
use lifegrid_world::{Grid, WorldError};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::operator::{OperatorState, SimulationStatus};
use crate::runner::{self, RunSummary, RunnerError, WatchCallback};
use crate::step::{self, StepError, StepMode, StepSummary, World};

/// Errors returned by [`SimulationController`] operations.
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    /// Rule text was malformed; nothing was changed.
    #[error("invalid rules: {source}")]
    Rules {
        /// The underlying rule error.
        #[from]
        source: RuleError,
    },

    /// A grid operation failed (for example an out-of-range coordinate).
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// A manual step failed.
    #[error("step error: {source}")]
    Step {
        /// The underlying step error.
        #[from]
        source: StepError,
    },

    /// The run task ended with an error.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: RunnerError,
    },

    /// The run task panicked or was cancelled.
    #[error("run task failed: {message}")]
    TaskJoin {
        /// Description of the join failure.
        message: String,
    },

    /// The operation needs the controller to be stopped first.
    #[error("operation not allowed while the simulation is running")]
    AlreadyRunning,
}

/// Owns a world and the task that steps it.
#[derive(Debug)]
pub struct SimulationController {
    /// Grid, rules, and step counter. Locked for the full length of a step.
    world: Arc<Mutex<World>>,
    /// Stop flag and step interval shared with the run task.
    operator: Arc<OperatorState>,
    /// How each step schedules its passes.
    mode: StepMode,
    /// Latest counters, pushed after every step.
    stats_tx: Arc<watch::Sender<StepStats>>,
    /// Lifecycle state.
    state: ControllerState,
    /// The run task while running.
    task: Option<JoinHandle<Result<RunSummary, RunnerError>>>,
}

impl SimulationController {
    /// Create an idle controller around `grid`.
    pub fn new(grid: Grid, rules: RuleSet, mode: StepMode, step_interval_ms: u64) -> Self {
        let world = World::new(grid, rules);
        let (stats_tx, _rx) = watch::channel(world.stats());
        Self {
            world: Arc::new(Mutex::new(world)),
            operator: Arc::new(OperatorState::new(step_interval_ms)),
            mode,
            stats_tx: Arc::new(stats_tx),
            state: ControllerState::Idle,
            task: None,
        }
    }

    /// Current lifecycle state.
    ///
    /// A run task that ended on its own (a failed step) reads as `Paused`;
    /// the next `stop` or `reset` returns its error.
    pub fn state(&self) -> ControllerState {
        if self.state.is_running() && self.run_task_finished() {
            ControllerState::Paused
        } else {
            self.state
        }
    }

    fn run_task_finished(&self) -> bool {
        self.task.as_ref().is_some_and(JoinHandle::is_finished)
    }

    /// How each step schedules its passes.
    pub const fn mode(&self) -> StepMode {
        self.mode
    }

    // -----------------------------------------------------------------------
    // Control surface
    // -----------------------------------------------------------------------

    /// Begin stepping continuously in a background task.
    ///
    /// Resumes from the current grid and step count. Does nothing if the
    /// controller is already running. Must be called from within a tokio
    /// runtime.
    ///
    /// A run task that already ended on its own is replaced; its result is
    /// dropped.
    pub fn start(&mut self) {
        if self.state.is_running() {
            if !self.run_task_finished() {
                return;
            }
            self.task = None;
            warn!("Previous run ended on its own, starting a new one");
        }

        self.operator.clear_stop();
        let world = Arc::clone(&self.world);
        let operator = Arc::clone(&self.operator);
        let mode = self.mode;
        let mut callback = WatchCallback::new(Arc::clone(&self.stats_tx));

        self.task = Some(tokio::spawn(async move {
            runner::run_until_stopped(&world, &operator, mode, &mut callback).await
        }));

        info!(from = ?self.state, "Simulation started");
        self.state = ControllerState::Running;
    }

    /// Parse `raw`, install the rules, and start.
    ///
    /// If any field is malformed the rules, grid, and state are left
    /// exactly as they were.
    pub async fn start_with_rules(&mut self, raw: &RawRules) -> Result<(), ControllerError> {
        let rules = RuleSet::parse(raw)?;
        self.set_rules(rules).await;
        self.start();
        Ok(())
    }

    /// Stop stepping, keeping the grid and step count.
    ///
    /// Waits for the step in progress to commit. Does nothing unless
    /// running.
    pub async fn stop(&mut self) -> Result<(), ControllerError> {
        if !self.state.is_running() {
            return Ok(());
        }
        let result = self.join_run_task().await;
        self.state = ControllerState::Paused;
        info!("Simulation paused");
        result
    }

    /// Stop if running, then clear the grid and step count.
    ///
    /// Rules are kept. The grid is cleared even if the run task had
    /// failed; that failure is returned afterwards.
    pub async fn reset(&mut self) -> Result<(), ControllerError> {
        let stopped = if self.state.is_running() {
            self.join_run_task().await
        } else {
            Ok(())
        };

        let stats = {
            let mut world = self.world.lock().await;
            world.reset();
            world.stats()
        };
        self.stats_tx.send_replace(stats);
        self.state = ControllerState::Idle;
        info!("Simulation reset");
        stopped
    }

    /// Advance exactly one generation while not running.
    ///
    /// Leaves the controller paused.
    pub async fn step_once(&mut self) -> Result<StepSummary, ControllerError> {
        if self.state().is_running() {
            return Err(ControllerError::AlreadyRunning);
        }
        let summary = {
            let mut world = self.world.lock().await;
            step::run_step(&mut world, self.mode)?
        };
        self.stats_tx.send_replace(summary.stats);
        self.state = ControllerState::Paused;
        Ok(summary)
    }

    async fn join_run_task(&mut self) -> Result<(), ControllerError> {
        self.operator.request_stop();
        let Some(handle) = self.task.take() else {
            return Ok(());
        };
        match handle.await {
            Ok(Ok(summary)) => {
                runner::log_run_end(&summary);
                Ok(())
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Run task ended with an error");
                Err(e.into())
            }
            Err(e) => {
                warn!(error = %e, "Run task did not finish cleanly");
                Err(ControllerError::TaskJoin {
                    message: e.to_string(),
                })
            }
        }
    }

    /// Change the delay between steps. Returns the previous value.
    pub fn set_step_interval_ms(&self, ms: u64) -> u64 {
        self.operator.set_step_interval_ms(ms)
    }

    // -----------------------------------------------------------------------
    // Configuration surface
    // -----------------------------------------------------------------------

    /// Replace the rules. Takes effect on the next step.
    pub async fn set_rules(&self, rules: RuleSet) {
        self.world.lock().await.rules = rules;
    }

    /// The rules the next step will use.
    pub async fn rules(&self) -> RuleSet {
        self.world.lock().await.rules
    }

    // -----------------------------------------------------------------------
    // Cell surface
    // -----------------------------------------------------------------------

    /// Flip the cell at `(x, y)` and return its new alive state.
    ///
    /// While running, this waits for the step in progress to commit and
    /// lands before the next one begins.
    pub async fn toggle(&self, x: usize, y: usize) -> Result<bool, ControllerError> {
        let alive = self.world.lock().await.grid.toggle(x, y)?;
        Ok(alive)
    }

    /// Whether the cell at `(x, y)` is alive.
    pub async fn is_alive(&self, x: usize, y: usize) -> Result<bool, ControllerError> {
        Ok(self.world.lock().await.grid.is_alive(x, y)?)
    }

    /// What a renderer should draw at `(x, y)` under the current rules.
    pub async fn visual_state(&self, x: usize, y: usize) -> Result<VisualState, ControllerError> {
        let world = self.world.lock().await;
        Ok(world.grid.visual_state(x, y, world.rules.fade_enabled)?)
    }

    /// Copy of every cell's alive flag, taken between steps.
    pub async fn snapshot(&self) -> GridSnapshot {
        self.world.lock().await.grid.snapshot()
    }

    // -----------------------------------------------------------------------
    // Reporting surface
    // -----------------------------------------------------------------------

    /// Current counters, computed from the committed grid.
    pub async fn stats(&self) -> StepStats {
        self.world.lock().await.stats()
    }

    /// Receive the counters pushed after every step.
    pub fn subscribe(&self) -> watch::Receiver<StepStats> {
        self.stats_tx.subscribe()
    }

    /// Full status for status lines and APIs.
    pub async fn status(&self) -> SimulationStatus {
        SimulationStatus {
            state: self.state(),
            stats: self.stats().await,
            step_interval_ms: self.operator.step_interval_ms(),
            elapsed_seconds: self.operator.elapsed_seconds(),
            created_at: self.operator.created_at().to_rfc3339(),
        }
    }
}

impl Drop for SimulationController {
    fn drop(&mut self) {
        self.operator.request_stop();
        if let Some(handle) = self.task.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lifegrid_world::{Pattern, place};

    use super::*;

    fn blinker_controller() -> SimulationController {
        let mut grid = Grid::new(5, 5).unwrap();
        place(&mut grid, Pattern::Blinker, 1, 2).unwrap();
        SimulationController::new(grid, RuleSet::classic(), StepMode::Serial, 0)
    }

    #[tokio::test]
    async fn new_controller_is_idle() {
        let controller = blinker_controller();
        assert_eq!(controller.state(), ControllerState::Idle);
        let stats = controller.stats().await;
        assert_eq!(stats.step_count, 0);
        assert_eq!(stats.alive_count, 3);
        assert_eq!(*controller.subscribe().borrow(), stats);
    }

    #[tokio::test]
    async fn stop_when_idle_is_a_noop() {
        let mut controller = blinker_controller();
        controller.stop().await.unwrap();
        assert_eq!(controller.state(), ControllerState::Idle);
        assert_eq!(controller.stats().await.alive_count, 3);
    }

    #[tokio::test]
    async fn reset_when_idle_clears_painted_cells() {
        let mut controller = blinker_controller();
        controller.reset().await.unwrap();
        assert_eq!(controller.state(), ControllerState::Idle);
        assert_eq!(controller.stats().await, StepStats::default());

        controller.reset().await.unwrap();
        assert_eq!(controller.state(), ControllerState::Idle);
        assert_eq!(*controller.subscribe().borrow(), StepStats::default());
    }

    async fn wait_until_paused(controller: &SimulationController) {
        tokio::time::timeout(std::time::Duration::from_secs(5), async {
            while controller.state() != ControllerState::Paused {
                tokio::time::sleep(std::time::Duration::from_millis(1)).await;
            }
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn failed_run_reads_as_paused_and_reports_on_stop() {
        let mut controller = blinker_controller();
        controller.world.lock().await.step_count = u64::MAX;

        controller.start();
        wait_until_paused(&controller).await;

        let err = controller.stop().await.unwrap_err();
        assert!(matches!(err, ControllerError::Runner { .. }));
        assert_eq!(controller.state(), ControllerState::Paused);
    }

    #[tokio::test]
    async fn start_replaces_a_run_that_ended_on_its_own() {
        let mut controller = blinker_controller();
        let mut rx = controller.subscribe();
        controller.world.lock().await.step_count = u64::MAX;

        controller.start();
        wait_until_paused(&controller).await;

        controller.world.lock().await.step_count = 0;
        controller.start();
        assert_eq!(controller.state(), ControllerState::Running);
        tokio::time::timeout(std::time::Duration::from_secs(5), rx.changed())
            .await
            .unwrap()
            .unwrap();
        assert!(rx.borrow_and_update().step_count >= 1);
        controller.stop().await.unwrap();
    }

    #[tokio::test]
    async fn step_once_advances_and_pauses() {
        let mut controller = blinker_controller();
        let summary = controller.step_once().await.unwrap();
        assert_eq!(summary.stats.step_count, 1);
        assert_eq!(controller.state(), ControllerState::Paused);
        assert!(controller.is_alive(2, 1).await.unwrap());
        assert!(!controller.is_alive(1, 2).await.unwrap());
        assert_eq!(controller.subscribe().borrow().step_count, 1);
    }

    #[tokio::test]
    async fn toggle_out_of_range_fails() {
        let controller = blinker_controller();
        let err = controller.toggle(5, 0).await.unwrap_err();
        assert!(matches!(
            err,
            ControllerError::World {
                source: WorldError::OutOfBounds { .. }
            }
        ));
    }

    #[tokio::test]
    async fn visual_state_follows_rules_fade_flag() {
        let mut grid = Grid::new(3, 3).unwrap();
        grid.set_alive(1, 1, true).unwrap();
        let mut controller = SimulationController::new(
            grid,
            RuleSet::classic().with_fade(true),
            StepMode::Serial,
            0,
        );
        controller.step_once().await.unwrap();
        assert_eq!(controller.visual_state(1, 1).await.unwrap(), VisualState::Fading);

        controller.set_rules(RuleSet::classic()).await;
        assert_eq!(controller.visual_state(1, 1).await.unwrap(), VisualState::Empty);
    }

    #[tokio::test]
    async fn malformed_rules_leave_everything_untouched() {
        let mut controller = blinker_controller();
        let raw = RawRules {
            lower_death: "1".to_owned(),
            upper_death: "four".to_owned(),
            survive_a: "2".to_owned(),
            survive_b: "3".to_owned(),
            birth_count: "3".to_owned(),
            fade_enabled: true,
        };
        let before = controller.snapshot().await;

        let err = controller.start_with_rules(&raw).await.unwrap_err();

        assert!(matches!(err, ControllerError::Rules { .. }));
        assert_eq!(controller.state(), ControllerState::Idle);
        assert_eq!(controller.rules().await, RuleSet::classic());
        assert_eq!(controller.snapshot().await, before);
    }

    #[tokio::test]
    async fn status_reports_state_and_interval() {
        let controller = blinker_controller();
        controller.set_step_interval_ms(25);
        let status = controller.status().await;
        assert_eq!(status.state, ControllerState::Idle);
        assert_eq!(status.step_interval_ms, 25);
        assert_eq!(status.stats.alive_count, 3);
        assert!(!status.created_at.is_empty());
    }
}
