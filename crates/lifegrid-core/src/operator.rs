//! Operator control state shared between the controller and the run loop.
//!
//! The run loop reads these fields between steps, and the controller writes
//! them. All of them are atomics so the loop never takes a lock just to
//! find out whether it should keep going.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use lifegrid_types::{ControllerState, StepStats};
use serde::{Deserialize, Serialize};

/// Shared operator control state.
///
/// Wrapped in an `Arc` and shared by the controller and its run task.
#[derive(Debug)]
pub struct OperatorState {
    /// Whether the run loop should stop before its next step.
    stop_requested: AtomicBool,

    /// Delay between steps in milliseconds (runtime-adjustable, 0 = none).
    step_interval_ms: AtomicU64,

    /// Wall-clock time the controller was created.
    created_at: DateTime<Utc>,
}

impl OperatorState {
    /// Create control state with the given step interval.
    pub fn new(step_interval_ms: u64) -> Self {
        Self {
            stop_requested: AtomicBool::new(false),
            step_interval_ms: AtomicU64::new(step_interval_ms),
            created_at: Utc::now(),
        }
    }

    // -----------------------------------------------------------------------
    // Stop
    // -----------------------------------------------------------------------

    /// Ask the run loop to stop after the step in progress.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
    }

    /// Clear a previous stop request before starting a new run.
    pub fn clear_stop(&self) {
        self.stop_requested.store(false, Ordering::Release);
    }

    /// Whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    // -----------------------------------------------------------------------
    // Step speed
    // -----------------------------------------------------------------------

    /// Current delay between steps in milliseconds.
    pub fn step_interval_ms(&self) -> u64 {
        self.step_interval_ms.load(Ordering::Acquire)
    }

    /// Change the delay between steps. Returns the previous value.
    ///
    /// Takes effect after the step in progress.
    pub fn set_step_interval_ms(&self, ms: u64) -> u64 {
        self.step_interval_ms.swap(ms, Ordering::AcqRel)
    }

    // -----------------------------------------------------------------------
    // Timing
    // -----------------------------------------------------------------------

    /// Return the wall-clock creation time.
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Return elapsed seconds since creation.
    pub fn elapsed_seconds(&self) -> u64 {
        let elapsed = Utc::now()
            .signed_duration_since(self.created_at)
            .num_seconds();
        // `num_seconds` can be negative if clocks are weird; treat as 0.
        u64::try_from(elapsed.max(0)).unwrap_or(u64::MAX)
    }
}

/// JSON-serializable status of a simulation for status lines and APIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationStatus {
    /// Controller lifecycle state.
    pub state: ControllerState,
    /// Latest aggregate counters.
    pub stats: StepStats,
    /// Delay between steps in milliseconds.
    pub step_interval_ms: u64,
    /// Elapsed wall-clock seconds since the controller was created.
    pub elapsed_seconds: u64,
    /// ISO 8601 timestamp of controller creation.
    pub created_at: String,
}
