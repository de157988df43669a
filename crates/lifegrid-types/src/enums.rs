//! Enumeration types for the Lifegrid automaton.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Cell actions
// ---------------------------------------------------------------------------

/// The action a cell will take when the current step commits.
///
/// Written during the evaluate phase and consumed by the commit phase.
/// Every cell ends a step back in [`CellAction::Waiting`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellAction {
    /// No rule matched, or the cell is between steps.
    #[default]
    Waiting,
    /// A living cell will die.
    Die,
    /// A living cell matched a survive threshold.
    StayAlive,
    /// A dead cell will be born.
    Populate,
}

// ---------------------------------------------------------------------------
// Visual category
// ---------------------------------------------------------------------------

/// What a renderer should draw for a cell.
///
/// Derived from the cell's alive flag and fade bookkeeping; never stored.
/// Fading cells are dead for every simulation purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisualState {
    /// Dead and not recently killed.
    Empty,
    /// Currently alive.
    Alive,
    /// Died within the fade window while fading is enabled.
    Fading,
}

// ---------------------------------------------------------------------------
// Controller state
// ---------------------------------------------------------------------------

/// Lifecycle state of the simulation controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControllerState {
    /// Freshly created or just reset. Step count is zero.
    #[default]
    Idle,
    /// The run loop is stepping continuously.
    Running,
    /// The run loop was stopped; grid and step count are preserved.
    Paused,
}

impl ControllerState {
    /// Whether the run loop is active.
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}
