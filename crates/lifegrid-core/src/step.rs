//! The two-phase step that advances the grid by one generation.
//!
//! 1. **Evaluate** -- every cell's next action is computed from the
//!    pre-step grid and written into its pending slot. Alive flags are not
//!    touched, so evaluation order does not matter and the pass can be
//!    split across threads freely.
//!
//! 2. **Commit** -- every cell applies its own pending action, advances its
//!    fade bookkeeping, and clears the slot back to `Waiting`.
//!
//! Collecting the evaluate results is the barrier between the phases: no
//! cell commits before every cell has been evaluated, and [`step`] takes
//! `&mut Grid`, so generation N+1 cannot start before generation N has
//! fully committed.

use lifegrid_types::{CellAction, RuleSet, StepStats};
use lifegrid_world::{Cell, Grid};
use rayon::prelude::*;
use tracing::debug;

/// Errors that can occur during step execution.
#[derive(Debug, thiserror::Error)]
pub enum StepError {
    /// The step counter would overflow.
    #[error("step counter overflow: cannot advance beyond u64::MAX")]
    StepCounterOverflow,
}

/// How the evaluate and commit passes are scheduled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StepMode {
    /// One thread, row-major order.
    Serial,
    /// Per-cell work spread over the rayon thread pool.
    #[default]
    Parallel,
}

impl StepMode {
    /// Map a config `parallel` flag to a mode.
    pub const fn from_parallel(parallel: bool) -> Self {
        if parallel { Self::Parallel } else { Self::Serial }
    }
}

/// How many cells took each action during one commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// Dead cells that became alive.
    pub births: usize,
    /// Living cells that died.
    pub deaths: usize,
    /// Living cells that matched a survive threshold.
    pub survivals: usize,
}

impl StepOutcome {
    const fn record(mut self, action: CellAction) -> Self {
        match action {
            CellAction::Populate => self.births = self.births.saturating_add(1),
            CellAction::Die => self.deaths = self.deaths.saturating_add(1),
            CellAction::StayAlive => self.survivals = self.survivals.saturating_add(1),
            CellAction::Waiting => {}
        }
        self
    }

    const fn merge(self, other: Self) -> Self {
        Self {
            births: self.births.saturating_add(other.births),
            deaths: self.deaths.saturating_add(other.deaths),
            survivals: self.survivals.saturating_add(other.survivals),
        }
    }
}

/// Decide one cell's next action from its alive flag and neighbor count.
///
/// For a living cell the death check runs first and the survive check
/// second, unconditionally: when custom thresholds make both true for the
/// same count, survive wins. With the classic thresholds the two never
/// overlap.
pub fn evaluate_cell(rules: &RuleSet, alive: bool, neighbors: u8) -> CellAction {
    let n = i32::from(neighbors);
    if alive {
        let mut action = CellAction::Waiting;
        if rules.dies_at(n) {
            action = CellAction::Die;
        }
        if rules.survives_at(n) {
            action = CellAction::StayAlive;
        }
        action
    } else if rules.born_at(n) {
        CellAction::Populate
    } else {
        CellAction::Waiting
    }
}

/// Phase 1: compute every cell's next action into its pending slot.
///
/// No alive flag changes here.
pub fn evaluate(grid: &mut Grid, rules: &RuleSet, mode: StepMode) {
    let actions: Vec<CellAction> = {
        let view: &Grid = grid;
        let decide = |(idx, cell): (usize, &Cell)| {
            evaluate_cell(rules, cell.is_alive(), view.neighbor_count_at(idx))
        };
        match mode {
            StepMode::Serial => view.cells().iter().enumerate().map(decide).collect(),
            StepMode::Parallel => view.cells().par_iter().enumerate().map(decide).collect(),
        }
    };

    match mode {
        StepMode::Serial => {
            for (cell, action) in grid.cells_mut().iter_mut().zip(actions) {
                cell.set_pending(action);
            }
        }
        StepMode::Parallel => {
            grid.cells_mut()
                .par_iter_mut()
                .zip(actions.into_par_iter())
                .for_each(|(cell, action)| cell.set_pending(action));
        }
    }
}

/// Phase 2: apply every pending action and clear it.
pub fn commit(grid: &mut Grid, fade_enabled: bool, mode: StepMode) -> StepOutcome {
    match mode {
        StepMode::Serial => grid
            .cells_mut()
            .iter_mut()
            .map(|cell| cell.commit(fade_enabled))
            .fold(StepOutcome::default(), StepOutcome::record),
        StepMode::Parallel => grid
            .cells_mut()
            .par_iter_mut()
            .map(|cell| cell.commit(fade_enabled))
            .fold(StepOutcome::default, StepOutcome::record)
            .reduce(StepOutcome::default, StepOutcome::merge),
    }
}

/// Advance `grid` by exactly one generation under `rules`.
///
/// Returns only after both phases have finished.
pub fn step(grid: &mut Grid, rules: &RuleSet, mode: StepMode) -> StepOutcome {
    evaluate(grid, rules, mode);
    commit(grid, rules.fade_enabled, mode)
}

/// Everything one simulation owns: the board, its rules, and its clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct World {
    /// The board.
    pub grid: Grid,
    /// Rules applied on the next step.
    pub rules: RuleSet,
    /// Completed steps since construction or the last reset.
    pub step_count: u64,
}

impl World {
    /// Wrap a grid and rules with a zeroed step counter.
    pub const fn new(grid: Grid, rules: RuleSet) -> Self {
        Self {
            grid,
            rules,
            step_count: 0,
        }
    }

    /// Current aggregate counters.
    pub fn stats(&self) -> StepStats {
        StepStats {
            step_count: self.step_count,
            alive_count: self.grid.alive_count(),
            max_neighbor_count: self.grid.max_neighbor_count(),
        }
    }

    /// Clear the grid and the step counter. Rules are kept.
    pub fn reset(&mut self) {
        self.grid.reset();
        self.step_count = 0;
    }
}

/// Summary of a single step's execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSummary {
    /// Counters after the step committed.
    pub stats: StepStats,
    /// Per-action tallies for the step.
    pub outcome: StepOutcome,
}

/// Run one step on `world`, bump its counter, and recompute statistics.
///
/// The counter is checked before the grid is touched, so an overflow
/// leaves the world unchanged.
pub fn run_step(world: &mut World, mode: StepMode) -> Result<StepSummary, StepError> {
    let next = world
        .step_count
        .checked_add(1)
        .ok_or(StepError::StepCounterOverflow)?;

    let outcome = step(&mut world.grid, &world.rules, mode);
    world.step_count = next;
    let stats = world.stats();

    debug!(
        step = stats.step_count,
        alive = stats.alive_count,
        births = outcome.births,
        deaths = outcome.deaths,
        max_neighbors = stats.max_neighbor_count,
        "Step committed"
    );

    Ok(StepSummary { stats, outcome })
}
