//! Per-cell state.
//!
//! A [`Cell`] knows its position, whether it is alive, the action queued for
//! the next commit, and the fade bookkeeping used to report recently-dead
//! cells. It has no idea what its neighbors are; the grid and the step
//! engine supply that.

use lifegrid_types::{CellAction, Position, VisualState};
use serde::{Deserialize, Serialize};

/// Number of commits a dead cell keeps its death mark once fading is on.
///
/// The commit that kills a cell counts as the first; the mark is dropped on
/// the commit that pushes the streak past this value.
pub const FADE_WINDOW: u32 = 8;

/// A single grid cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Fixed coordinate; unique within its grid.
    position: Position,

    /// Whether the cell is currently living.
    alive: bool,

    /// Action queued by the evaluate phase.
    pending: CellAction,

    /// Commits since the cell died, counted only while fading is enabled.
    dead_streak: u32,

    /// Set when a rule kills the cell; cleared when the fade window
    /// elapses, on revival, on manual toggle, and on reset.
    recently_died: bool,
}

impl Cell {
    /// Create a dead, idle cell at `position`.
    pub const fn new(position: Position) -> Self {
        Self {
            position,
            alive: false,
            pending: CellAction::Waiting,
            dead_streak: 0,
            recently_died: false,
        }
    }

    /// The cell's coordinate.
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Whether the cell is living.
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    /// The action queued for the next commit.
    pub const fn pending(&self) -> CellAction {
        self.pending
    }

    /// Commits elapsed since the cell died (fade bookkeeping only).
    pub const fn dead_streak(&self) -> u32 {
        self.dead_streak
    }

    /// Queue an action for the next commit.
    pub const fn set_pending(&mut self, action: CellAction) {
        self.pending = action;
    }

    /// What a renderer should draw for this cell.
    pub const fn visual_state(&self, fade_enabled: bool) -> VisualState {
        if self.alive {
            VisualState::Alive
        } else if fade_enabled && self.recently_died {
            VisualState::Fading
        } else {
            VisualState::Empty
        }
    }

    /// Flip the alive flag by hand.
    ///
    /// Killing a cell this way clears its queued action and does not leave
    /// a fade trail. Returns the new alive state.
    pub const fn toggle(&mut self) -> bool {
        self.set_alive(!self.alive);
        self.alive
    }

    /// Force the alive flag, clearing any queued action and fade trail.
    pub const fn set_alive(&mut self, alive: bool) {
        self.alive = alive;
        self.pending = CellAction::Waiting;
        self.dead_streak = 0;
        self.recently_died = false;
    }

    /// Return the cell to its initial dead, idle state.
    pub const fn reset(&mut self) {
        self.set_alive(false);
    }

    /// Apply the queued action, advance fade bookkeeping, and clear the
    /// queue. Returns the action that was applied.
    ///
    /// Every cell leaves this call in [`CellAction::Waiting`], whatever path
    /// it took, so the next evaluate phase starts clean.
    pub const fn commit(&mut self, fade_enabled: bool) -> CellAction {
        let action = self.pending;
        match action {
            CellAction::Die => {
                self.alive = false;
                self.recently_died = true;
                self.dead_streak = 0;
            }
            CellAction::Populate => {
                self.alive = true;
                self.recently_died = false;
                self.dead_streak = 0;
            }
            CellAction::StayAlive | CellAction::Waiting => {}
        }

        if fade_enabled && !self.alive && self.recently_died {
            self.dead_streak = self.dead_streak.saturating_add(1);
            if self.dead_streak > FADE_WINDOW {
                self.recently_died = false;
                self.dead_streak = 0;
            }
        }

        self.pending = CellAction::Waiting;
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live_cell() -> Cell {
        let mut cell = Cell::new(Position::new(1, 2));
        cell.set_alive(true);
        cell
    }

    #[test]
    fn new_cell_is_dead_and_idle() {
        let cell = Cell::new(Position::new(4, 5));
        assert!(!cell.is_alive());
        assert_eq!(cell.pending(), CellAction::Waiting);
        assert_eq!(cell.dead_streak(), 0);
        assert_eq!(cell.position(), Position::new(4, 5));
        assert_eq!(cell.visual_state(true), VisualState::Empty);
    }

    #[test]
    fn toggle_flips_and_clears_pending() {
        let mut cell = live_cell();
        cell.set_pending(CellAction::StayAlive);
        assert!(!cell.toggle());
        assert_eq!(cell.pending(), CellAction::Waiting);
        assert_eq!(cell.visual_state(true), VisualState::Empty);
        assert!(cell.toggle());
    }

    #[test]
    fn commit_applies_each_action_and_clears_it() {
        let mut cell = live_cell();
        cell.set_pending(CellAction::StayAlive);
        assert_eq!(cell.commit(false), CellAction::StayAlive);
        assert!(cell.is_alive());
        assert_eq!(cell.pending(), CellAction::Waiting);

        cell.set_pending(CellAction::Die);
        assert_eq!(cell.commit(false), CellAction::Die);
        assert!(!cell.is_alive());
        assert_eq!(cell.pending(), CellAction::Waiting);

        cell.set_pending(CellAction::Populate);
        assert_eq!(cell.commit(false), CellAction::Populate);
        assert!(cell.is_alive());
        assert_eq!(cell.pending(), CellAction::Waiting);
    }

    #[test]
    fn waiting_leaves_live_cell_alive() {
        let mut cell = live_cell();
        assert_eq!(cell.commit(true), CellAction::Waiting);
        assert!(cell.is_alive());
    }

    #[test]
    fn fade_lasts_for_the_window_then_clears() {
        let mut cell = live_cell();
        cell.set_pending(CellAction::Die);
        cell.commit(true);
        assert_eq!(cell.dead_streak(), 1);
        assert_eq!(cell.visual_state(true), VisualState::Fading);

        for expected in 2..=FADE_WINDOW {
            cell.commit(true);
            assert_eq!(cell.dead_streak(), expected);
            assert_eq!(cell.visual_state(true), VisualState::Fading);
        }

        cell.commit(true);
        assert_eq!(cell.dead_streak(), 0);
        assert_eq!(cell.visual_state(true), VisualState::Empty);
    }

    #[test]
    fn fade_disabled_never_reports_fading() {
        let mut cell = live_cell();
        cell.set_pending(CellAction::Die);
        cell.commit(false);
        assert_eq!(cell.dead_streak(), 0);
        assert_eq!(cell.visual_state(false), VisualState::Empty);
    }

    #[test]
    fn death_mark_survives_until_fade_is_enabled() {
        let mut cell = live_cell();
        cell.set_pending(CellAction::Die);
        cell.commit(false);
        cell.commit(false);
        assert_eq!(cell.dead_streak(), 0);

        cell.commit(true);
        assert_eq!(cell.dead_streak(), 1);
        assert_eq!(cell.visual_state(true), VisualState::Fading);
    }

    #[test]
    fn revival_clears_fade() {
        let mut cell = live_cell();
        cell.set_pending(CellAction::Die);
        cell.commit(true);
        cell.commit(true);
        cell.set_pending(CellAction::Populate);
        cell.commit(true);
        assert_eq!(cell.dead_streak(), 0);
        assert_eq!(cell.visual_state(true), VisualState::Alive);
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut cell = live_cell();
        cell.set_pending(CellAction::Die);
        cell.commit(true);
        cell.reset();
        assert_eq!(cell, Cell::new(Position::new(1, 2)));
    }
}
