//! Plain data structs shared across the workspace.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A cell coordinate. `x` is the column, `y` the row; both start at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Column.
    pub x: usize,
    /// Row.
    pub y: usize,
}

impl Position {
    /// Create a position from a column and row.
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Aggregate counters published once per completed step.
///
/// This is the whole reporting surface: renderers and status lines poll or
/// subscribe to it instead of walking the grid themselves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepStats {
    /// Number of completed steps since the last reset.
    pub step_count: u64,
    /// Number of living cells.
    pub alive_count: usize,
    /// Largest live-neighbor count over every cell, alive or dead.
    pub max_neighbor_count: u8,
}

/// A copy of the grid's alive flags, detached from the live grid.
///
/// Row-major: the flag for `(x, y)` is at `y * width + x`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSnapshot {
    /// Number of columns.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
    /// Alive flag per cell in row-major order.
    pub alive: Vec<bool>,
}

impl GridSnapshot {
    /// Alive flag at `(x, y)`, or `None` when out of bounds.
    pub fn is_alive(&self, x: usize, y: usize) -> Option<bool> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y.checked_mul(self.width)?.checked_add(x)?;
        self.alive.get(idx).copied()
    }

    /// Number of living cells in the snapshot.
    pub fn alive_count(&self) -> usize {
        self.alive.iter().filter(|alive| **alive).count()
    }

    /// Positions of every living cell, row by row.
    pub fn alive_positions(&self) -> Vec<Position> {
        self.alive
            .iter()
            .enumerate()
            .filter(|(_, alive)| **alive)
            .filter_map(|(idx, _)| {
                // A zero width yields no positions instead of a division by zero.
                let x = idx.checked_rem(self.width)?;
                let y = idx.checked_div(self.width)?;
                Some(Position::new(x, y))
            })
            .collect()
    }
}
