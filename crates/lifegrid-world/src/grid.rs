//! The fixed-size board.
//!
//! A [`Grid`] owns every [`Cell`] in a row-major `Vec`, so `(x, y)` lookup
//! is a single multiply-add. Bounds are fixed at construction and there is
//! no wraparound: positions past an edge simply have fewer neighbors.

use lifegrid_types::{GridSnapshot, Position, VisualState};
use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::error::WorldError;

/// Offsets of the eight Moore neighbors, row above first.
const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// A `width` x `height` rectangle of cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    /// Number of columns.
    width: usize,
    /// Number of rows.
    height: usize,
    /// Cells in row-major order; the cell at `(x, y)` is at `y * width + x`.
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a grid of dead cells.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::EmptyGrid`] if either dimension is zero, or
    /// [`WorldError::ArithmeticOverflow`] if `width * height` overflows.
    pub fn new(width: usize, height: usize) -> Result<Self, WorldError> {
        if width == 0 || height == 0 {
            return Err(WorldError::EmptyGrid { width, height });
        }
        let len = width
            .checked_mul(height)
            .ok_or(WorldError::ArithmeticOverflow)?;
        let mut cells = Vec::with_capacity(len);
        for y in 0..height {
            for x in 0..width {
                cells.push(Cell::new(Position::new(x, y)));
            }
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Number of columns.
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells.
    pub const fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`; a grid has at least one cell.
    pub const fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// All cells in row-major order, mutably.
    ///
    /// Positions are not exposed for mutation, so the layout invariant
    /// holds no matter what the caller does with the slice.
    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Row-major index of `(x, y)`, or `None` when out of bounds.
    pub const fn index_of(&self, x: usize, y: usize) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        // In bounds, so y * width + x < width * height, which fit at construction.
        match y.checked_mul(self.width) {
            Some(row) => row.checked_add(x),
            None => None,
        }
    }

    fn checked_index(&self, x: usize, y: usize) -> Result<usize, WorldError> {
        self.index_of(x, y).ok_or(WorldError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        })
    }

    /// The cell at `(x, y)`.
    pub fn cell(&self, x: usize, y: usize) -> Result<&Cell, WorldError> {
        let idx = self.checked_index(x, y)?;
        self.cells
            .get(idx)
            .ok_or(WorldError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
    }

    fn cell_mut(&mut self, x: usize, y: usize) -> Result<&mut Cell, WorldError> {
        let idx = self.checked_index(x, y)?;
        let (width, height) = (self.width, self.height);
        self.cells.get_mut(idx).ok_or(WorldError::OutOfBounds {
            x,
            y,
            width,
            height,
        })
    }

    /// Whether the cell at `(x, y)` is alive.
    pub fn is_alive(&self, x: usize, y: usize) -> Result<bool, WorldError> {
        self.cell(x, y).map(Cell::is_alive)
    }

    /// What a renderer should draw at `(x, y)`.
    pub fn visual_state(
        &self,
        x: usize,
        y: usize,
        fade_enabled: bool,
    ) -> Result<VisualState, WorldError> {
        self.cell(x, y).map(|cell| cell.visual_state(fade_enabled))
    }

    /// Flip the cell at `(x, y)` and return its new alive state.
    ///
    /// Calling this twice restores the original state; no other cell is
    /// touched.
    pub fn toggle(&mut self, x: usize, y: usize) -> Result<bool, WorldError> {
        self.cell_mut(x, y).map(Cell::toggle)
    }

    /// Force the cell at `(x, y)` alive or dead.
    pub fn set_alive(&mut self, x: usize, y: usize, alive: bool) -> Result<(), WorldError> {
        self.cell_mut(x, y)?.set_alive(alive);
        Ok(())
    }

    /// Return every cell to dead, idle, with no fade trail.
    pub fn reset(&mut self) {
        self.cells.iter_mut().for_each(Cell::reset);
    }

    /// Number of living neighbors of `(x, y)`, between 0 and 8.
    pub fn neighbor_count(&self, x: usize, y: usize) -> Result<u8, WorldError> {
        self.checked_index(x, y)?;
        Ok(self.count_neighbors(x, y))
    }

    /// Number of living neighbors of the cell at row-major `index`.
    ///
    /// Returns 0 for an index past the end.
    pub fn neighbor_count_at(&self, index: usize) -> u8 {
        if index >= self.cells.len() {
            return 0;
        }
        // width > 0 by construction, so neither fallback is taken.
        let x = index.checked_rem(self.width).unwrap_or(0);
        let y = index.checked_div(self.width).unwrap_or(0);
        self.count_neighbors(x, y)
    }

    fn count_neighbors(&self, x: usize, y: usize) -> u8 {
        let count = NEIGHBOR_OFFSETS
            .iter()
            .filter(|&&(dx, dy)| {
                let (Some(nx), Some(ny)) = (x.checked_add_signed(dx), y.checked_add_signed(dy))
                else {
                    return false;
                };
                self.index_of(nx, ny)
                    .and_then(|idx| self.cells.get(idx))
                    .is_some_and(Cell::is_alive)
            })
            .count();
        // At most eight neighbors.
        u8::try_from(count).unwrap_or(u8::MAX)
    }

    /// Number of living cells.
    pub fn alive_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_alive()).count()
    }

    /// Largest neighbor count over every cell, alive or dead.
    ///
    /// Diagnostic only; nothing in the step depends on it.
    pub fn max_neighbor_count(&self) -> u8 {
        (0..self.cells.len())
            .map(|idx| self.neighbor_count_at(idx))
            .max()
            .unwrap_or(0)
    }

    /// Copy the alive flags out of the grid.
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            width: self.width,
            height: self.height,
            alive: self.cells.iter().map(Cell::is_alive).collect(),
        }
    }
}
