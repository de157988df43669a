//! Seed patterns for populating a grid.
//!
//! Named shapes are stored as `(x, y)` offsets from their top-left corner
//! and stamped onto the grid with [`place`]. [`randomize`] fills the whole
//! grid from a seeded RNG so the same seed always yields the same board.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::WorldError;
use crate::grid::Grid;

/// A well-known Life pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pattern {
    /// 2x2 still-life.
    Block,
    /// Period-2 oscillator, horizontal phase.
    Blinker,
    /// Period-2 oscillator made of two diagonal blocks.
    Beacon,
    /// The smallest spaceship; travels diagonally down-right.
    Glider,
    /// Five-cell methuselah that stabilizes after 1103 generations.
    RPentomino,
}

impl Pattern {
    /// Every named pattern.
    pub const ALL: [Self; 5] = [
        Self::Block,
        Self::Blinker,
        Self::Beacon,
        Self::Glider,
        Self::RPentomino,
    ];

    /// Live cells as offsets from the pattern's top-left corner.
    pub const fn cells(self) -> &'static [(usize, usize)] {
        match self {
            Self::Block => &[(0, 0), (1, 0), (0, 1), (1, 1)],
            Self::Blinker => &[(0, 0), (1, 0), (2, 0)],
            Self::Beacon => &[
                (0, 0),
                (1, 0),
                (0, 1),
                (1, 1),
                (2, 2),
                (3, 2),
                (2, 3),
                (3, 3),
            ],
            Self::Glider => &[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)],
            Self::RPentomino => &[(1, 0), (2, 0), (0, 1), (1, 1), (1, 2)],
        }
    }

    /// Bounding box as `(width, height)`.
    pub fn extent(self) -> (usize, usize) {
        self.cells().iter().fold((0, 0), |(w, h), &(x, y)| {
            (w.max(x.saturating_add(1)), h.max(y.saturating_add(1)))
        })
    }
}

/// Stamp `pattern` onto `grid` with its top-left corner at `(x, y)`.
///
/// Only the pattern's live cells are written; surrounding cells are left as
/// they are. The whole pattern must fit, otherwise nothing is written.
pub fn place(grid: &mut Grid, pattern: Pattern, x: usize, y: usize) -> Result<(), WorldError> {
    let mut targets = Vec::with_capacity(pattern.cells().len());
    for &(dx, dy) in pattern.cells() {
        let tx = x.checked_add(dx).ok_or(WorldError::ArithmeticOverflow)?;
        let ty = y.checked_add(dy).ok_or(WorldError::ArithmeticOverflow)?;
        if grid.index_of(tx, ty).is_none() {
            return Err(WorldError::OutOfBounds {
                x: tx,
                y: ty,
                width: grid.width(),
                height: grid.height(),
            });
        }
        targets.push((tx, ty));
    }
    for (tx, ty) in targets {
        grid.set_alive(tx, ty, true)?;
    }
    Ok(())
}

/// Overwrite every cell with a random alive flag.
///
/// Each cell is alive with probability `density`. Returns the number of
/// living cells afterwards.
pub fn randomize(grid: &mut Grid, density: f64, seed: u64) -> Result<usize, WorldError> {
    if !(0.0..=1.0).contains(&density) {
        return Err(WorldError::InvalidDensity(density));
    }
    let mut rng = StdRng::seed_from_u64(seed);
    for cell in grid.cells_mut() {
        cell.set_alive(rng.random_bool(density));
    }
    Ok(grid.alive_count())
}
