//! Cells, the fixed-size grid, and seed patterns for the Lifegrid automaton.
//!
//! This crate models the board: a rectangle of [`Cell`]s with O(1)
//! coordinate lookup and bounded (non-wrapping) Moore neighborhoods. It has
//! no notion of rules or time; the step engine in `lifegrid-core` drives it.
//!
//! # Modules
//!
//! - [`cell`] -- Per-cell state and the commit transition.
//! - [`error`] -- Error types for grid operations.
//! - [`grid`] -- The [`Grid`]: lookup, neighbor counts, toggles, reset.
//! - [`patterns`] -- Named still-lifes, oscillators, and spaceships, plus
//!   seeded random fill.

pub mod cell;
pub mod error;
pub mod grid;
pub mod patterns;

// Re-export primary types at crate root.
pub use cell::{Cell, FADE_WINDOW};
pub use error::WorldError;
pub use grid::Grid;
pub use patterns::{Pattern, place, randomize};
