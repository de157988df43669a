//! Shared type definitions for the Lifegrid cellular automaton.
//!
//! This crate holds the plain data types that cross crate boundaries:
//! the per-cell action and visual enums, the tunable [`RuleSet`], and the
//! statistics snapshot published after every step.
//!
//! # Modules
//!
//! - [`enums`] -- Cell actions, visual categories, and controller states
//! - [`rules`] -- The five neighbor thresholds plus the fade toggle
//! - [`structs`] -- Positions, step statistics, and grid snapshots

pub mod enums;
pub mod rules;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{CellAction, ControllerState, VisualState};
pub use rules::{RawRules, RuleError, RuleSet};
pub use structs::{GridSnapshot, Position, StepStats};
