//! Step engine, run loop, and controller for the Lifegrid automaton.
//!
//! This crate owns the two-phase step that advances the grid and the
//! control plane that repeats it:
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `lifegrid-config.yaml` into
//!   strongly-typed structs.
//! - [`controller`] -- [`SimulationController`]: start, stop, reset, and the
//!   cell/reporting surface external callers use.
//! - [`operator`] -- Shared atomic control state (stop flag, step interval).
//! - [`runner`] -- The async run loop and the [`StepCallback`] hook.
//! - [`step`] -- Evaluate-then-commit stepping, serial or parallel.
//!
//! [`SimulationController`]: controller::SimulationController
//! [`StepCallback`]: runner::StepCallback

pub mod config;
pub mod controller;
pub mod operator;
pub mod runner;
pub mod step;
