//! ECS resources made available to systems.
//!
//! This module groups the long-lived data injected into the ECS world and
//! accessed by systems during execution: the rigid-body world, the step
//! scheduler, player and camera state, tempo, and configuration.
//!
//! Overview
//! - `camera` – visible rectangle used for culling
//! - `gameconfig` – tunables loaded from an INI file
//! - `pendingremovals` – bodies queued for destruction at the end of a step
//! - `physicsworld` – rapier2d world plus the body → entity side-table
//! - `playerstate` – grounded flag and one-shot jump latch
//! - `scheduler` – fixed-timestep accumulator and tracked player
//! - `tempo` – song BPM and beat timestamps
//! - `worldtime` – render-frame time and delta
pub mod camera;
pub mod gameconfig;
pub mod pendingremovals;
pub mod physicsworld;
pub mod playerstate;
pub mod scheduler;
pub mod tempo;
pub mod worldtime;

/// Per-level state that can be returned to its starting values.
///
/// Implemented by resources that hold run-time progress (accumulators,
/// latches, clocks) but not by configuration.
pub trait Resettable {
    fn reset(&mut self);
}
