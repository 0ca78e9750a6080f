//! Engine systems.
//!
//! This module groups the ECS systems and world-level operations that
//! advance the simulation.
//!
//! Submodules overview
//! - [`camera`] – optional camera follow of the player
//! - [`contacts`] – turn the player's contact manifolds into death/grounded events
//! - [`group`] – snap grouped children to their parent's body
//! - [`lifecycle`] – create, destroy, group and reset physics-backed entities
//! - [`physicsstep`] – fixed-timestep accumulator and the per-step pipeline
//! - [`scroll`] – tempo-driven scrolling of level geometry and beat markers
//! - [`sync`] – copy body positions into transforms and cull off-screen bodies
//! - [`time`] – update render-frame time and delta

pub mod camera;
pub mod contacts;
pub mod group;
pub mod lifecycle;
pub mod physicsstep;
pub mod scroll;
pub mod sync;
pub mod time;
