//! Tempo Runner library.
//!
//! The entity and physics core of a tempo-driven 2D platformer: a
//! fixed-timestep scheduler over a rapier2d world, contact classification
//! into gameplay events, group transform propagation and the entity
//! lifecycle that keeps ECS entities and rigid bodies paired.
//!
//! Exposed as a library for integration tests and for the render/audio
//! front ends that sit on top of it.

pub mod components;
pub mod constants;
pub mod events;
pub mod game;
pub mod resources;
pub mod systems;
