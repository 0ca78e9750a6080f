//! ECS components for entities.
//!
//! This module groups all component types that can be attached to entities in
//! the game world. Every level object carries a [`transform::Transform`] and a
//! [`tag::Tag`]; the rest are optional.
//!
//! Submodules overview:
//! - [`appearance`] – texture key and tint for the render layer
//! - [`groupmembership`] – children owned by a group placeholder
//! - [`parentrelation`] – lock an entity to a parent's body with an offset
//! - [`physicsbody`] – rigid body and collider handles plus the active flag
//! - [`tag`] – gameplay classification (player, platform, obstacle, ...)
//! - [`tombstone`] – marker for entities destroyed at the end of the frame
//! - [`transform`] – position, rotation and scale with a spawn snapshot

pub mod appearance;
pub mod groupmembership;
pub mod parentrelation;
pub mod physicsbody;
pub mod tag;
pub mod tombstone;
pub mod transform;
