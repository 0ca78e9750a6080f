//! Deferred despawn marker.
//!
//! Gameplay code that wants an entity gone during a frame inserts
//! [`Tombstone`] instead of destroying it on the spot. The frame driver sweeps
//! all tombstoned entities once per frame, after the physics step, through the
//! two-phase [`destroy_entity`](crate::systems::lifecycle::destroy_entity)
//! path. Nothing iterating live queries ever sees an entity vanish under it.

use bevy_ecs::prelude::Component;

/// Marks an entity for destruction at the end of the current frame.
#[derive(Component, Clone, Copy, Debug)]
pub struct Tombstone;
