//! Component for locking an entity to its group's parent body.
//!
//! When an entity has the [`ParentRelation`] component, the group propagator
//! overwrites its position every physics step with the parent body's position
//! plus the stored offset.
//!
//! Children never own a [`PhysicsBody`](super::physicsbody::PhysicsBody):
//! the group's collider lives on the parent and the children only follow it.

use bevy_ecs::prelude::{Component, Entity};
use glam::Vec2;

/// Parent entity and the offset fixed at group creation.
#[derive(Debug, Clone, Copy, Component)]
pub struct ParentRelation {
    /// The placeholder entity whose body carries the group collider.
    pub parent: Entity,
    /// Offset from the parent's position in world units.
    pub local_offset: Vec2,
}

impl ParentRelation {
    pub fn new(parent: Entity, local_offset: Vec2) -> Self {
        Self {
            parent,
            local_offset,
        }
    }
}
