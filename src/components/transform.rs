//! World transform with an immutable spawn snapshot.
//!
//! Every entity created through the lifecycle factory carries a [`Transform`].
//! The current fields are mutated by the physics step (body sync), the group
//! propagator, and the scroll systems. The snapshot taken at creation is never
//! mutated and is what [`Transform::reset`] restores.

use bevy_ecs::prelude::Component;
use glam::Vec3;

/// Position, rotation and scale captured when the entity was created.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformSnapshot {
    pub position: Vec3,
    /// Rotation around z in degrees.
    pub rotation: f32,
    pub scale: Vec3,
}

/// Current transform of an entity plus its initial snapshot.
///
/// `scale` doubles as the world-space size of the entity's collider: a box
/// of scale `(2, 1, _)` spans two units horizontally and one vertically.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Rotation around z in degrees.
    pub rotation: f32,
    pub scale: Vec3,
    initial: TransformSnapshot,
}

impl Transform {
    /// Create a transform whose initial snapshot equals the given values.
    pub fn new(position: Vec3, rotation: f32, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
            initial: TransformSnapshot {
                position,
                rotation,
                scale,
            },
        }
    }

    pub fn initial(&self) -> &TransformSnapshot {
        &self.initial
    }

    /// Restore position, rotation and scale from the snapshot.
    pub fn reset(&mut self) {
        self.position = self.initial.position;
        self.rotation = self.initial.rotation;
        self.scale = self.initial.scale;
    }

    /// Rightmost x covered by the entity.
    pub fn right_edge(&self) -> f32 {
        self.position.x + self.scale.x * 0.5
    }

    /// Leftmost x covered by the entity.
    pub fn left_edge(&self) -> f32 {
        self.position.x - self.scale.x * 0.5
    }
}
