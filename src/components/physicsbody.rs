//! Link from an entity to its rigid body and collider in the physics world.
//!
//! The handles are only meaningful together with the
//! [`PhysicsWorld`](crate::resources::physicsworld::PhysicsWorld) resource
//! that issued them. Both are generational, so a handle whose body has been
//! removed simply fails to resolve.

use bevy_ecs::prelude::Component;
use rapier2d::prelude::{ColliderHandle, RigidBodyHandle};

/// Rigid body + collider pair owned by an entity.
///
/// A null component has neither handle; a collider handle without a body
/// handle is not representable through the constructors.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct PhysicsBody {
    body: Option<RigidBodyHandle>,
    shape: Option<ColliderHandle>,
    /// Cleared when the body is culled off the left of the camera.
    pub active: bool,
}

impl PhysicsBody {
    pub fn new(body: RigidBodyHandle, shape: ColliderHandle) -> Self {
        Self {
            body: Some(body),
            shape: Some(shape),
            active: true,
        }
    }

    pub fn null() -> Self {
        Self {
            body: None,
            shape: None,
            active: false,
        }
    }

    pub fn body(&self) -> Option<RigidBodyHandle> {
        self.body
    }

    pub fn shape(&self) -> Option<ColliderHandle> {
        self.shape
    }

    pub fn is_null(&self) -> bool {
        self.body.is_none()
    }

    /// Drop both handles. The physics resources must already be freed.
    pub fn clear(&mut self) {
        *self = Self::null();
    }
}
