//! Shared camera view used for visibility culling.
//!
//! Systems agree on a single visible rectangle through this resource. When it
//! is absent, nothing is culled.

use bevy_ecs::prelude::Resource;
use glam::Vec2;

#[derive(Resource, Debug, Clone, Copy)]
pub struct CameraView {
    pub center: Vec2,
    pub half_extents: Vec2,
    /// Track the player's x each frame.
    pub follow_player: bool,
}

impl CameraView {
    pub fn new(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            center,
            half_extents,
            follow_player: false,
        }
    }

    pub fn visible_left(&self) -> f32 {
        self.center.x - self.half_extents.x
    }

    pub fn visible_right(&self) -> f32 {
        self.center.x + self.half_extents.x
    }
}
