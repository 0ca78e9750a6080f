//! Grounded flag and jump latch for the tracked player.
//!
//! `grounded` is raised by the observer of
//! [`PlayerGrounded`](crate::events::physics::PlayerGrounded) and lowered when
//! the jump latch is resolved in step 6 of the physics step. The latch is a
//! one-shot: set by an accepted
//! [`JumpRequest`](crate::events::input::JumpRequest), consumed exactly once.

use bevy_ecs::prelude::Resource;

use crate::resources::Resettable;

#[derive(Resource, Debug, Clone, Default)]
pub struct PlayerState {
    pub grounded: bool,
    /// Jump accepted this frame, not yet resolved.
    pub jump_requested: bool,
    pub deaths: u32,
    pub groundings: u32,
}

impl PlayerState {
    /// Consume the jump latch. A pending jump leaves the ground.
    pub fn resolve_jump(&mut self) {
        if self.jump_requested {
            self.grounded = false;
        }
        self.jump_requested = false;
    }
}

impl Resettable for PlayerState {
    fn reset(&mut self) {
        self.grounded = false;
        self.jump_requested = false;
    }
}
