//! Jump requests coming from the input layer.
//!
//! The input collaborator triggers [`JumpRequest`] carrying whether it saw the
//! player grounded. An accepted request sets the one-shot latch in
//! [`PlayerState`] and launches the player body; step 6 of the physics step
//! resolves the latch into the grounded flag.

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::debug;

use crate::components::physicsbody::PhysicsBody;
use crate::resources::gameconfig::GameConfig;
use crate::resources::physicsworld::PhysicsWorld;
use crate::resources::playerstate::PlayerState;
use crate::resources::scheduler::PhysicsScheduler;

#[derive(Event, Debug, Clone, Copy)]
pub struct JumpRequest {
    /// Whether the player was grounded when the request was made.
    pub grounded: bool,
}

/// Accept a grounded jump: latch it and set the player's upward velocity.
pub fn observe_jump_request(
    trigger: On<JumpRequest>,
    mut state: ResMut<PlayerState>,
    scheduler: Res<PhysicsScheduler>,
    config: Res<GameConfig>,
    bodies: Query<&PhysicsBody>,
    mut physics: ResMut<PhysicsWorld>,
) {
    if !trigger.event().grounded {
        return;
    }
    state.jump_requested = true;

    let Some(player) = scheduler.player else {
        return;
    };
    let Some(body) = bodies.get(player).ok().and_then(|pb| pb.body()) else {
        return;
    };
    if let Some(mut velocity) = physics.linear_velocity(body) {
        velocity.y = config.jump_velocity;
        physics.set_linear_velocity(body, velocity);
        debug!("jump accepted, vy={}", velocity.y);
    }
}
