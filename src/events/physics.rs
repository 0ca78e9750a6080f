//! Gameplay events produced by the physics step.
//!
//! The step publishes these through the world's observer channel; audio, UI
//! and game-state code subscribe with [`World::add_observer`]. Nothing here
//! is global: every [`World`] is its own bus, which keeps tests isolated.
//!
//! The observers in this module only maintain
//! [`PlayerState`](crate::resources::playerstate::PlayerState). Game-specific
//! reactions (restart, score, sound) belong to the caller.
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::{debug, info};

use crate::resources::playerstate::PlayerState;

/// The player touched an obstacle, or hit a surface head-on from the left.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerDeath {
    pub entity: Entity,
}

/// The player is resting on a surface below it.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerGrounded {
    pub entity: Entity,
}

/// Fired once per integration, after transforms have been synced.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct AfterPhysicsStep;

/// Raise the grounded flag.
pub fn observe_player_grounded(trigger: On<PlayerGrounded>, mut state: ResMut<PlayerState>) {
    if !state.grounded {
        debug!("player {:?} grounded", trigger.event().entity);
    }
    state.grounded = true;
    state.groundings += 1;
}

/// Count deaths. Restarting the level is up to the game loop.
pub fn observe_player_death(trigger: On<PlayerDeath>, mut state: ResMut<PlayerState>) {
    state.deaths += 1;
    info!("player {:?} died ({} total)", trigger.event().entity, state.deaths);
}
