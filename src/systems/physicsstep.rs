//! Fixed-timestep physics scheduler.
//!
//! [`physics_step`] is called once per render frame with the frame's elapsed
//! time. It accumulates that time and, for every whole
//! [`FIXED_TIMESTEP`] it holds, runs one integration pass:
//!
//! 1. Step the rigid-body world ([`SUB_STEPS`] solver sub-steps) and move
//!    body-less beat markers by the same interval.
//! 2. Classify the player's contacts into death/grounded events.
//! 3. Snap grouped children to their parent bodies.
//! 4. Sync body positions into transforms; cull bodies left of the camera.
//! 5. Trigger [`AfterPhysicsStep`].
//! 6. Resolve the jump latch into the grounded flag.
//! 7. Release bodies queued for removal during this pass.
//!
//! The order is fixed. Observers of the events in (2) run before (3) starts,
//! so anything they queue for removal is still alive when later phases look
//! at it and gone once (7) completes.
//!
//! With no live player, or with the scheduler inactive, the call is a no-op:
//! not even the accumulator moves.
//!
//! Catch-up is unbounded by default, so the passes run over any sequence of
//! frames always equal the whole timesteps in their summed duration. Setting
//! [`PhysicsScheduler::max_steps_per_frame`] trades that guarantee for a cap:
//! once a frame hits it, the remaining whole timesteps are dropped and only
//! the fraction of a timestep is carried over.

use bevy_ecs::prelude::*;
use log::{trace, warn};

use crate::constants::{FIXED_TIMESTEP, SUB_STEPS};
use crate::events::physics::AfterPhysicsStep;
use crate::resources::physicsworld::PhysicsWorld;
use crate::resources::playerstate::PlayerState;
use crate::resources::scheduler::PhysicsScheduler;
use crate::systems::contacts::classify_player_contacts;
use crate::systems::group::propagate_group_transforms;
use crate::systems::lifecycle::release_pending_bodies;
use crate::systems::scroll::advance_beat_markers;
use crate::systems::sync::sync_and_cull_bodies;

/// Feed `frame_dt` seconds into the scheduler and run every integration it
/// pays for. Returns the number of passes executed.
pub fn physics_step(world: &mut World, frame_dt: f32) -> u32 {
    let Some(scheduler) = world.get_resource::<PhysicsScheduler>() else {
        return 0;
    };
    let (active, player, max_steps) = (
        scheduler.active,
        scheduler.player,
        scheduler.max_steps_per_frame,
    );
    let player_alive = player.is_some_and(|p| world.get_entity(p).is_ok());
    if !active || !player_alive {
        trace!("physics idle (active={}, player={:?})", active, player);
        return 0;
    }

    world.resource_mut::<PhysicsScheduler>().accumulator += frame_dt;

    let mut steps = 0;
    while world.resource::<PhysicsScheduler>().accumulator >= FIXED_TIMESTEP {
        if max_steps.is_some_and(|max| steps >= max) {
            let mut scheduler = world.resource_mut::<PhysicsScheduler>();
            let dropped = (scheduler.accumulator / FIXED_TIMESTEP).floor();
            scheduler.accumulator -= dropped * FIXED_TIMESTEP;
            if scheduler.accumulator >= FIXED_TIMESTEP {
                scheduler.accumulator -= FIXED_TIMESTEP;
            }
            scheduler.accumulator = scheduler.accumulator.max(0.0);
            warn!(
                "physics fell behind, dropped {} steps after {} this frame",
                dropped, steps
            );
            break;
        }

        integrate_once(world);

        let mut scheduler = world.resource_mut::<PhysicsScheduler>();
        scheduler.accumulator -= FIXED_TIMESTEP;
        scheduler.steps_taken += 1;
        steps += 1;
    }
    steps
}

/// One fixed interval: phases 1 to 7 in order.
fn integrate_once(world: &mut World) {
    world
        .resource_mut::<PhysicsWorld>()
        .step(FIXED_TIMESTEP, SUB_STEPS);
    run_logged(world, "advance_beat_markers", advance_beat_markers);

    run_logged(world, "classify_player_contacts", classify_player_contacts);
    run_logged(world, "propagate_group_transforms", propagate_group_transforms);
    run_logged(world, "sync_and_cull_bodies", sync_and_cull_bodies);

    world.trigger(AfterPhysicsStep);

    if let Some(mut state) = world.get_resource_mut::<PlayerState>() {
        state.resolve_jump();
    }

    release_pending_bodies(world);
}

/// Run a cached system, logging instead of failing when it cannot run (for
/// example because a resource it reads is missing).
pub(crate) fn run_logged<M>(
    world: &mut World,
    name: &str,
    system: impl IntoSystem<(), (), M> + 'static,
) {
    if let Err(e) = world.run_system_cached(system) {
        warn!("system {} did not run: {}", name, e);
    }
}
