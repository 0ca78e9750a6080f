//! World assembly and the per-frame driver.
//!
//! [`build_world`] inserts every resource the core needs and registers the
//! built-in observers. [`run_frame`] is what a front end calls once per
//! rendered frame. [`spawn_demo_level`] generates a small playable level for
//! the headless binary and the integration tests.

use bevy_ecs::observer::Observer;
use bevy_ecs::prelude::*;
use glam::{Vec2, Vec3};
use log::info;

use crate::components::appearance::Appearance;
use crate::components::tag::Tag;
use crate::events::input::observe_jump_request;
use crate::events::physics::{observe_player_death, observe_player_grounded};
use crate::resources::Resettable;
use crate::resources::camera::CameraView;
use crate::resources::gameconfig::GameConfig;
use crate::resources::pendingremovals::PendingBodyRemovals;
use crate::resources::physicsworld::{PhysicsWorld, ShapeKind};
use crate::resources::playerstate::PlayerState;
use crate::resources::scheduler::PhysicsScheduler;
use crate::resources::tempo::TempoScroll;
use crate::resources::worldtime::WorldTime;
use crate::systems::camera::camera_follow_player;
use crate::systems::lifecycle::{
    SpawnDescriptor, create_default_entity, create_entity, create_group, release_pending_bodies,
    reset_to_initial_state, sweep_tombstones,
};
use crate::systems::physicsstep::{physics_step, run_logged};
use crate::systems::scroll::{apply_scroll_velocity, spawn_beat_markers};
use crate::systems::time::update_world_time;

/// Create a world with all core resources and observers in place.
pub fn build_world(config: &GameConfig) -> World {
    let mut world = World::new();

    world.insert_resource(PhysicsWorld::new(config.gravity));
    world.insert_resource(PhysicsScheduler::default().with_max_steps(config.max_steps_per_frame));
    world.insert_resource(PlayerState::default());
    world.insert_resource(PendingBodyRemovals::default());
    world.insert_resource(TempoScroll::new(config.bpm, config.units_per_beat));
    world.insert_resource(CameraView::new(Vec2::ZERO, config.camera_half_extents()));
    world.insert_resource(WorldTime::default());
    world.insert_resource(config.clone());

    world.spawn(Observer::new(observe_player_grounded));
    world.spawn(Observer::new(observe_player_death));
    world.spawn(Observer::new(observe_jump_request));
    // Observers must be registered before the first step triggers anything.
    world.flush();

    info!(
        "world ready: gravity=({}, {}), bpm={}, scroll={} u/s",
        config.gravity.x,
        config.gravity.y,
        config.bpm,
        world.resource::<TempoScroll>().speed()
    );
    world
}

/// Advance one rendered frame of `dt` seconds.
///
/// Order: frame time, scroll velocities, the fixed-step physics scheduler
/// (which also moves beat markers), camera follow, then the tombstone sweep.
/// Returns the number of physics integrations performed.
pub fn run_frame(world: &mut World, dt: f32) -> u32 {
    update_world_time(world, dt);
    run_logged(world, "apply_scroll_velocity", apply_scroll_velocity);

    let steps = physics_step(world, dt);

    run_logged(world, "camera_follow_player", camera_follow_player);
    sweep_tombstones(world);
    steps
}

/// Put the level back to its spawn state after a death or restart.
///
/// Every entity returns to its initial transform with zeroed velocities and
/// culled bodies are woken. Pending body removals are honoured first so a
/// queued body is not resurrected.
pub fn reset_level(world: &mut World) {
    release_pending_bodies(world);
    reset_to_initial_state(world);
    reset_resource::<PhysicsScheduler>(world);
    reset_resource::<PlayerState>(world);
    reset_resource::<WorldTime>(world);
}

fn reset_resource<R: Resource + Resettable>(world: &mut World) {
    if let Some(mut resource) = world.get_resource_mut::<R>() {
        resource.reset();
    }
}

/// Entities of a generated level.
#[derive(Debug, Clone)]
pub struct DemoLevel {
    pub player: Entity,
    pub ground: Entity,
    pub platforms: Vec<Entity>,
    pub obstacle_groups: Vec<Entity>,
    pub beat_markers: Vec<Entity>,
}

const PLAYER_START: Vec3 = Vec3::new(0.0, 1.0, 0.0);
const GROUND_LENGTH: f32 = 400.0;
const PLATFORM_COUNT: usize = 12;
const PLATFORM_SIZE: Vec3 = Vec3::new(3.0, 0.5, 1.0);
/// Lowest platform centre. Keeps every platform's underside above the head
/// of a player standing on the ground.
const PLATFORM_MIN_Y: f32 = 2.25;
const SPIKE_GROUPS: usize = 4;

/// Generate a level: player, a long ground strip, floating platforms and a
/// few spike groups, plus one marker per beat over `duration` seconds.
pub fn spawn_demo_level(world: &mut World, rng: &mut fastrand::Rng, duration: f32) -> DemoLevel {
    let player = create_entity(
        world,
        &SpawnDescriptor::new(PLAYER_START, Vec3::ONE, Tag::Player)
            .with_appearance(Appearance::new("player")),
    );

    let ground = create_default_entity(
        world,
        Vec3::new(GROUND_LENGTH * 0.5 - 10.0, -0.5, 0.0),
        Vec3::new(GROUND_LENGTH, 1.0, 1.0),
        Tag::Ground,
    );

    let platforms = (0..PLATFORM_COUNT)
        .map(|i| {
            let x = 12.0 + i as f32 * 9.0 + rng.f32() * 3.0;
            let y = PLATFORM_MIN_Y + rng.f32() * 2.0;
            create_entity(
                world,
                &SpawnDescriptor::new(Vec3::new(x, y, 0.0), PLATFORM_SIZE, Tag::Platform)
                    .with_appearance(Appearance::new("platform")),
            )
        })
        .collect();

    let obstacle_groups = (0..SPIKE_GROUPS)
        .filter_map(|i| {
            let x = 20.0 + i as f32 * 25.0 + rng.f32() * 5.0;
            let spikes = rng.usize(1..=3);
            let members: Vec<SpawnDescriptor> = (0..spikes)
                .map(|s| {
                    SpawnDescriptor::new(
                        Vec3::new(x + s as f32, 0.5, 0.0),
                        Vec3::ONE,
                        Tag::Obstacle,
                    )
                    .with_shape(ShapeKind::Triangle)
                    .with_appearance(Appearance::new("spike").with_tint([1.0, 0.2, 0.2, 1.0]))
                })
                .collect();
            create_group(world, &members, Tag::Obstacle)
        })
        .collect();

    let tempo = {
        let tempo = world.resource::<TempoScroll>();
        tempo
            .clone()
            .with_beats(TempoScroll::regular_beats(tempo.bpm, duration))
    };
    world.insert_resource(tempo);
    let beat_markers = spawn_beat_markers(world, PLAYER_START.x, PLAYER_START.y + 4.0);

    if let Some(mut camera) = world.get_resource_mut::<CameraView>() {
        camera.center.x = PLAYER_START.x + camera.half_extents.x * 0.5;
    }

    info!(
        "demo level: {} platforms, {} spike groups, {} beats",
        PLATFORM_COUNT,
        SPIKE_GROUPS,
        beat_markers.len()
    );
    DemoLevel {
        player,
        ground,
        platforms,
        obstacle_groups,
        beat_markers,
    }
}
