//! Integration tests for entity lifecycle, culling, scrolling and the frame
//! driver.
//!
//! # Usage
//!
//! ```sh
//! cargo test --test lifecycle_integration
//! ```

use bevy_ecs::prelude::*;
use glam::{Vec2, Vec3};

use tempo_runner::components::appearance::Appearance;
use tempo_runner::components::groupmembership::GroupMembership;
use tempo_runner::components::parentrelation::ParentRelation;
use tempo_runner::components::physicsbody::PhysicsBody;
use tempo_runner::components::tag::Tag;
use tempo_runner::components::tombstone::Tombstone;
use tempo_runner::components::transform::Transform;
use tempo_runner::constants::FIXED_TIMESTEP;
use tempo_runner::game::{build_world, reset_level, run_frame, spawn_demo_level};
use tempo_runner::resources::gameconfig::GameConfig;
use tempo_runner::resources::pendingremovals::PendingBodyRemovals;
use tempo_runner::resources::physicsworld::{PhysicsWorld, ShapeKind};
use tempo_runner::resources::playerstate::PlayerState;
use tempo_runner::resources::scheduler::PhysicsScheduler;
use tempo_runner::resources::tempo::TempoScroll;
use tempo_runner::resources::worldtime::WorldTime;
use tempo_runner::systems::lifecycle::{
    SpawnDescriptor, create_default_entity, create_entity, create_group, destroy_entity,
    mark_for_destroy, queue_body_removal, reset_entity, reset_to_initial_state, sweep_tombstones,
};
use tempo_runner::systems::physicsstep::physics_step;
use tempo_runner::systems::scroll::spawn_beat_markers;

const EPSILON: f32 = 1e-3;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn zero_gravity_world() -> World {
    build_world(&GameConfig {
        gravity: Vec2::ZERO,
        ..GameConfig::new()
    })
}

fn spawn_player(world: &mut World, x: f32, y: f32) -> Entity {
    create_default_entity(world, Vec3::new(x, y, 0.0), Vec3::ONE, Tag::Player)
}

fn body_count(world: &World) -> usize {
    world.resource::<PhysicsWorld>().body_count()
}

// =============================================================================
// Create
// =============================================================================

#[test]
fn create_builds_body_and_components() {
    let mut world = zero_gravity_world();
    let e = create_entity(
        &mut world,
        &SpawnDescriptor::new(Vec3::new(2.0, 3.0, 0.0), Vec3::new(4.0, 1.0, 1.0), Tag::Platform)
            .with_appearance(Appearance::new("platform")),
    );

    let t = world.get::<Transform>(e).unwrap();
    assert_eq!(t.position, Vec3::new(2.0, 3.0, 0.0));
    assert_eq!(t.initial().position, t.position);
    assert_eq!(*world.get::<Tag>(e).unwrap(), Tag::Platform);
    assert_eq!(world.get::<Appearance>(e).unwrap().tex_key, "platform");

    let pb = *world.get::<PhysicsBody>(e).unwrap();
    assert!(pb.active);
    let physics = world.resource::<PhysicsWorld>();
    let body = pb.body().unwrap();
    assert!(physics.is_body_valid(body));
    assert!(physics.is_shape_valid(pb.shape().unwrap()));
    assert_eq!(physics.entity_for_body(body), Some(e));
    let pos = physics.body_position(body).unwrap();
    assert!(approx_eq(pos.x, 2.0));
    assert!(approx_eq(pos.y, 3.0));
}

#[test]
fn player_descriptor_registers_player() {
    let mut world = zero_gravity_world();
    let player = spawn_player(&mut world, 0.0, 0.0);
    assert_eq!(world.resource::<PhysicsScheduler>().player, Some(player));
}

#[test]
fn beat_tag_never_gets_a_body() {
    let mut world = zero_gravity_world();
    let e = create_default_entity(&mut world, Vec3::ZERO, Vec3::ONE, Tag::Beat);
    assert!(world.get::<PhysicsBody>(e).is_none());
    assert!(world.get::<Transform>(e).is_some());
    assert_eq!(body_count(&world), 0);
}

#[test]
fn physics_can_be_skipped() {
    let mut world = zero_gravity_world();
    let e = create_entity(
        &mut world,
        &SpawnDescriptor::new(Vec3::ZERO, Vec3::ONE, Tag::Ground).with_physics(false),
    );
    assert!(world.get::<PhysicsBody>(e).is_none());
    assert_eq!(body_count(&world), 0);
}

#[test]
fn triangles_and_sensors_are_created() {
    let mut world = zero_gravity_world();
    let spike = create_entity(
        &mut world,
        &SpawnDescriptor::new(Vec3::ZERO, Vec3::ONE, Tag::Obstacle).with_shape(ShapeKind::Triangle),
    );
    let trigger = create_entity(
        &mut world,
        &SpawnDescriptor::new(Vec3::new(5.0, 0.0, 0.0), Vec3::ONE, Tag::Timeline)
            .with_sensor(true),
    );
    let physics = world.resource::<PhysicsWorld>();
    for e in [spike, trigger] {
        let pb = world.get::<PhysicsBody>(e).unwrap();
        assert!(physics.is_shape_valid(pb.shape().unwrap()));
    }
    assert_eq!(physics.shape_count(), 2);
}

// =============================================================================
// Destroy
// =============================================================================

#[test]
fn destroy_releases_body_then_entity() {
    let mut world = zero_gravity_world();
    let e = create_default_entity(&mut world, Vec3::ZERO, Vec3::ONE, Tag::Platform);
    let body = world.get::<PhysicsBody>(e).unwrap().body().unwrap();

    assert!(destroy_entity(&mut world, e));

    assert!(world.get_entity(e).is_err());
    let physics = world.resource::<PhysicsWorld>();
    assert!(!physics.is_body_valid(body));
    assert!(physics.entity_for_body(body).is_none());
    assert_eq!(physics.body_count(), 0);
    assert_eq!(physics.shape_count(), 0);

    // A second destroy is a no-op.
    assert!(!destroy_entity(&mut world, e));
}

#[test]
fn destroying_group_parent_destroys_children() {
    let mut world = zero_gravity_world();
    let members = [
        SpawnDescriptor::new(Vec3::ZERO, Vec3::ONE, Tag::Obstacle),
        SpawnDescriptor::new(Vec3::new(1.0, 0.0, 0.0), Vec3::ONE, Tag::Obstacle),
    ];
    let parent = create_group(&mut world, &members, Tag::Obstacle).unwrap();
    let children: Vec<Entity> = world
        .get::<GroupMembership>(parent)
        .unwrap()
        .children
        .to_vec();
    assert_eq!(children.len(), 2);
    for child in &children {
        assert!(world.get::<PhysicsBody>(*child).is_none());
        assert_eq!(world.get::<ParentRelation>(*child).unwrap().parent, parent);
    }
    assert_eq!(body_count(&world), 1);

    destroy_entity(&mut world, parent);

    for child in children {
        assert!(world.get_entity(child).is_err());
    }
    assert_eq!(body_count(&world), 0);
}

#[test]
fn empty_group_is_not_created() {
    let mut world = zero_gravity_world();
    assert!(create_group(&mut world, &[], Tag::Obstacle).is_none());
    assert_eq!(body_count(&world), 0);
}

#[test]
fn tombstones_are_swept_once_per_frame() {
    let mut world = zero_gravity_world();
    spawn_player(&mut world, 0.0, 0.0);
    let doomed = create_default_entity(&mut world, Vec3::new(5.0, 0.0, 0.0), Vec3::ONE, Tag::Platform);
    let kept = create_default_entity(&mut world, Vec3::new(8.0, 0.0, 0.0), Vec3::ONE, Tag::Platform);

    mark_for_destroy(&mut world, doomed);
    assert!(world.get::<Tombstone>(doomed).is_some());
    assert_eq!(body_count(&world), 3);

    run_frame(&mut world, FIXED_TIMESTEP);

    assert!(world.get_entity(doomed).is_err());
    assert!(world.get_entity(kept).is_ok());
    assert_eq!(body_count(&world), 2);
    assert_eq!(sweep_tombstones(&mut world), 0);
}

#[test]
fn queued_removal_outside_step_waits_for_next_step() {
    let mut world = zero_gravity_world();
    spawn_player(&mut world, 0.0, 0.0);
    let e = create_default_entity(&mut world, Vec3::new(5.0, 0.0, 0.0), Vec3::ONE, Tag::Platform);
    let body = world.get::<PhysicsBody>(e).unwrap().body().unwrap();

    assert!(queue_body_removal(&mut world, e));
    assert!(world.resource::<PendingBodyRemovals>().is_queued(body));
    assert!(world.resource::<PhysicsWorld>().is_body_valid(body));

    physics_step(&mut world, FIXED_TIMESTEP);

    assert!(!world.resource::<PhysicsWorld>().is_body_valid(body));
    assert!(world.get::<PhysicsBody>(e).is_none());
    assert!(!queue_body_removal(&mut world, e));
}

// =============================================================================
// Reset
// =============================================================================

#[test]
fn reset_restores_spawn_state() {
    let mut world = build_world(&GameConfig::new());
    let pos = Vec3::new(1.0, 3.0, 0.0);
    let scale = Vec3::new(1.0, 2.0, 1.0);
    let player = create_default_entity(&mut world, pos, scale, Tag::Player);
    let body = world.get::<PhysicsBody>(player).unwrap().body().unwrap();

    // Fall for a while and push sideways.
    for _ in 0..30 {
        physics_step(&mut world, FIXED_TIMESTEP);
    }
    world
        .resource_mut::<PhysicsWorld>()
        .set_linear_velocity(body, Vec2::new(7.0, -3.0));
    {
        let mut t = world.get_mut::<Transform>(player).unwrap();
        t.scale = Vec3::splat(9.0);
        t.rotation = 45.0;
    }
    assert!(world.get::<Transform>(player).unwrap().position.y < pos.y);

    reset_to_initial_state(&mut world);

    let t = world.get::<Transform>(player).unwrap();
    assert_eq!(t.position, pos);
    assert_eq!(t.scale, scale);
    assert_eq!(t.rotation, 0.0);
    let physics = world.resource::<PhysicsWorld>();
    assert_eq!(physics.linear_velocity(body), Some(Vec2::ZERO));
    assert_eq!(physics.angular_velocity(body), Some(0.0));
    let body_pos = physics.body_position(body).unwrap();
    assert!(approx_eq(body_pos.x, pos.x));
    assert!(approx_eq(body_pos.y, pos.y));
}

#[test]
fn reset_of_dead_entity_is_refused() {
    let mut world = zero_gravity_world();
    let e = create_default_entity(&mut world, Vec3::ZERO, Vec3::ONE, Tag::Platform);
    destroy_entity(&mut world, e);
    assert!(!reset_entity(&mut world, e));
}

// =============================================================================
// Culling
// =============================================================================

#[test]
fn bodies_left_of_camera_are_culled() {
    let mut world = zero_gravity_world();
    spawn_player(&mut world, 0.0, 0.0);
    // Camera spans x in [-16, 16].
    let behind = create_default_entity(
        &mut world,
        Vec3::new(-30.0, 0.0, 0.0),
        Vec3::new(2.0, 1.0, 1.0),
        Tag::Platform,
    );
    let ahead = create_default_entity(
        &mut world,
        Vec3::new(10.0, -5.0, 0.0),
        Vec3::new(2.0, 1.0, 1.0),
        Tag::Platform,
    );
    let ahead_body = world.get::<PhysicsBody>(ahead).unwrap().body().unwrap();
    world
        .resource_mut::<PhysicsWorld>()
        .set_linear_velocity(ahead_body, Vec2::new(-6.0, 0.0));

    physics_step(&mut world, FIXED_TIMESTEP);

    assert!(!world.get::<PhysicsBody>(behind).unwrap().active);
    assert!(world.get::<PhysicsBody>(ahead).unwrap().active);
    let behind_body = world.get::<PhysicsBody>(behind).unwrap().body().unwrap();
    assert_eq!(
        world.resource::<PhysicsWorld>().is_sleeping(behind_body),
        Some(true)
    );
    // The visible body was synced from the simulation.
    let t = world.get::<Transform>(ahead).unwrap();
    assert!(t.position.x < 10.0);
    assert!(approx_eq(t.position.x, 10.0 - 6.0 * FIXED_TIMESTEP));

    // Reset brings the culled body back.
    reset_level(&mut world);
    assert!(world.get::<PhysicsBody>(behind).unwrap().active);
}

#[test]
fn culled_body_keeps_its_final_position() {
    let mut world = zero_gravity_world();
    spawn_player(&mut world, 0.0, 0.0);
    // Right edge at -15.95: still visible before the step, past -16 after it.
    let leaving = create_default_entity(
        &mut world,
        Vec3::new(-16.95, 5.0, 0.0),
        Vec3::new(2.0, 1.0, 1.0),
        Tag::Platform,
    );
    let body = world.get::<PhysicsBody>(leaving).unwrap().body().unwrap();
    world
        .resource_mut::<PhysicsWorld>()
        .set_linear_velocity(body, Vec2::new(-6.0, 0.0));

    physics_step(&mut world, FIXED_TIMESTEP);

    assert!(!world.get::<PhysicsBody>(leaving).unwrap().active);
    let body_x = world.resource::<PhysicsWorld>().body_position(body).unwrap().x;
    let t = world.get::<Transform>(leaving).unwrap();
    assert!(approx_eq(t.position.x, body_x));
    assert!(approx_eq(t.position.x, -16.95 - 6.0 * FIXED_TIMESTEP));
}

#[test]
fn no_camera_means_no_culling() {
    let mut world = zero_gravity_world();
    world.remove_resource::<tempo_runner::resources::camera::CameraView>();
    spawn_player(&mut world, 0.0, 0.0);
    let far = create_default_entity(&mut world, Vec3::new(-300.0, 0.0, 0.0), Vec3::ONE, Tag::Platform);

    physics_step(&mut world, FIXED_TIMESTEP);

    assert!(world.get::<PhysicsBody>(far).unwrap().active);
}

// =============================================================================
// Scrolling and the frame driver
// =============================================================================

#[test]
fn level_geometry_scrolls_left_at_tempo_speed() {
    let mut world = zero_gravity_world();
    spawn_player(&mut world, 0.0, 10.0);
    let platform = create_default_entity(
        &mut world,
        Vec3::new(5.0, 0.0, 0.0),
        Vec3::new(2.0, 1.0, 1.0),
        Tag::Platform,
    );
    let speed = world.resource::<TempoScroll>().speed();
    assert!(approx_eq(speed, 4.0));

    let mut steps = 0;
    for _ in 0..30 {
        steps += run_frame(&mut world, FIXED_TIMESTEP);
    }

    let t = world.get::<Transform>(platform).unwrap();
    let expected = 5.0 - speed * steps as f32 * FIXED_TIMESTEP;
    assert!(approx_eq(t.position.x, expected), "{} vs {}", t.position.x, expected);
    assert!(approx_eq(t.position.y, 0.0));
}

#[test]
fn player_is_not_scrolled() {
    let mut world = zero_gravity_world();
    let player = spawn_player(&mut world, 0.0, 0.0);
    for _ in 0..30 {
        run_frame(&mut world, FIXED_TIMESTEP);
    }
    let t = world.get::<Transform>(player).unwrap();
    assert!(approx_eq(t.position.x, 0.0));
}

#[test]
fn beat_markers_move_without_bodies() {
    let mut world = zero_gravity_world();
    spawn_player(&mut world, 0.0, 0.0);
    world.insert_resource(TempoScroll::new(120.0, 2.0).with_beats(vec![0.0, 0.5, 1.0]));
    let markers = spawn_beat_markers(&mut world, 0.0, 3.0);
    assert_eq!(markers.len(), 3);

    let start: Vec<f32> = markers
        .iter()
        .map(|m| world.get::<Transform>(*m).unwrap().position.x)
        .collect();
    assert!(approx_eq(start[1], 2.0));
    assert!(approx_eq(start[2], 4.0));

    let mut steps = 0;
    for _ in 0..10 {
        steps += run_frame(&mut world, 0.1);
    }

    let elapsed = world.resource::<WorldTime>().elapsed;
    assert!(approx_eq(elapsed, 1.0));
    assert!((59..=60).contains(&steps));
    let travelled = 4.0 * steps as f32 * FIXED_TIMESTEP;
    for (marker, x0) in markers.iter().zip(start) {
        assert!(world.get::<PhysicsBody>(*marker).is_none());
        let x = world.get::<Transform>(*marker).unwrap().position.x;
        assert!(approx_eq(x, x0 - travelled));
    }
}

/// A platform and a beat marker starting at the same x.
fn platform_and_marker(world: &mut World) -> (Entity, Entity) {
    spawn_player(world, 0.0, 10.0);
    let platform = create_default_entity(world, Vec3::new(4.0, 0.0, 0.0), Vec3::ONE, Tag::Platform);
    world.insert_resource(TempoScroll::new(120.0, 2.0).with_beats(vec![1.0]));
    let marker = spawn_beat_markers(world, 0.0, 3.0)[0];
    (platform, marker)
}

fn x_of(world: &World, entity: Entity) -> f32 {
    world.get::<Transform>(entity).unwrap().position.x
}

#[test]
fn paused_scheduler_freezes_markers_with_the_level() {
    let mut world = zero_gravity_world();
    let (platform, marker) = platform_and_marker(&mut world);
    assert!(approx_eq(x_of(&world, marker), 4.0));
    world.resource_mut::<PhysicsScheduler>().active = false;

    for _ in 0..60 {
        run_frame(&mut world, FIXED_TIMESTEP);
    }

    assert!(approx_eq(x_of(&world, platform), 4.0));
    assert!(approx_eq(x_of(&world, marker), 4.0));
}

#[test]
fn markers_stay_aligned_with_level_under_time_scale() {
    let mut world = zero_gravity_world();
    world.insert_resource(WorldTime::default().with_time_scale(0.5));
    let (platform, marker) = platform_and_marker(&mut world);

    for _ in 0..60 {
        run_frame(&mut world, FIXED_TIMESTEP);
    }

    assert!(x_of(&world, platform) < 4.0);
    assert!(approx_eq(x_of(&world, platform), x_of(&world, marker)));
}

#[test]
fn reset_level_clears_progress() {
    let mut world = zero_gravity_world();
    spawn_player(&mut world, 0.0, 0.0);
    for _ in 0..5 {
        run_frame(&mut world, 0.02);
    }
    world.resource_mut::<PlayerState>().grounded = true;

    reset_level(&mut world);

    let scheduler = world.resource::<PhysicsScheduler>();
    assert_eq!(scheduler.accumulator, 0.0);
    assert_eq!(scheduler.steps_taken, 0);
    assert!(scheduler.player.is_some());
    assert!(!world.resource::<PlayerState>().grounded);
    assert_eq!(world.resource::<WorldTime>().elapsed, 0.0);
}

#[test]
fn demo_platforms_clear_a_standing_player() {
    for seed in 0..20 {
        let mut world = build_world(&GameConfig::new());
        let mut rng = fastrand::Rng::with_seed(seed);
        let level = spawn_demo_level(&mut world, &mut rng, 1.0);

        // Standing on the ground (top at y = 0), a unit player's head is at 1.
        let player_height = world.get::<Transform>(level.player).unwrap().scale.y;
        for platform in &level.platforms {
            let t = world.get::<Transform>(*platform).unwrap();
            let underside = t.position.y - t.scale.y * 0.5;
            assert!(underside > player_height + 0.5, "seed {seed}: underside {underside}");
        }
    }
}

#[test]
fn demo_level_runs() {
    let mut world = build_world(&GameConfig::new());
    let mut rng = fastrand::Rng::with_seed(7);
    let level = spawn_demo_level(&mut world, &mut rng, 5.0);

    assert_eq!(world.resource::<PhysicsScheduler>().player, Some(level.player));
    assert!(!level.platforms.is_empty());
    assert!(!level.beat_markers.is_empty());
    assert!(world.get::<PhysicsBody>(level.ground).is_some());

    let mut steps = 0;
    for _ in 0..120 {
        steps += run_frame(&mut world, FIXED_TIMESTEP);
    }
    assert!(steps >= 118);
    assert!(world.get_entity(level.player).is_ok());
}
