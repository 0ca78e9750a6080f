//! Tempo-driven level scrolling.
//!
//! The player stays roughly in place while the level travels towards it at a
//! speed derived from the song tempo (see [`TempoScroll::speed`]).
//!
//! - Level geometry ([`Tag::scrolls`]) is moved by the physics engine: its
//!   kinematic bodies get a leftward velocity once per frame.
//! - Beat markers have no body and are moved here by direct [`Transform`]
//!   mutation, once per fixed physics step. They share the level's clock, so
//!   a paused scheduler or a slowed render clock never pulls them apart.

use bevy_ecs::prelude::*;
use glam::{Vec2, Vec3};
use log::info;

use crate::components::physicsbody::PhysicsBody;
use crate::components::tag::Tag;
use crate::components::transform::Transform;
use crate::constants::FIXED_TIMESTEP;
use crate::resources::physicsworld::PhysicsWorld;
use crate::resources::tempo::TempoScroll;
use crate::systems::lifecycle::{SpawnDescriptor, create_entity};

/// Width and height of a beat marker.
const BEAT_MARKER_SIZE: Vec2 = Vec2::new(0.1, 1.0);

/// Give every active scrolling body the current scroll velocity.
pub fn apply_scroll_velocity(
    tempo: Res<TempoScroll>,
    mut physics: ResMut<PhysicsWorld>,
    query: Query<(&Tag, &PhysicsBody)>,
) {
    let velocity = Vec2::new(-tempo.speed(), 0.0);
    for (tag, body) in query.iter() {
        if !tag.scrolls() || !body.active {
            continue;
        }
        if let Some(handle) = body.body() {
            physics.set_linear_velocity(handle, velocity);
        }
    }
}

/// Move beat markers left by one fixed timestep of scrolling.
pub fn advance_beat_markers(tempo: Res<TempoScroll>, mut query: Query<(&Tag, &mut Transform)>) {
    let distance = tempo.speed() * FIXED_TIMESTEP;
    for (tag, mut transform) in query.iter_mut() {
        if *tag == Tag::Beat {
            transform.position.x -= distance;
        }
    }
}

/// Spawn one marker per beat, at `origin_x + t * speed` on the line `y`.
pub fn spawn_beat_markers(world: &mut World, origin_x: f32, y: f32) -> Vec<Entity> {
    let (beats, speed) = {
        let tempo = world.resource::<TempoScroll>();
        (tempo.beats.clone(), tempo.speed())
    };
    let markers: Vec<Entity> = beats
        .iter()
        .map(|t| {
            let desc = SpawnDescriptor {
                position: Vec3::new(origin_x + t * speed, y, 0.0),
                scale: BEAT_MARKER_SIZE.extend(1.0),
                tag: Tag::Beat,
                ..Default::default()
            };
            create_entity(world, &desc)
        })
        .collect();
    info!("spawned {} beat markers at {} u/s", markers.len(), speed);
    markers
}
