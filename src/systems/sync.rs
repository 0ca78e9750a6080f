//! Body → transform sync with visibility culling.
//!
//! After each integration, every active body has its position copied into
//! the entity's [`Transform`]. If that puts the entity completely past the
//! left edge of the camera, the body is culled as well. Culled bodies are put
//! to sleep and marked inactive; they stay in the physics world until the
//! level is reset or the entity is destroyed.

use bevy_ecs::prelude::*;
use log::debug;

use crate::components::physicsbody::PhysicsBody;
use crate::components::tag::Tag;
use crate::components::transform::Transform;
use crate::resources::camera::CameraView;
use crate::resources::physicsworld::PhysicsWorld;

pub fn sync_and_cull_bodies(
    mut physics: ResMut<PhysicsWorld>,
    camera: Option<Res<CameraView>>,
    mut query: Query<(Entity, &Tag, &mut Transform, &mut PhysicsBody)>,
) {
    let visible_left = camera.map(|c| c.visible_left());

    for (entity, tag, mut transform, mut body) in query.iter_mut() {
        if !body.active {
            continue;
        }
        let Some(handle) = body.body() else {
            continue;
        };
        let Some(position) = physics.body_position(handle) else {
            continue;
        };

        transform.position.x = position.x;
        transform.position.y = position.y;

        if visible_left.is_some_and(|left| transform.right_edge() < left) {
            physics.sleep_body(handle);
            body.active = false;
            debug!("culled {} {:?} at x={}", tag, entity, transform.position.x);
        }
    }
}
