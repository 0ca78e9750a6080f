//! Group transform propagation.
//!
//! Updates every entity carrying a [`ParentRelation`] so that it sits at its
//! parent's rigid-body position plus the offset recorded when the group was
//! built. Runs right after integration, before transform sync and culling, so
//! children and parent move in the same frame.
//!
//! A child whose parent is gone (despawned, never had a body, or its body was
//! already removed) is left where it is; the rest of the pass continues.
//!
//! # Related
//!
//! - [`ParentRelation`] – the attachment component
//! - [`create_group`](crate::systems::lifecycle::create_group) – builds the parent and its children

use bevy_ecs::prelude::*;
use glam::Vec3;
use log::debug;

use crate::components::parentrelation::ParentRelation;
use crate::components::physicsbody::PhysicsBody;
use crate::components::transform::Transform;
use crate::resources::physicsworld::PhysicsWorld;

/// Snap every grouped child to `parent body position + local offset`, z = 0.
pub fn propagate_group_transforms(
    mut children: Query<(Entity, &ParentRelation, &mut Transform)>,
    parents: Query<&PhysicsBody>,
    physics: Res<PhysicsWorld>,
) {
    for (child, relation, mut transform) in children.iter_mut() {
        let parent_position = parents
            .get(relation.parent)
            .ok()
            .and_then(|pb| pb.body())
            .and_then(|body| physics.body_position(body));
        let Some(parent_position) = parent_position else {
            debug!(
                "child {:?} has no live parent body ({:?}), left in place",
                child, relation.parent
            );
            continue;
        };
        let p = parent_position + relation.local_offset;
        transform.position = Vec3::new(p.x, p.y, 0.0);
    }
}
