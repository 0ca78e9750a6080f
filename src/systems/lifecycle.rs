//! Entity lifecycle: the only path that pairs entities with physics bodies.
//!
//! Everything physics-backed is created by [`create_entity`] and destroyed by
//! [`destroy_entity`]. Destruction is two-phase: the collider and body are
//! released from the [`PhysicsWorld`] first, then the entity is despawned, so
//! no body ever outlives its entity and no entity disappears while its body
//! is still simulated.
//!
//! Two deferred paths exist for code running in the middle of a frame:
//!
//! - [`Tombstone`] marks a whole entity; [`sweep_tombstones`] destroys the
//!   marked set once per frame, outside the physics step.
//! - [`queue_body_removal`] marks only the body; the physics step releases it
//!   in [`release_pending_bodies`], after this step's contacts were read.
//!
//! Groups are built by [`create_group`]: one placeholder parent owning a box
//! collider the size of the members' bounding box, and body-less children
//! that follow it through [`ParentRelation`].

use bevy_ecs::prelude::*;
use glam::{Vec2, Vec3};
use log::{debug, info};
use rapier2d::prelude::RigidBodyHandle;
use smallvec::SmallVec;

use crate::components::appearance::Appearance;
use crate::components::groupmembership::GroupMembership;
use crate::components::parentrelation::ParentRelation;
use crate::components::physicsbody::PhysicsBody;
use crate::components::tag::Tag;
use crate::components::tombstone::Tombstone;
use crate::components::transform::Transform;
use crate::resources::pendingremovals::PendingBodyRemovals;
use crate::resources::physicsworld::{BodyKind, PhysicsWorld, ShapeDesc, ShapeKind};
use crate::resources::scheduler::PhysicsScheduler;

/// Everything needed to spawn one level object.
///
/// The `Default` value is fully zeroed (zero scale included); it is also what
/// [`compute_group_aabb`] returns for an empty member list.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnDescriptor {
    pub position: Vec3,
    /// Rotation around z in degrees.
    pub rotation: f32,
    /// Full size of the object; also sizes its collider.
    pub scale: Vec3,
    pub tag: Tag,
    pub shape: ShapeKind,
    /// Build a rigid body and collider. Ignored for [`Tag::Beat`].
    pub generate_physics: bool,
    pub sensor: bool,
    /// Track this entity as the scheduler's player and report its contacts.
    pub is_player: bool,
    pub appearance: Option<Appearance>,
}

impl Default for SpawnDescriptor {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: 0.0,
            scale: Vec3::ZERO,
            tag: Tag::Platform,
            shape: ShapeKind::Box,
            generate_physics: false,
            sensor: false,
            is_player: false,
            appearance: None,
        }
    }
}

impl SpawnDescriptor {
    /// Physics-backed box at `position` with the given size and tag.
    pub fn new(position: Vec3, scale: Vec3, tag: Tag) -> Self {
        Self {
            position,
            scale,
            tag,
            generate_physics: true,
            is_player: tag == Tag::Player,
            ..Default::default()
        }
    }

    pub fn with_shape(mut self, shape: ShapeKind) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_physics(mut self, generate: bool) -> Self {
        self.generate_physics = generate;
        self
    }

    pub fn with_sensor(mut self, sensor: bool) -> Self {
        self.sensor = sensor;
        self
    }

    pub fn with_appearance(mut self, appearance: Appearance) -> Self {
        self.appearance = Some(appearance);
        self
    }

    pub fn left(&self) -> f32 {
        self.position.x - self.scale.x * 0.5
    }

    pub fn right(&self) -> f32 {
        self.position.x + self.scale.x * 0.5
    }

    pub fn top(&self) -> f32 {
        self.position.y + self.scale.y * 0.5
    }

    pub fn bottom(&self) -> f32 {
        self.position.y - self.scale.y * 0.5
    }
}

/// Spawn an entity from a descriptor.
///
/// Attaches [`Transform`] (current = initial = descriptor values) and
/// [`Tag`]. When physics is requested and the tag is not [`Tag::Beat`], a body
/// with locked rotation is created at the descriptor position (dynamic for
/// the player, kinematic otherwise) with a frictionless, non-bouncy convex
/// collider sized from `scale`.
pub fn create_entity(world: &mut World, desc: &SpawnDescriptor) -> Entity {
    let entity = world
        .spawn((
            Transform::new(desc.position, desc.rotation, desc.scale),
            desc.tag,
        ))
        .id();

    if let Some(appearance) = &desc.appearance {
        world.entity_mut(entity).insert(appearance.clone());
    }

    if desc.generate_physics && desc.tag != Tag::Beat {
        let kind = if desc.tag == Tag::Player {
            BodyKind::Dynamic
        } else {
            BodyKind::Kinematic
        };
        let shape_desc = ShapeDesc::new(desc.shape, desc.scale.truncate())
            .with_sensor(desc.sensor)
            .with_contact_reports(desc.is_player);
        let physics_body = {
            let mut physics = world.resource_mut::<PhysicsWorld>();
            let body = physics.create_body(entity, kind, desc.position.truncate(), desc.rotation);
            let shape = physics.create_shape(body, &shape_desc);
            PhysicsBody::new(body, shape)
        };
        world.entity_mut(entity).insert(physics_body);
    }

    if desc.is_player {
        if let Some(mut scheduler) = world.get_resource_mut::<PhysicsScheduler>() {
            scheduler.player = Some(entity);
        }
    }

    debug!("created {} {:?} at {:?}", desc.tag, entity, desc.position);
    entity
}

/// Physics-backed box with default material, the common level object.
pub fn create_default_entity(world: &mut World, position: Vec3, scale: Vec3, tag: Tag) -> Entity {
    create_entity(world, &SpawnDescriptor::new(position, scale, tag))
}

/// Free the collider then the body of `entity` and null its [`PhysicsBody`].
///
/// Stale handles are skipped. Entities without a body are left untouched.
pub fn release_physics(world: &mut World, entity: Entity) {
    let Some(pb) = world.get::<PhysicsBody>(entity).copied() else {
        return;
    };
    {
        let mut physics = world.resource_mut::<PhysicsWorld>();
        if let Some(shape) = pb.shape() {
            physics.destroy_shape(shape);
        }
        if let Some(body) = pb.body() {
            physics.destroy_body(body);
        }
    }
    if let Some(mut pb) = world.get_mut::<PhysicsBody>(entity) {
        pb.clear();
    }
}

/// Two-phase destroy: physics resources first, then the entity.
///
/// Destroying a group parent destroys its children first. Returns false if
/// the entity was already gone.
pub fn destroy_entity(world: &mut World, entity: Entity) -> bool {
    if world.get_entity(entity).is_err() {
        return false;
    }

    let children = world
        .get::<GroupMembership>(entity)
        .map(|group| group.children.clone());
    if let Some(children) = children {
        for child in children {
            destroy_entity(world, child);
        }
    }

    release_physics(world, entity);
    world.despawn(entity)
}

/// Mark an entity for destruction at the end of the frame.
pub fn mark_for_destroy(world: &mut World, entity: Entity) {
    if let Ok(mut entity_mut) = world.get_entity_mut(entity) {
        entity_mut.insert(Tombstone);
    }
}

/// Destroy every tombstoned entity. Returns how many were destroyed.
pub fn sweep_tombstones(world: &mut World) -> usize {
    let marked: Vec<Entity> = world
        .query_filtered::<Entity, With<Tombstone>>()
        .iter(world)
        .collect();
    let mut destroyed = 0;
    for entity in marked {
        if destroy_entity(world, entity) {
            destroyed += 1;
        }
    }
    if destroyed > 0 {
        debug!("swept {} tombstoned entities", destroyed);
    }
    destroyed
}

/// Queue an entity's body for release at the end of the current step.
/// Returns false if the entity has no live body.
pub fn queue_body_removal(world: &mut World, entity: Entity) -> bool {
    let Some(body) = world.get::<PhysicsBody>(entity).and_then(|pb| pb.body()) else {
        return false;
    };
    world.resource_mut::<PendingBodyRemovals>().queue(body);
    true
}

/// Release every queued body and drop the owner's [`PhysicsBody`] component.
///
/// Runs inside the physics step after contact classification.
pub fn release_pending_bodies(world: &mut World) {
    let Some(mut pending) = world.get_resource_mut::<PendingBodyRemovals>() else {
        return;
    };
    let queued: SmallVec<[RigidBodyHandle; 8]> = pending.drain().collect();

    for body in queued {
        let owner = world.resource::<PhysicsWorld>().entity_for_body(body);
        let owned = owner.filter(|&e| {
            world
                .get::<PhysicsBody>(e)
                .is_some_and(|pb| pb.body() == Some(body))
        });
        match owned {
            Some(entity) => {
                release_physics(world, entity);
                if let Ok(mut entity_mut) = world.get_entity_mut(entity) {
                    entity_mut.remove::<PhysicsBody>();
                }
            }
            None => {
                world.resource_mut::<PhysicsWorld>().destroy_body(body);
            }
        }
    }
}

/// Return an entity to its spawn state.
///
/// Restores the [`Transform`] from its snapshot and, when the entity has a
/// body, moves the body back, zeroes its velocities, wakes it and marks it
/// active again. Returns false for a dead entity.
pub fn reset_entity(world: &mut World, entity: Entity) -> bool {
    if world.get_entity(entity).is_err() {
        return false;
    }
    let Some(mut transform) = world.get_mut::<Transform>(entity) else {
        debug_assert!(false, "reset of {:?} which has no Transform", entity);
        return false;
    };
    transform.reset();
    let initial = *transform.initial();

    let Some(body) = world.get::<PhysicsBody>(entity).and_then(|pb| pb.body()) else {
        return true;
    };
    let alive = {
        let mut physics = world.resource_mut::<PhysicsWorld>();
        let alive =
            physics.set_body_transform(body, initial.position.truncate(), initial.rotation);
        physics.set_linear_velocity(body, Vec2::ZERO);
        physics.set_angular_velocity(body, 0.0);
        physics.wake_body(body);
        alive
    };
    if let Some(mut pb) = world.get_mut::<PhysicsBody>(entity) {
        pb.active = alive;
    }
    true
}

/// Reset every entity that has a [`Transform`].
pub fn reset_to_initial_state(world: &mut World) {
    let entities: Vec<Entity> = world
        .query_filtered::<Entity, With<Transform>>()
        .iter(world)
        .collect();
    for entity in &entities {
        reset_entity(world, *entity);
    }
    info!("reset {} entities to their initial state", entities.len());
}

/// Bounding box of a set of siblings as a descriptor.
///
/// Position is the box centre (z = 0), scale its width and height (z = 0).
/// An empty slice yields the zeroed default.
pub fn compute_group_aabb(members: &[SpawnDescriptor]) -> SpawnDescriptor {
    let Some(first) = members.first() else {
        return SpawnDescriptor::default();
    };

    let mut left = first.left();
    let mut right = first.right();
    let mut top = first.top();
    let mut bottom = first.bottom();
    for member in &members[1..] {
        left = left.min(member.left());
        right = right.max(member.right());
        top = top.max(member.top());
        bottom = bottom.min(member.bottom());
    }

    SpawnDescriptor {
        position: Vec3::new((left + right) * 0.5, (top + bottom) * 0.5, 0.0),
        scale: Vec3::new(right - left, top - bottom, 0.0),
        ..Default::default()
    }
}

/// Build a group: a physics-backed placeholder covering all members, plus one
/// body-less child per member locked to it by a [`ParentRelation`].
///
/// Returns the placeholder, or `None` for an empty member list.
pub fn create_group(world: &mut World, members: &[SpawnDescriptor], tag: Tag) -> Option<Entity> {
    if members.is_empty() {
        return None;
    }

    let bounds = compute_group_aabb(members);
    let parent = create_entity(
        world,
        &SpawnDescriptor {
            tag,
            generate_physics: true,
            ..bounds.clone()
        },
    );

    let mut children = Vec::with_capacity(members.len());
    for member in members {
        let child_desc = SpawnDescriptor {
            generate_physics: false,
            is_player: false,
            ..member.clone()
        };
        let child = create_entity(world, &child_desc);
        let offset = (member.position - bounds.position).truncate();
        world
            .entity_mut(child)
            .insert(ParentRelation::new(parent, offset));
        children.push(child);
    }

    let membership = GroupMembership::new(children);
    debug!("group {:?} with {} children", parent, membership.len());
    world.entity_mut(parent).insert(membership);
    Some(parent)
}
