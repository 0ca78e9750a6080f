//! Rigid-body world resource wrapping rapier2d.
//!
//! [`PhysicsWorld`] owns every rapier set and pipeline object plus the
//! side-table that maps a rigid body back to the entity that owns it. The rest
//! of the crate speaks `glam` types and degrees; conversion to rapier's
//! nalgebra types and radians happens here and nowhere else.
//!
//! All accessors take a handle and return `Option`/`bool`: a stale or never
//! issued handle is a normal situation (the body may have been destroyed by
//! the deferred removal sweep) and is never treated as an error.

use std::fmt;

use arrayvec::ArrayVec;
use bevy_ecs::prelude::{Entity, Resource};
use glam::Vec2;
use log::trace;
use rapier2d::prelude::{
    ActiveEvents, CCDSolver, ColliderBuilder, ColliderHandle, ColliderSet, DefaultBroadPhase,
    ImpulseJointSet, IntegrationParameters, IslandManager, Isometry, MultibodyJointSet,
    NarrowPhase, PhysicsPipeline, RigidBodyBuilder, RigidBodyHandle, RigidBodySet, nalgebra, point, vector,
};
use rustc_hash::FxHashMap;

use crate::constants::{
    CONTACT_CAPACITY, DEFAULT_DENSITY, DEFAULT_FRICTION, DEFAULT_RESTITUTION,
};

/// How a body responds to the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Affected by gravity and contacts. Only the player uses this.
    Dynamic,
    /// Moved by velocity set from outside, never by forces.
    Kinematic,
}

/// Convex collider outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShapeKind {
    /// Axis-aligned box spanning the full size.
    #[default]
    Box,
    /// Three-point hull: bottom-left, bottom-right, top-centre.
    Triangle,
}

/// Parameters for a collider attached to an existing body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeDesc {
    pub kind: ShapeKind,
    /// Full width and height in world units.
    pub size: Vec2,
    pub sensor: bool,
    /// Enable contact event reporting on this collider.
    pub report_contacts: bool,
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
}

impl ShapeDesc {
    pub fn new(kind: ShapeKind, size: Vec2) -> Self {
        Self {
            kind,
            size,
            sensor: false,
            report_contacts: false,
            density: DEFAULT_DENSITY,
            friction: DEFAULT_FRICTION,
            restitution: DEFAULT_RESTITUTION,
        }
    }

    pub fn with_sensor(mut self, sensor: bool) -> Self {
        self.sensor = sensor;
        self
    }

    pub fn with_contact_reports(mut self, report: bool) -> Self {
        self.report_contacts = report;
        self
    }
}

/// One contact manifold touching a queried body.
///
/// `normal` is in world space and points from `body_a` towards `body_b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactRecord {
    pub body_a: RigidBodyHandle,
    pub body_b: RigidBodyHandle,
    pub normal: Vec2,
}

/// Bounded buffer returned by [`PhysicsWorld::contact_data`].
pub type ContactRecords = ArrayVec<ContactRecord, CONTACT_CAPACITY>;

/// The 2D rigid-body world. Inserted once as a resource and shared by every
/// system of the physics core.
#[derive(Resource)]
pub struct PhysicsWorld {
    gravity: Vec2,
    pipeline: PhysicsPipeline,
    params: IntegrationParameters,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    body_to_entity: FxHashMap<RigidBodyHandle, Entity>,
}

impl fmt::Debug for PhysicsWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhysicsWorld")
            .field("gravity", &self.gravity)
            .field("bodies", &self.bodies.len())
            .field("colliders", &self.colliders.len())
            .finish()
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(Vec2::new(0.0, -9.81))
    }
}

impl PhysicsWorld {
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity,
            pipeline: PhysicsPipeline::new(),
            params: IntegrationParameters::default(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            body_to_entity: FxHashMap::default(),
        }
    }

    /// Create a body with locked rotation and register its owning entity.
    pub fn create_body(
        &mut self,
        owner: Entity,
        kind: BodyKind,
        position: Vec2,
        rotation_degrees: f32,
    ) -> RigidBodyHandle {
        let builder = match kind {
            BodyKind::Dynamic => RigidBodyBuilder::dynamic(),
            BodyKind::Kinematic => RigidBodyBuilder::kinematic_velocity_based(),
        };
        let body = builder
            .translation(vector![position.x, position.y])
            .rotation(rotation_degrees.to_radians())
            .lock_rotations()
            .build();
        let handle = self.bodies.insert(body);
        self.body_to_entity.insert(handle, owner);
        trace!("created {:?} body {:?} for {:?}", kind, handle, owner);
        handle
    }

    /// Attach a convex collider to `body`.
    ///
    /// Sizes are not validated; a degenerate triangle falls back to rapier's
    /// raw triangle shape when the hull cannot be computed.
    pub fn create_shape(&mut self, body: RigidBodyHandle, desc: &ShapeDesc) -> ColliderHandle {
        let half = desc.size * 0.5;
        let builder = match desc.kind {
            ShapeKind::Box => ColliderBuilder::cuboid(half.x, half.y),
            ShapeKind::Triangle => {
                let a = point![-half.x, -half.y];
                let b = point![half.x, -half.y];
                let c = point![0.0, half.y];
                ColliderBuilder::convex_hull(&[a, b, c])
                    .unwrap_or_else(|| ColliderBuilder::triangle(a, b, c))
            }
        };
        let mut builder = builder
            .density(desc.density)
            .friction(desc.friction)
            .restitution(desc.restitution)
            .sensor(desc.sensor);
        if desc.report_contacts {
            builder = builder.active_events(ActiveEvents::COLLISION_EVENTS);
        }
        self.colliders
            .insert_with_parent(builder.build(), body, &mut self.bodies)
    }

    /// Remove a collider. Returns false if the handle was already stale.
    pub fn destroy_shape(&mut self, shape: ColliderHandle) -> bool {
        self.colliders
            .remove(shape, &mut self.islands, &mut self.bodies, true)
            .is_some()
    }

    /// Remove a body, any collider still attached to it, and its entity link.
    /// Returns false if the handle was already stale.
    pub fn destroy_body(&mut self, body: RigidBodyHandle) -> bool {
        self.body_to_entity.remove(&body);
        let removed = self
            .bodies
            .remove(
                body,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            )
            .is_some();
        if removed {
            trace!("destroyed body {:?}", body);
        }
        removed
    }

    pub fn is_body_valid(&self, body: RigidBodyHandle) -> bool {
        self.bodies.contains(body)
    }

    pub fn is_shape_valid(&self, shape: ColliderHandle) -> bool {
        self.colliders.contains(shape)
    }

    /// Entity registered as the owner of `body`, if the body is still alive.
    pub fn entity_for_body(&self, body: RigidBodyHandle) -> Option<Entity> {
        self.body_to_entity.get(&body).copied()
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn shape_count(&self) -> usize {
        self.colliders.len()
    }

    /// Advance the world by `dt`, split into `sub_steps` equal solver passes.
    pub fn step(&mut self, dt: f32, sub_steps: u32) {
        let sub_steps = sub_steps.max(1);
        self.params.dt = dt / sub_steps as f32;
        let gravity = vector![self.gravity.x, self.gravity.y];
        for _ in 0..sub_steps {
            self.pipeline.step(
                &gravity,
                &self.params,
                &mut self.islands,
                &mut self.broad_phase,
                &mut self.narrow_phase,
                &mut self.bodies,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                &mut self.ccd_solver,
                None,
                &(),
                &(),
            );
        }
    }

    pub fn body_position(&self, body: RigidBodyHandle) -> Option<Vec2> {
        self.bodies.get(body).map(|rb| {
            let t = rb.translation();
            Vec2::new(t.x, t.y)
        })
    }

    pub fn set_body_transform(
        &mut self,
        body: RigidBodyHandle,
        position: Vec2,
        rotation_degrees: f32,
    ) -> bool {
        let Some(rb) = self.bodies.get_mut(body) else {
            return false;
        };
        rb.set_position(
            Isometry::new(vector![position.x, position.y], rotation_degrees.to_radians()),
            true,
        );
        true
    }

    pub fn linear_velocity(&self, body: RigidBodyHandle) -> Option<Vec2> {
        self.bodies.get(body).map(|rb| {
            let v = rb.linvel();
            Vec2::new(v.x, v.y)
        })
    }

    pub fn set_linear_velocity(&mut self, body: RigidBodyHandle, velocity: Vec2) -> bool {
        let Some(rb) = self.bodies.get_mut(body) else {
            return false;
        };
        rb.set_linvel(vector![velocity.x, velocity.y], true);
        true
    }

    pub fn angular_velocity(&self, body: RigidBodyHandle) -> Option<f32> {
        self.bodies.get(body).map(|rb| rb.angvel())
    }

    pub fn set_angular_velocity(&mut self, body: RigidBodyHandle, velocity: f32) -> bool {
        let Some(rb) = self.bodies.get_mut(body) else {
            return false;
        };
        rb.set_angvel(velocity, true);
        true
    }

    pub fn sleep_body(&mut self, body: RigidBodyHandle) -> bool {
        let Some(rb) = self.bodies.get_mut(body) else {
            return false;
        };
        rb.sleep();
        true
    }

    pub fn wake_body(&mut self, body: RigidBodyHandle) -> bool {
        let Some(rb) = self.bodies.get_mut(body) else {
            return false;
        };
        rb.wake_up(true);
        true
    }

    pub fn is_sleeping(&self, body: RigidBodyHandle) -> Option<bool> {
        self.bodies.get(body).map(|rb| rb.is_sleeping())
    }

    /// Collect up to [`CONTACT_CAPACITY`] touching manifolds involving `body`.
    ///
    /// Pairs whose colliders lost their parent body are skipped. Returns an
    /// empty buffer for a stale handle.
    pub fn contact_data(&self, body: RigidBodyHandle) -> ContactRecords {
        let mut records = ContactRecords::new();
        let Some(rb) = self.bodies.get(body) else {
            return records;
        };
        for &collider in rb.colliders() {
            for pair in self.narrow_phase.contact_pairs_with(collider) {
                if !pair.has_any_active_contact {
                    continue;
                }
                let (Some(body_a), Some(body_b)) = (
                    self.collider_parent(pair.collider1),
                    self.collider_parent(pair.collider2),
                ) else {
                    continue;
                };
                for manifold in &pair.manifolds {
                    if manifold.points.is_empty() {
                        continue;
                    }
                    let n = manifold.data.normal;
                    if records
                        .try_push(ContactRecord {
                            body_a,
                            body_b,
                            normal: Vec2::new(n.x, n.y),
                        })
                        .is_err()
                    {
                        return records;
                    }
                }
            }
        }
        records
    }

    fn collider_parent(&self, collider: ColliderHandle) -> Option<RigidBodyHandle> {
        self.colliders.get(collider).and_then(|c| c.parent())
    }
}
