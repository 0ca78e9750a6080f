//! Queue of bodies to destroy at the end of the current physics step.
//!
//! Observers reacting to this step's contact events must not free a body the
//! classifier may still be reading. They push its handle here instead; the
//! physics step drains the queue in its removal phase, after classification.

use bevy_ecs::prelude::Resource;
use rapier2d::prelude::RigidBodyHandle;
use smallvec::SmallVec;

#[derive(Resource, Debug, Default)]
pub struct PendingBodyRemovals {
    queued: SmallVec<[RigidBodyHandle; 8]>,
}

impl PendingBodyRemovals {
    /// Queue a body. Queuing the same handle twice is harmless.
    pub fn queue(&mut self, body: RigidBodyHandle) {
        if !self.queued.contains(&body) {
            self.queued.push(body);
        }
    }

    pub fn is_queued(&self, body: RigidBodyHandle) -> bool {
        self.queued.contains(&body)
    }

    pub fn is_empty(&self) -> bool {
        self.queued.is_empty()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = RigidBodyHandle> + '_ {
        self.queued.drain(..)
    }
}
