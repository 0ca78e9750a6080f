//! Children attached to a group placeholder entity.

use bevy_ecs::prelude::{Component, Entity};
use smallvec::SmallVec;

/// Entities whose position is derived from this entity's body.
///
/// Stored on the placeholder parent created by
/// [`create_group`](crate::systems::lifecycle::create_group).
#[derive(Debug, Clone, Default, Component)]
pub struct GroupMembership {
    pub children: SmallVec<[Entity; 8]>,
}

impl GroupMembership {
    pub fn new(children: impl IntoIterator<Item = Entity>) -> Self {
        Self {
            children: children.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}
