//! Contact classification for the tracked player.
//!
//! Once per integration, after the rigid-body world has stepped, the player's
//! body is asked for up to [`CONTACT_CAPACITY`] contact manifolds. Each
//! manifold is judged on its own:
//!
//! 1. If either participant is tagged [`Tag::Obstacle`], or the normal points
//!    from the player to the other body along +x beyond the threshold (the
//!    player ran into something's left face), a [`PlayerDeath`] is published.
//! 2. Otherwise, if the other body lies below the player along the normal
//!    beyond the threshold, a [`PlayerGrounded`] is published.
//!
//! Records whose bodies no longer resolve to a live, tagged entity are
//! skipped. The classifier never mutates the world: events are triggered
//! through [`Commands`] and observers run after the pass is complete.

use arrayvec::ArrayVec;
use bevy_ecs::prelude::*;
use log::trace;
use rapier2d::prelude::RigidBodyHandle;

use crate::components::physicsbody::PhysicsBody;
use crate::components::tag::Tag;
use crate::constants::{CONTACT_CAPACITY, CONTACT_NORMAL_THRESHOLD};
use crate::events::physics::{PlayerDeath, PlayerGrounded};
use crate::resources::physicsworld::{ContactRecord, PhysicsWorld};
use crate::resources::scheduler::PhysicsScheduler;

/// Gameplay meaning of a single contact record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    Death,
    Grounded,
}

/// Classify one record. `tag_a`/`tag_b` belong to `record.body_a`/`body_b`.
///
/// Death takes priority over grounding. Returns `None` for side or ceiling
/// touches that mean nothing to gameplay.
pub fn classify_contact(
    player_body: RigidBodyHandle,
    record: &ContactRecord,
    tag_a: Tag,
    tag_b: Tag,
) -> Option<ContactOutcome> {
    // Rapier's normal points from body_a to body_b. Re-orient it so it always
    // points from the player towards the other participant.
    let toward_other = if record.body_a == player_body {
        record.normal
    } else {
        -record.normal
    };

    if tag_a == Tag::Obstacle || tag_b == Tag::Obstacle || toward_other.x > CONTACT_NORMAL_THRESHOLD
    {
        Some(ContactOutcome::Death)
    } else if -toward_other.y > CONTACT_NORMAL_THRESHOLD {
        Some(ContactOutcome::Grounded)
    } else {
        None
    }
}

/// Classify a batch of records, resolving each body to its tag with
/// `resolve_tag`. Records with an unresolvable participant are dropped.
pub fn classify_contacts<F>(
    player_body: RigidBodyHandle,
    records: &[ContactRecord],
    mut resolve_tag: F,
) -> ArrayVec<ContactOutcome, CONTACT_CAPACITY>
where
    F: FnMut(RigidBodyHandle) -> Option<Tag>,
{
    let mut outcomes = ArrayVec::new();
    for record in records.iter().take(CONTACT_CAPACITY) {
        let (Some(tag_a), Some(tag_b)) = (resolve_tag(record.body_a), resolve_tag(record.body_b))
        else {
            trace!("skipping contact with a dead participant: {:?}", record);
            continue;
        };
        if let Some(outcome) = classify_contact(player_body, record, tag_a, tag_b) {
            outcomes.push(outcome);
        }
    }
    outcomes
}

/// Publish death/grounded events for this step's player contacts.
pub fn classify_player_contacts(
    scheduler: Res<PhysicsScheduler>,
    physics: Res<PhysicsWorld>,
    bodies: Query<&PhysicsBody>,
    tags: Query<&Tag>,
    mut commands: Commands,
) {
    let Some(player) = scheduler.player else {
        return;
    };
    let Some(player_body) = bodies.get(player).ok().and_then(|pb| pb.body()) else {
        return;
    };

    let records = physics.contact_data(player_body);
    let outcomes = classify_contacts(player_body, &records, |body| {
        physics
            .entity_for_body(body)
            .and_then(|entity| tags.get(entity).ok())
            .copied()
    });

    for outcome in outcomes {
        match outcome {
            ContactOutcome::Death => commands.trigger(PlayerDeath { entity: player }),
            ContactOutcome::Grounded => commands.trigger(PlayerGrounded { entity: player }),
        }
    }
}
