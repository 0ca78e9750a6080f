//! Camera follow.

use bevy_ecs::prelude::*;

use crate::components::transform::Transform;
use crate::resources::camera::CameraView;
use crate::resources::scheduler::PhysicsScheduler;

/// Centre the camera horizontally on the player when follow is enabled.
pub fn camera_follow_player(
    scheduler: Res<PhysicsScheduler>,
    transforms: Query<&Transform>,
    camera: Option<ResMut<CameraView>>,
) {
    let Some(mut camera) = camera else {
        return;
    };
    if !camera.follow_player {
        return;
    }
    let Some(player) = scheduler.player else {
        return;
    };
    if let Ok(transform) = transforms.get(player) {
        camera.center.x = transform.position.x;
    }
}
