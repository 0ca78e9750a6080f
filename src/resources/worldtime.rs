use bevy_ecs::prelude::Resource;

use crate::resources::Resettable;

/// Render-frame time, as opposed to the fixed physics interval.
#[derive(Resource, Clone, Copy, Debug)]
pub struct WorldTime {
    pub elapsed: f32,
    pub delta: f32,
    pub time_scale: f32,
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
            frame_count: 0,
        }
    }
}

impl WorldTime {
    pub fn with_time_scale(mut self, scale: f32) -> Self {
        self.time_scale = scale;
        self
    }
}

impl Resettable for WorldTime {
    fn reset(&mut self) {
        self.elapsed = 0.0;
        self.delta = 0.0;
        self.frame_count = 0;
    }
}
