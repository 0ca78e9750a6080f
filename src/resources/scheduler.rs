//! Fixed-timestep scheduler state.
//!
//! The frame driver feeds every frame's elapsed time into
//! [`PhysicsScheduler::accumulator`]; the physics step system drains it in
//! whole [`FIXED_TIMESTEP`](crate::constants::FIXED_TIMESTEP) slices. The
//! loop itself lives in [`crate::systems::physicsstep`].

use bevy_ecs::prelude::{Entity, Resource};

use crate::resources::Resettable;

#[derive(Resource, Debug, Clone)]
pub struct PhysicsScheduler {
    /// Unconsumed simulation time in seconds.
    pub accumulator: f32,
    /// When false the scheduler neither accumulates nor integrates.
    pub active: bool,
    /// The tracked player. Contact classification runs against its body.
    pub player: Option<Entity>,
    /// Catch-up cap per frame; `None` means unbounded.
    pub max_steps_per_frame: Option<u32>,
    /// Integration passes performed since the last reset.
    pub steps_taken: u64,
}

impl Default for PhysicsScheduler {
    fn default() -> Self {
        Self {
            accumulator: 0.0,
            active: true,
            player: None,
            max_steps_per_frame: None,
            steps_taken: 0,
        }
    }
}

impl PhysicsScheduler {
    /// A `0` cap from the config file means unbounded.
    pub fn with_max_steps(mut self, max: u32) -> Self {
        self.max_steps_per_frame = if max == 0 { None } else { Some(max) };
        self
    }
}

impl Resettable for PhysicsScheduler {
    fn reset(&mut self) {
        self.accumulator = 0.0;
        self.steps_taken = 0;
    }
}
