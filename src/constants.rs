//! Fixed simulation constants.
//!
//! These are compile-time values, not configuration. Anything tunable per
//! level or per machine lives in [`GameConfig`](crate::resources::gameconfig::GameConfig).

/// Fixed physics interval in seconds.
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;

/// Solver sub-steps performed inside one fixed interval.
pub const SUB_STEPS: u32 = 4;

/// Maximum contact records read for the player body per integration.
pub const CONTACT_CAPACITY: usize = 4;

/// Normal component above which a contact counts as horizontal or vertical.
pub const CONTACT_NORMAL_THRESHOLD: f32 = 0.9;

pub const DEFAULT_DENSITY: f32 = 0.1;
pub const DEFAULT_FRICTION: f32 = 0.0;
pub const DEFAULT_RESTITUTION: f32 = 0.0;

/// Catch-up integrations allowed per frame unless the config says otherwise.
/// `0` means unbounded.
pub const DEFAULT_MAX_STEPS_PER_FRAME: u32 = 0;
