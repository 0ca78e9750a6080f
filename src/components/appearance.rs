use bevy_ecs::prelude::Component;

/// Render hint attached by the spawn factory. The physics core never reads it.
#[derive(Component, Clone, Debug, PartialEq)]
pub struct Appearance {
    /// Key of the texture in the renderer's store.
    pub tex_key: String,
    /// RGBA tint, each channel in `0.0..=1.0`.
    pub tint: [f32; 4],
}

impl Appearance {
    pub fn new(tex_key: impl Into<String>) -> Self {
        Self {
            tex_key: tex_key.into(),
            tint: [1.0, 1.0, 1.0, 1.0],
        }
    }

    pub fn with_tint(mut self, tint: [f32; 4]) -> Self {
        self.tint = tint;
        self
    }
}
