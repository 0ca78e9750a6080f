//! Song tempo resource driving the level's scroll speed.
//!
//! The beat analysis itself happens outside the engine; only its output (a
//! BPM and beat timestamps in seconds) lands here.

use bevy_ecs::prelude::Resource;

#[derive(Resource, Debug, Clone)]
pub struct TempoScroll {
    pub bpm: f32,
    /// World units travelled per beat.
    pub units_per_beat: f32,
    /// Beat onsets in seconds from song start.
    pub beats: Vec<f32>,
}

impl Default for TempoScroll {
    fn default() -> Self {
        Self::new(120.0, 2.0)
    }
}

impl TempoScroll {
    pub fn new(bpm: f32, units_per_beat: f32) -> Self {
        Self {
            bpm,
            units_per_beat,
            beats: Vec::new(),
        }
    }

    pub fn with_beats(mut self, beats: Vec<f32>) -> Self {
        self.beats = beats;
        self
    }

    /// Scroll speed in world units per second.
    pub fn speed(&self) -> f32 {
        self.bpm / 60.0 * self.units_per_beat
    }

    /// Evenly spaced beats for `duration` seconds, used when no analysis is
    /// available.
    pub fn regular_beats(bpm: f32, duration: f32) -> Vec<f32> {
        if bpm <= 0.0 {
            return Vec::new();
        }
        let period = 60.0 / bpm;
        let count = (duration / period).floor() as usize;
        (0..=count).map(|i| i as f32 * period).collect()
    }
}
