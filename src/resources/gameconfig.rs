//! Game configuration resource.
//!
//! Tunables loaded from an INI configuration file. Every key has a safe
//! default, so a missing or partial file still yields a playable setup.
//! The fixed simulation constants are not configurable; see
//! [`crate::constants`].
//!
//! # Configuration File Format
//!
//! ```ini
//! [physics]
//! gravity_x = 0.0
//! gravity_y = -30.0
//! max_steps_per_frame = 0   # 0 = unbounded
//!
//! [player]
//! jump_velocity = 12.0
//!
//! [scroll]
//! bpm = 120.0
//! units_per_beat = 2.0
//!
//! [camera]
//! half_width = 16.0
//! half_height = 9.0
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use glam::Vec2;
use log::info;
use std::path::PathBuf;

use crate::constants::DEFAULT_MAX_STEPS_PER_FRAME;

/// Default safe values for startup
const DEFAULT_GRAVITY: Vec2 = Vec2::new(0.0, -30.0);
const DEFAULT_JUMP_VELOCITY: f32 = 12.0;
const DEFAULT_BPM: f32 = 120.0;
const DEFAULT_UNITS_PER_BEAT: f32 = 2.0;
const DEFAULT_CAMERA_HALF_WIDTH: f32 = 16.0;
const DEFAULT_CAMERA_HALF_HEIGHT: f32 = 9.0;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Game configuration resource.
#[derive(Resource, Debug, Clone)]
pub struct GameConfig {
    /// World gravity in units per second squared.
    pub gravity: Vec2,
    /// Catch-up integrations allowed per frame; `0` disables the cap.
    pub max_steps_per_frame: u32,
    /// Upward velocity given to the player on an accepted jump.
    pub jump_velocity: f32,
    /// Fallback tempo when no beat analysis is supplied.
    pub bpm: f32,
    /// World units scrolled per beat.
    pub units_per_beat: f32,
    /// Half of the visible width in world units.
    pub camera_half_width: f32,
    /// Half of the visible height in world units.
    pub camera_half_height: f32,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
            max_steps_per_frame: DEFAULT_MAX_STEPS_PER_FRAME,
            jump_velocity: DEFAULT_JUMP_VELOCITY,
            bpm: DEFAULT_BPM,
            units_per_beat: DEFAULT_UNITS_PER_BEAT,
            camera_half_width: DEFAULT_CAMERA_HALF_WIDTH,
            camera_half_height: DEFAULT_CAMERA_HALF_HEIGHT,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply(&config);
        Ok(())
    }

    /// Load configuration from INI text already in memory.
    pub fn load_from_str(&mut self, contents: &str) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .read(contents.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply(&config);
        Ok(())
    }

    fn apply(&mut self, config: &Ini) {
        // [physics] section
        if let Some(x) = config.getfloat("physics", "gravity_x").ok().flatten() {
            self.gravity.x = x as f32;
        }
        if let Some(y) = config.getfloat("physics", "gravity_y").ok().flatten() {
            self.gravity.y = y as f32;
        }
        if let Some(max) = config
            .getuint("physics", "max_steps_per_frame")
            .ok()
            .flatten()
        {
            self.max_steps_per_frame = max as u32;
        }

        // [player] section
        if let Some(v) = config.getfloat("player", "jump_velocity").ok().flatten() {
            self.jump_velocity = v as f32;
        }

        // [scroll] section
        if let Some(bpm) = config.getfloat("scroll", "bpm").ok().flatten() {
            self.bpm = bpm as f32;
        }
        if let Some(units) = config.getfloat("scroll", "units_per_beat").ok().flatten() {
            self.units_per_beat = units as f32;
        }

        // [camera] section
        if let Some(w) = config.getfloat("camera", "half_width").ok().flatten() {
            self.camera_half_width = w as f32;
        }
        if let Some(h) = config.getfloat("camera", "half_height").ok().flatten() {
            self.camera_half_height = h as f32;
        }

        info!(
            "Loaded config: gravity=({}, {}), max_steps={}, jump={}, bpm={}, units_per_beat={}, camera={}x{}",
            self.gravity.x,
            self.gravity.y,
            self.max_steps_per_frame,
            self.jump_velocity,
            self.bpm,
            self.units_per_beat,
            self.camera_half_width,
            self.camera_half_height
        );
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        config.set("physics", "gravity_x", Some(self.gravity.x.to_string()));
        config.set("physics", "gravity_y", Some(self.gravity.y.to_string()));
        config.set(
            "physics",
            "max_steps_per_frame",
            Some(self.max_steps_per_frame.to_string()),
        );
        config.set("player", "jump_velocity", Some(self.jump_velocity.to_string()));
        config.set("scroll", "bpm", Some(self.bpm.to_string()));
        config.set(
            "scroll",
            "units_per_beat",
            Some(self.units_per_beat.to_string()),
        );
        config.set(
            "camera",
            "half_width",
            Some(self.camera_half_width.to_string()),
        );
        config.set(
            "camera",
            "half_height",
            Some(self.camera_half_height.to_string()),
        );

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Visible half extents as a vector.
    pub fn camera_half_extents(&self) -> Vec2 {
        Vec2::new(self.camera_half_width, self.camera_half_height)
    }
}
