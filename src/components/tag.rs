//! Single classification tag per entity.
//!
//! Tags branch behavior in contact classification (obstacles kill), the
//! lifecycle factory (players are dynamic, beats have no body), and the
//! scroll systems (which tags move with the song).

use std::fmt;
use std::str::FromStr;

use bevy_ecs::prelude::Component;

#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    Player,
    Platform,
    Obstacle,
    Ground,
    Beat,
    Timeline,
}

impl Tag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Player => "player",
            Tag::Platform => "platform",
            Tag::Obstacle => "obstacle",
            Tag::Ground => "ground",
            Tag::Beat => "beat",
            Tag::Timeline => "timeline",
        }
    }

    /// Whether entities with this tag travel with the song.
    pub fn scrolls(&self) -> bool {
        matches!(self, Tag::Platform | Tag::Obstacle | Tag::Ground)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "player" => Ok(Tag::Player),
            "platform" => Ok(Tag::Platform),
            "obstacle" => Ok(Tag::Obstacle),
            "ground" => Ok(Tag::Ground),
            "beat" => Ok(Tag::Beat),
            "timeline" => Ok(Tag::Timeline),
            other => Err(format!("Unknown tag: {}", other)),
        }
    }
}
