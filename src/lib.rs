//! Flapper - A gap-dodging arcade game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (avatar physics, obstacles, collisions, round state)
//! - `settings`: Tunable constants, policies and presets
//! - `cosmetics`: Per-round colors and avatar shape
//! - `highscores`: In-memory leaderboard of finished rounds

pub mod cosmetics;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use cosmetics::{AvatarShape, Cosmetics, Rgb};
pub use highscores::HighScores;
pub use settings::{Preset, Settings, SettingsError};

/// Game configuration constants (defaults for [`Settings`])
pub mod consts {
    /// Target simulation rate (ticks per second)
    pub const TICK_RATE_HZ: u32 = 60;

    /// Screen dimensions
    pub const SCREEN_WIDTH: f32 = 400.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;
    /// Ground strip at the bottom of the screen (contact is always terminal)
    pub const GROUND_HEIGHT: f32 = 100.0;

    /// Avatar defaults - fixed column a quarter of the way across
    pub const AVATAR_X: f32 = SCREEN_WIDTH / 4.0;
    pub const AVATAR_START_Y: f32 = SCREEN_HEIGHT / 2.0;
    pub const AVATAR_HALF_EXTENT: f32 = 10.0;

    /// Downward acceleration per tick
    pub const GRAVITY: f32 = 0.5;
    /// Velocity set on flap (negative = upward)
    pub const FLAP_VELOCITY: f32 = -8.0;

    /// Obstacle defaults
    pub const OBSTACLE_SPEED: f32 = 3.0;
    pub const OBSTACLE_WIDTH: f32 = 50.0;
    pub const GAP_SIZE: f32 = 150.0;
    /// Minimum height of each blocking segment
    pub const GAP_MARGIN: f32 = 50.0;
    /// Time between spawns for interval cadence
    pub const SPAWN_INTERVAL_MS: u64 = 1500;
}
