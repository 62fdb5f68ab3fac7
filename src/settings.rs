//! Game settings and tuning
//!
//! Every number the simulation uses lives here. Settings are validated once,
//! when a [`GameState`](crate::sim::GameState) is created; the tick loop
//! assumes they are sane.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Preset {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Preset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Easy => "Easy",
            Preset::Normal => "Normal",
            Preset::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Preset::Easy),
            "normal" | "norm" => Some(Preset::Normal),
            "hard" => Some(Preset::Hard),
            _ => None,
        }
    }

    /// Vertical gap between blocking segments
    pub fn gap_size(&self) -> f32 {
        match self {
            Preset::Easy => 180.0,
            Preset::Normal => GAP_SIZE,
            Preset::Hard => 120.0,
        }
    }

    /// Horizontal scroll speed per tick
    pub fn obstacle_speed(&self) -> f32 {
        match self {
            Preset::Easy => 2.5,
            Preset::Normal => OBSTACLE_SPEED,
            Preset::Hard => 4.0,
        }
    }

    /// Time between spawns for interval cadence
    pub fn spawn_interval_ms(&self) -> u64 {
        match self {
            Preset::Easy => 1800,
            Preset::Normal => SPAWN_INTERVAL_MS,
            Preset::Hard => 1200,
        }
    }
}

/// What a flap does to the avatar's velocity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImpulsePolicy {
    /// Velocity is replaced by a fixed (negative) value
    Set { velocity: f32 },
    /// Velocity is decremented; repeated flaps stack up to the optional clamp
    Additive {
        magnitude: f32,
        max_upward_speed: Option<f32>,
    },
}

impl Default for ImpulsePolicy {
    fn default() -> Self {
        ImpulsePolicy::Set {
            velocity: FLAP_VELOCITY,
        }
    }
}

/// What happens when the avatar crosses the top of the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TopBoundary {
    /// Crossing the top edge ends the round
    #[default]
    Terminate,
    /// Avatar is pinned to the top edge and stops rising
    Clamp,
}

/// When a new obstacle enters from the right
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpawnCadence {
    /// Fixed wall-clock interval since the previous spawn
    Interval { interval_ms: u64 },
    /// Once the newest obstacle's trailing edge is this far from the right edge
    Distance { spacing: f32 },
}

impl Default for SpawnCadence {
    fn default() -> Self {
        SpawnCadence::Interval {
            interval_ms: SPAWN_INTERVAL_MS,
        }
    }
}

/// Inclusive range the gap size is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GapRange {
    pub min: f32,
    pub max: f32,
}

impl GapRange {
    pub fn fixed(size: f32) -> Self {
        Self {
            min: size,
            max: size,
        }
    }
}

impl Default for GapRange {
    fn default() -> Self {
        Self::fixed(GAP_SIZE)
    }
}

/// Rejected configuration
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("{name} must be a finite positive number, got {value}")]
    NotPositive { name: &'static str, value: f32 },
    #[error("{name} must be finite and non-negative, got {value}")]
    Negative { name: &'static str, value: f32 },
    #[error("ground height {ground} leaves no playfield on a {screen} tall screen")]
    GroundTooTall { ground: f32, screen: f32 },
    #[error("gap range is inverted: min {min} > max {max}")]
    GapRangeInverted { min: f32, max: f32 },
    #[error("gap {gap} is not larger than the avatar ({avatar})")]
    GapTooSmall { gap: f32, avatar: f32 },
    #[error("gap {gap} plus margins ({margin} each side) does not fit a {playfield} playfield")]
    GapDoesNotFit { gap: f32, margin: f32, playfield: f32 },
    #[error("avatar start ({x}, {y}) is outside the playfield")]
    AvatarOutsidePlayfield { x: f32, y: f32 },
    #[error("impulse must push upward")]
    ImpulseNotUpward,
    #[error("invalid settings json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to read settings from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Preset these settings were derived from
    pub preset: Preset,

    // === Screen ===
    pub screen_width: f32,
    pub screen_height: f32,
    /// Height of the ground strip
    pub ground_height: f32,

    // === Avatar ===
    /// Fixed horizontal position of the avatar center
    pub avatar_x: f32,
    /// Vertical position of the avatar center at round start
    pub avatar_start_y: f32,
    /// Half of the avatar's bounding box side
    pub avatar_half_extent: f32,
    /// Velocity change per tick (positive = downward)
    pub gravity: f32,
    pub impulse: ImpulsePolicy,
    pub top_boundary: TopBoundary,

    // === Obstacles ===
    /// Leftward scroll per tick
    pub obstacle_speed: f32,
    pub obstacle_width: f32,
    pub gap: GapRange,
    /// Minimum height of each blocking segment
    pub gap_margin: f32,
    pub cadence: SpawnCadence,

    // === Flow ===
    /// Wait for a first flap before the round starts
    pub start_idle: bool,
    /// Tick rate the caller drives the simulation at
    pub tick_rate_hz: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            preset: Preset::Normal,

            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            ground_height: GROUND_HEIGHT,

            avatar_x: AVATAR_X,
            avatar_start_y: AVATAR_START_Y,
            avatar_half_extent: AVATAR_HALF_EXTENT,
            gravity: GRAVITY,
            impulse: ImpulsePolicy::default(),
            top_boundary: TopBoundary::default(),

            obstacle_speed: OBSTACLE_SPEED,
            obstacle_width: OBSTACLE_WIDTH,
            gap: GapRange::default(),
            gap_margin: GAP_MARGIN,
            cadence: SpawnCadence::default(),

            start_idle: false,
            tick_rate_hz: TICK_RATE_HZ,
        }
    }
}

impl Settings {
    /// Create settings from a preset (applies preset defaults)
    pub fn from_preset(preset: Preset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a preset (updates difficulty-dependent settings)
    pub fn apply_preset(&mut self, preset: Preset) {
        self.preset = preset;
        self.gap = GapRange::fixed(preset.gap_size());
        self.obstacle_speed = preset.obstacle_speed();
        if let SpawnCadence::Interval { .. } = self.cadence {
            self.cadence = SpawnCadence::Interval {
                interval_ms: preset.spawn_interval_ms(),
            };
        }
    }

    /// Bottom of the playfield (top of the ground strip)
    #[inline]
    pub fn playfield_bottom(&self) -> f32 {
        self.screen_height - self.ground_height
    }

    /// Milliseconds per tick at the configured rate
    pub fn tick_ms(&self) -> f64 {
        1000.0 / self.tick_rate_hz.max(1) as f64
    }

    /// Check every invariant the simulation relies on
    pub fn validate(&self) -> Result<(), SettingsError> {
        positive("screen_width", self.screen_width)?;
        positive("screen_height", self.screen_height)?;
        non_negative("ground_height", self.ground_height)?;
        positive("avatar_half_extent", self.avatar_half_extent)?;
        non_negative("gravity", self.gravity)?;
        positive("obstacle_speed", self.obstacle_speed)?;
        positive("obstacle_width", self.obstacle_width)?;
        positive("gap_margin", self.gap_margin)?;

        if self.ground_height >= self.screen_height {
            return Err(SettingsError::GroundTooTall {
                ground: self.ground_height,
                screen: self.screen_height,
            });
        }

        if self.gap.min > self.gap.max {
            return Err(SettingsError::GapRangeInverted {
                min: self.gap.min,
                max: self.gap.max,
            });
        }
        let avatar_size = self.avatar_half_extent * 2.0;
        if !self.gap.min.is_finite() || self.gap.min <= avatar_size {
            return Err(SettingsError::GapTooSmall {
                gap: self.gap.min,
                avatar: avatar_size,
            });
        }
        let playfield = self.playfield_bottom();
        if !self.gap.max.is_finite() || self.gap.max + 2.0 * self.gap_margin > playfield {
            return Err(SettingsError::GapDoesNotFit {
                gap: self.gap.max,
                margin: self.gap_margin,
                playfield,
            });
        }

        let inside_x = self.avatar_x >= 0.0 && self.avatar_x <= self.screen_width;
        let inside_y = self.avatar_start_y - self.avatar_half_extent >= 0.0
            && self.avatar_start_y + self.avatar_half_extent < playfield;
        if !(inside_x && inside_y) {
            return Err(SettingsError::AvatarOutsidePlayfield {
                x: self.avatar_x,
                y: self.avatar_start_y,
            });
        }

        match self.impulse {
            ImpulsePolicy::Set { velocity } if velocity.is_nan() || velocity >= 0.0 => {
                return Err(SettingsError::ImpulseNotUpward);
            }
            ImpulsePolicy::Additive {
                magnitude,
                max_upward_speed,
            } => {
                positive("impulse.magnitude", magnitude)?;
                if let Some(max) = max_upward_speed {
                    positive("impulse.max_upward_speed", max)?;
                }
            }
            _ => {}
        }

        match self.cadence {
            SpawnCadence::Interval { interval_ms } if interval_ms == 0 => {
                return Err(SettingsError::NotPositive {
                    name: "cadence.interval_ms",
                    value: 0.0,
                });
            }
            SpawnCadence::Distance { spacing } => non_negative("cadence.spacing", spacing)?,
            _ => {}
        }

        Ok(())
    }

    /// Parse and validate settings from JSON (missing fields use defaults)
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load and validate settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!(
            "Loaded settings from {} (preset {})",
            path.display(),
            settings.preset.as_str()
        );
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), SettingsError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SettingsError::NotPositive { name, value })
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), SettingsError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SettingsError::Negative { name, value })
    }
}
