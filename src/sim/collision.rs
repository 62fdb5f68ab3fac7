//! Collision detection for axis-aligned boxes
//!
//! Screen coordinates: x grows right, y grows down. Every test in the game
//! reduces to rectangle overlap between the avatar's box and a blocking
//! rectangle (obstacle segment or ground strip).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::avatar::Avatar;
use super::obstacle::Obstacle;
use crate::settings::Settings;

/// Axis-aligned rectangle spanning `[min, max)` on both axes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    /// Rectangle from top-left corner and size
    pub fn from_xywh(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + w, y + h),
        }
    }

    /// Square centered on `center`
    pub fn from_center(center: Vec2, half_extent: f32) -> Self {
        Self {
            min: center - Vec2::splat(half_extent),
            max: center + Vec2::splat(half_extent),
        }
    }

    /// Strict overlap: boxes that only share an edge do not collide
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}

/// Why a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrashCause {
    Ground,
    Ceiling,
    Obstacle { id: u32 },
}

/// Ground strip rectangle
pub fn ground_rect(settings: &Settings) -> Rect {
    Rect::from_xywh(
        0.0,
        settings.playfield_bottom(),
        settings.screen_width,
        settings.ground_height,
    )
}

/// Avatar touching (or below) the top of the ground strip
#[inline]
pub fn hits_ground(avatar: &Avatar, settings: &Settings) -> bool {
    avatar.bounds().max.y >= ground_rect(settings).min.y
}

/// Avatar box poking above the top edge of the screen
#[inline]
pub fn above_top(avatar: &Avatar) -> bool {
    avatar.bounds().min.y < 0.0
}

/// Avatar box overlapping either blocking segment of an obstacle
pub fn hits_obstacle(avatar: &Avatar, obstacle: &Obstacle, settings: &Settings) -> bool {
    let bounds = avatar.bounds();
    let [top, bottom] = obstacle.blocking_rects(settings.playfield_bottom());
    bounds.overlaps(&top) || bounds.overlaps(&bottom)
}

/// First obstacle the avatar overlaps (stream order)
pub fn first_obstacle_hit<'a>(
    avatar: &Avatar,
    obstacles: &'a [Obstacle],
    settings: &Settings,
) -> Option<&'a Obstacle> {
    obstacles.iter().find(|o| hits_obstacle(avatar, o, settings))
}
