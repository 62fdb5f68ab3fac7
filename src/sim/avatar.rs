//! The player-controlled avatar

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::settings::{ImpulsePolicy, Settings};

/// Falling/flapping avatar. Only `y` moves; `x` is fixed for the round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Avatar {
    pub x: f32,
    /// Vertical center (screen coordinates, down is positive)
    pub y: f32,
    /// Vertical speed per tick (negative = upward)
    pub velocity: f32,
    /// Half the side of the bounding box
    pub half_extent: f32,
}

impl Avatar {
    pub fn new(x: f32, y: f32, half_extent: f32) -> Self {
        Self {
            x,
            y,
            velocity: 0.0,
            half_extent,
        }
    }

    /// Fresh avatar at the configured start position
    pub fn spawn(settings: &Settings) -> Self {
        Self::new(
            settings.avatar_x,
            settings.avatar_start_y,
            settings.avatar_half_extent,
        )
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Bounding box used for every collision test
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_center(self.center(), self.half_extent)
    }

    /// Apply one tick of gravity, then move. No bounds checks.
    pub fn integrate(&mut self, gravity: f32) {
        self.velocity += gravity;
        self.y += self.velocity;
    }

    /// Flap
    pub fn impulse(&mut self, policy: ImpulsePolicy) {
        match policy {
            ImpulsePolicy::Set { velocity } => self.velocity = velocity,
            ImpulsePolicy::Additive {
                magnitude,
                max_upward_speed,
            } => {
                self.velocity -= magnitude;
                if let Some(max) = max_upward_speed {
                    self.velocity = self.velocity.max(-max);
                }
            }
        }
    }

    /// Pin to the top edge and stop rising
    pub fn clamp_to_top(&mut self) {
        self.y = self.half_extent;
        self.velocity = self.velocity.max(0.0);
    }
}
