//! Scrolling gap obstacles
//!
//! Obstacles enter at the right edge, scroll left at a fixed speed and are
//! dropped once fully off-screen. The stream keeps them in spawn order, so
//! ids are increasing and the newest obstacle is always last.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::cosmetics::{Rgb, random_obstacle_color};
use crate::settings::{Settings, SpawnCadence};

/// A pair of blocking segments with one passable band between them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Left edge
    pub x: f32,
    /// Top of the passable band
    pub gap_start: f32,
    pub gap_size: f32,
    pub width: f32,
    /// Set once the avatar has passed the trailing edge
    pub scored: bool,
    pub color: Rgb,
}

impl Obstacle {
    /// Right edge
    #[inline]
    pub fn trailing_edge(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn gap_end(&self) -> f32 {
        self.gap_start + self.gap_size
    }

    /// Top and bottom blocking segments; the bottom one stops at the ground
    pub fn blocking_rects(&self, playfield_bottom: f32) -> [Rect; 2] {
        [
            Rect::from_xywh(self.x, 0.0, self.width, self.gap_start),
            Rect::from_xywh(
                self.x,
                self.gap_end(),
                self.width,
                playfield_bottom - self.gap_end(),
            ),
        ]
    }

    #[inline]
    pub fn is_offscreen(&self) -> bool {
        self.trailing_edge() < 0.0
    }
}

/// Ordered collection of live obstacles plus spawn bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleStream {
    obstacles: Vec<Obstacle>,
    /// Clock reading of the last spawn (interval cadence)
    last_spawn_ms: Option<u64>,
    next_id: u32,
}

impl Default for ObstacleStream {
    fn default() -> Self {
        Self::new()
    }
}

impl ObstacleStream {
    pub fn new() -> Self {
        Self {
            obstacles: Vec::new(),
            last_spawn_ms: None,
            next_id: 1,
        }
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Drop every obstacle and disarm the spawn timer
    pub fn clear(&mut self) {
        self.obstacles.clear();
        self.last_spawn_ms = None;
    }

    /// Scroll every obstacle left
    pub fn advance(&mut self, speed: f32) {
        for obstacle in &mut self.obstacles {
            obstacle.x -= speed;
        }
    }

    /// Spawn a new obstacle at the right edge if the cadence says so
    ///
    /// With interval cadence the first call after a clear only arms the
    /// timer, so a round never opens with an obstacle already on screen.
    pub fn spawn_if_due<R: Rng + ?Sized>(
        &mut self,
        now_ms: u64,
        settings: &Settings,
        rng: &mut R,
    ) -> Option<&Obstacle> {
        let due = match settings.cadence {
            SpawnCadence::Interval { interval_ms } => match self.last_spawn_ms {
                None => {
                    self.last_spawn_ms = Some(now_ms);
                    false
                }
                Some(last) => now_ms.saturating_sub(last) > interval_ms,
            },
            SpawnCadence::Distance { spacing } => match self.obstacles.last() {
                None => true,
                Some(last) => settings.screen_width - last.trailing_edge() > spacing,
            },
        };

        if !due {
            return None;
        }

        self.last_spawn_ms = Some(now_ms);
        let obstacle = self.roll_obstacle(settings, rng);
        log::debug!(
            "Spawned obstacle {} gap [{:.1}, {:.1})",
            obstacle.id,
            obstacle.gap_start,
            obstacle.gap_end()
        );
        self.obstacles.push(obstacle);
        self.obstacles.last()
    }

    /// Draw gap geometry so both segments keep at least `gap_margin` height
    fn roll_obstacle<R: Rng + ?Sized>(&mut self, settings: &Settings, rng: &mut R) -> Obstacle {
        let gap_size = if settings.gap.max > settings.gap.min {
            rng.random_range(settings.gap.min..=settings.gap.max)
        } else {
            settings.gap.min
        };

        let lo = settings.gap_margin;
        let hi = settings.playfield_bottom() - gap_size - settings.gap_margin;
        debug_assert!(hi >= lo, "gap does not fit playfield");
        let gap_start = if hi > lo {
            rng.random_range(lo..=hi)
        } else {
            lo
        };

        let id = self.next_id;
        self.next_id += 1;

        Obstacle {
            id,
            x: settings.screen_width,
            gap_start,
            gap_size,
            width: settings.obstacle_width,
            scored: false,
            color: random_obstacle_color(rng),
        }
    }

    /// Remove obstacles whose trailing edge has left the screen
    pub fn retire_offscreen(&mut self) -> usize {
        let before = self.obstacles.len();
        self.obstacles.retain(|o| !o.is_offscreen());
        before - self.obstacles.len()
    }

    /// Mark every obstacle the avatar has passed; returns newly scored count
    pub fn mark_scored(&mut self, avatar_x: f32) -> u32 {
        let mut newly = 0;
        for obstacle in self.obstacles.iter_mut().filter(|o| !o.scored) {
            if obstacle.trailing_edge() < avatar_x {
                obstacle.scored = true;
                newly += 1;
            }
        }
        newly
    }

    #[cfg(test)]
    pub(crate) fn push_for_test(&mut self, mut obstacle: Obstacle) -> u32 {
        obstacle.id = self.next_id;
        self.next_id += 1;
        let id = obstacle.id;
        self.obstacles.push(obstacle);
        id
    }
}
