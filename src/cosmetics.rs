//! Per-round cosmetic choices
//!
//! Colors and the avatar's shape are re-rolled on every restart. They never
//! feed back into physics or scoring, and they are drawn from their own RNG
//! stream so a re-roll cannot shift the obstacle sequence.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// An sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const DARK_BROWN: Rgb = Rgb(101, 67, 33);
    pub const YELLOW: Rgb = Rgb(218, 165, 32);
    pub const DARK_GREEN: Rgb = Rgb(0, 100, 0);
    pub const LIGHT_BROWN: Rgb = Rgb(210, 180, 140);
    pub const DARK_GRAY: Rgb = Rgb(64, 64, 64);
    pub const LIGHT_BLUE: Rgb = Rgb(135, 206, 250);
}

/// Land strip colors
pub const LAND_COLORS: [Rgb; 2] = [Rgb::DARK_BROWN, Rgb::YELLOW];
/// Obstacle colors
pub const OBSTACLE_COLORS: [Rgb; 3] = [Rgb::DARK_GREEN, Rgb::LIGHT_BROWN, Rgb::DARK_GRAY];

/// Outline used to draw the avatar (collision always uses the bounding box)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AvatarShape {
    Square,
    Circle,
    Triangle,
}

impl AvatarShape {
    pub const ALL: [AvatarShape; 3] = [AvatarShape::Square, AvatarShape::Circle, AvatarShape::Triangle];
}

/// Everything the presentation layer needs to color a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cosmetics {
    pub background: Rgb,
    pub land: Rgb,
    pub avatar: Rgb,
    pub avatar_shape: AvatarShape,
}

/// The opening round's look: sky blue over brown land
impl Default for Cosmetics {
    fn default() -> Self {
        Self {
            background: Rgb::LIGHT_BLUE,
            land: Rgb::DARK_BROWN,
            avatar: Rgb(0, 0, 0),
            avatar_shape: AvatarShape::Square,
        }
    }
}

impl Cosmetics {
    /// Roll a fresh set of cosmetics
    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            background: random_light_color(rng),
            land: pick(rng, &LAND_COLORS),
            avatar: random_dark_color(rng),
            avatar_shape: pick(rng, &AvatarShape::ALL),
        }
    }
}

/// Pastel color (every channel in 150..=255)
pub fn random_light_color<R: Rng + ?Sized>(rng: &mut R) -> Rgb {
    Rgb(
        rng.random_range(150..=255),
        rng.random_range(150..=255),
        rng.random_range(150..=255),
    )
}

/// Dark color (every channel in 0..=100)
pub fn random_dark_color<R: Rng + ?Sized>(rng: &mut R) -> Rgb {
    Rgb(
        rng.random_range(0..=100),
        rng.random_range(0..=100),
        rng.random_range(0..=100),
    )
}

/// Color for a newly spawned obstacle
pub fn random_obstacle_color<R: Rng + ?Sized>(rng: &mut R) -> Rgb {
    pick(rng, &OBSTACLE_COLORS)
}

fn pick<R: Rng + ?Sized, T: Copy, const N: usize>(rng: &mut R, items: &[T; N]) -> T {
    items[rng.random_range(0..N)]
}
