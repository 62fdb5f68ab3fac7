//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Clock only via `TickInput::now_ms`
//! - Seeded RNG only
//! - Stable iteration order (obstacles in spawn order)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod avatar;
pub mod collision;
pub mod obstacle;
pub mod state;
pub mod tick;

pub use avatar::Avatar;
pub use collision::{CrashCause, Rect, ground_rect};
pub use obstacle::{Obstacle, ObstacleStream};
pub use state::{GameState, Phase, RoundEvent, Snapshot};
pub use tick::{TickInput, tick};
