//! Demo/idle player
//!
//! Aims slightly below the center of the next gap and flaps whenever the
//! avatar is falling past that line. Good enough to keep a demo round alive
//! for a long time on the default settings; it makes no attempt to be optimal.

use super::state::{GameState, Phase};

/// Fraction of the gap height (from its top) the autopilot steers toward
const AIM_FRACTION: f32 = 0.6;

/// Vertical line the autopilot is currently steering toward
pub fn aim_y(state: &GameState) -> f32 {
    let avatar = &state.avatar;
    let avatar_left = avatar.x - avatar.half_extent;

    state
        .obstacles
        .obstacles()
        .iter()
        .find(|o| o.trailing_edge() >= avatar_left)
        .map(|o| o.gap_start + o.gap_size * AIM_FRACTION)
        .unwrap_or_else(|| state.settings.playfield_bottom() * AIM_FRACTION)
}

/// Whether the autopilot wants to flap this tick
pub fn should_flap(state: &GameState) -> bool {
    match state.phase {
        Phase::Over => false,
        // Kick off idle rounds straight away
        Phase::Idle => true,
        Phase::Active => {
            let avatar = &state.avatar;
            avatar.velocity >= 0.0 && avatar.y > aim_y(state)
        }
    }
}
