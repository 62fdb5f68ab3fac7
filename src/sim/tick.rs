//! Per-frame simulation tick
//!
//! Core game loop that advances the round deterministically.

use super::autopilot;
use super::collision::{CrashCause, above_top, first_obstacle_hit, hits_ground};
use super::state::{GameState, Phase, RoundEvent, Snapshot};
use crate::settings::TopBoundary;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Flap (space/click/tap)
    pub flap: bool,
    /// Restart after game over
    pub restart: bool,
    /// Frame clock in milliseconds, supplied by the frame pacer
    pub now_ms: u64,
    /// Idle/demo mode - autopilot decides when to flap
    pub autopilot: bool,
}

/// Advance the game state by one frame
pub fn tick<'a>(state: &'a mut GameState, input: &TickInput) -> Snapshot<'a> {
    state.begin_batch();

    if input.restart {
        state.on_trigger_restart();
    }

    if input.flap || (input.autopilot && autopilot::should_flap(state)) {
        state.on_trigger_impulse();
    }

    // Idle and Over rounds don't move
    if state.phase != Phase::Active {
        return state.hand_off();
    }

    state.time_ticks += 1;

    state.avatar.integrate(state.settings.gravity);

    state.obstacles.advance(state.settings.obstacle_speed);
    state
        .obstacles
        .spawn_if_due(input.now_ms, &state.settings, &mut state.rng);
    state.obstacles.retire_offscreen();

    if let Some(cause) = terminal_condition(state) {
        state.end_round(cause);
        return state.hand_off();
    }

    let passed = state.obstacles.mark_scored(state.avatar.x);
    for _ in 0..passed {
        state.score += 1;
        state.push_event(RoundEvent::Scored { score: state.score });
        log::debug!("Score {} (tick {})", state.score, state.time_ticks);
    }

    state.hand_off()
}

/// Ground, then top edge, then obstacles. Clamps the avatar when the top
/// boundary is configured to clamp.
fn terminal_condition(state: &mut GameState) -> Option<CrashCause> {
    if hits_ground(&state.avatar, &state.settings) {
        return Some(CrashCause::Ground);
    }

    if above_top(&state.avatar) {
        match state.settings.top_boundary {
            TopBoundary::Terminate => return Some(CrashCause::Ceiling),
            TopBoundary::Clamp => state.avatar.clamp_to_top(),
        }
    }

    first_obstacle_hit(&state.avatar, state.obstacles.obstacles(), &state.settings)
        .map(|o| CrashCause::Obstacle { id: o.id })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cosmetics::Rgb;
    use crate::settings::{ImpulsePolicy, Settings, SpawnCadence};
    use crate::sim::obstacle::Obstacle;
    use proptest::prelude::*;

    fn obstacle(x: f32, gap_start: f32, gap_size: f32) -> Obstacle {
        Obstacle {
            id: 0,
            x,
            gap_start,
            gap_size,
            width: 50.0,
            scored: false,
            color: Rgb::DARK_GREEN,
        }
    }

    fn at(ms: u64) -> TickInput {
        TickInput {
            now_ms: ms,
            ..Default::default()
        }
    }

    #[test]
    fn test_free_fall_scenario() {
        let settings = Settings {
            avatar_half_extent: 30.0,
            ..Default::default()
        };
        let mut state = GameState::new(1, settings).unwrap();
        for i in 0..10 {
            tick(&mut state, &at(i * 16));
        }
        assert_eq!(state.phase, Phase::Active);
        assert_eq!(state.avatar.velocity, 5.0);
        assert_eq!(state.avatar.y, 327.5);
        assert_eq!(state.time_ticks, 10);
    }

    #[test]
    fn test_ground_ends_round_immediately() {
        let mut state = GameState::new(1, Settings::default()).unwrap();
        state.avatar.y = 495.0;
        // Sitting inside a gap does not save it
        state.obstacles.push_for_test(obstacle(80.0, 300.0, 190.0));
        let snapshot = tick(&mut state, &at(0));
        assert_eq!(snapshot.phase, Phase::Over);
        assert_eq!(
            snapshot.events,
            &[RoundEvent::Crashed {
                cause: CrashCause::Ground
            }]
        );
    }

    #[test]
    fn test_ceiling_terminates_by_default() {
        let mut state = GameState::new(1, Settings::default()).unwrap();
        state.avatar.y = 12.0;
        state.avatar.velocity = -5.0;
        tick(&mut state, &at(0));
        assert_eq!(state.phase, Phase::Over);
        assert_eq!(
            state.events,
            vec![RoundEvent::Crashed {
                cause: CrashCause::Ceiling
            }]
        );
    }

    #[test]
    fn test_ceiling_clamp_continues() {
        let settings = Settings {
            top_boundary: TopBoundary::Clamp,
            ..Default::default()
        };
        let mut state = GameState::new(1, settings).unwrap();
        state.avatar.y = 12.0;
        state.avatar.velocity = -5.0;
        tick(&mut state, &at(0));
        assert_eq!(state.phase, Phase::Active);
        assert_eq!(state.avatar.y, 10.0);
        assert_eq!(state.avatar.velocity, 0.0);
    }

    #[test]
    fn test_obstacle_collision_ends_round() {
        let mut state = GameState::new(1, Settings::default()).unwrap();
        let id = state.obstacles.push_for_test(obstacle(80.0, 350.0, 140.0));
        tick(&mut state, &at(0));
        assert_eq!(state.phase, Phase::Over);
        assert_eq!(
            state.events,
            vec![RoundEvent::Crashed {
                cause: CrashCause::Obstacle { id }
            }]
        );
    }

    #[test]
    fn test_passing_obstacle_scores_once() {
        let mut state = GameState::new(1, Settings::default()).unwrap();
        // After one advance the trailing edge sits at 92, left of the avatar at 100
        state.obstacles.push_for_test(obstacle(45.0, 200.0, 150.0));
        let snapshot = tick(&mut state, &at(0));
        assert_eq!(snapshot.phase, Phase::Active);
        assert_eq!(snapshot.score, 1);
        assert_eq!(snapshot.events, &[RoundEvent::Scored { score: 1 }]);

        tick(&mut state, &at(16));
        assert_eq!(state.score, 1);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_crash_tick_does_not_score() {
        let mut state = GameState::new(1, Settings::default()).unwrap();
        state.obstacles.push_for_test(obstacle(45.0, 200.0, 150.0));
        state.avatar.y = 495.0;
        tick(&mut state, &at(0));
        assert_eq!(state.phase, Phase::Over);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_over_ignores_ticks_and_flaps() {
        let mut state = GameState::new(1, Settings::default()).unwrap();
        state.avatar.y = 495.0;
        tick(&mut state, &at(0));
        let frozen = state.avatar.clone();
        let flap = TickInput {
            flap: true,
            now_ms: 16,
            ..Default::default()
        };
        tick(&mut state, &flap);
        tick(&mut state, &at(32));
        assert_eq!(state.phase, Phase::Over);
        assert_eq!(state.avatar, frozen);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_restart_round_trip() {
        let mut state = GameState::new(1, Settings::default()).unwrap();
        state.obstacles.push_for_test(obstacle(300.0, 200.0, 150.0));
        state.avatar.y = 495.0;
        tick(&mut state, &at(0));
        assert_eq!(state.phase, Phase::Over);

        let restart = TickInput {
            restart: true,
            now_ms: 16,
            ..Default::default()
        };
        let snapshot = tick(&mut state, &restart);
        assert_eq!(snapshot.phase, Phase::Active);
        assert_eq!(snapshot.score, 0);
        assert!(snapshot.obstacles.is_empty());
        assert_eq!(snapshot.events, &[RoundEvent::Restarted]);
    }

    #[test]
    fn test_direct_impulse_events_reach_snapshot() {
        let settings = Settings {
            start_idle: true,
            ..Default::default()
        };
        let mut state = GameState::new(1, settings).unwrap();
        state.on_trigger_impulse();
        let snapshot = tick(&mut state, &at(0));
        assert_eq!(snapshot.phase, Phase::Active);
        assert_eq!(snapshot.events, &[RoundEvent::Started, RoundEvent::Flapped]);

        // Delivered once, not repeated on the next frame
        tick(&mut state, &at(16));
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_direct_restart_event_reaches_snapshot() {
        let mut state = GameState::new(1, Settings::default()).unwrap();
        state.avatar.y = 495.0;
        tick(&mut state, &at(0));
        assert_eq!(state.phase, Phase::Over);

        state.on_trigger_restart();
        // The crash from the previous frame is gone
        assert_eq!(state.events, vec![RoundEvent::Restarted]);
        let snapshot = tick(&mut state, &at(16));
        assert_eq!(snapshot.phase, Phase::Active);
        assert_eq!(snapshot.round, 2);
        assert_eq!(snapshot.events, &[RoundEvent::Restarted]);
    }

    #[test]
    fn test_state_resumes_from_json() {
        let settings = Settings {
            cadence: SpawnCadence::Distance { spacing: 150.0 },
            ..Default::default()
        };
        let mut state = GameState::new(5, settings).unwrap();
        let input = |i: u64| TickInput {
            now_ms: i * 16,
            autopilot: true,
            restart: true,
            ..Default::default()
        };
        for i in 0..120 {
            tick(&mut state, &input(i));
        }

        let json = serde_json::to_string(&state).unwrap();
        let mut restored: GameState = serde_json::from_str(&json).unwrap();
        for i in 120..400 {
            tick(&mut state, &input(i));
            tick(&mut restored, &input(i));
        }

        assert_eq!(restored.phase, state.phase);
        assert_eq!(restored.round, state.round);
        assert_eq!(restored.score, state.score);
        assert_eq!(restored.best_score, state.best_score);
        assert_eq!(restored.avatar, state.avatar);
        let ids = |s: &GameState| s.obstacles.obstacles().iter().map(|o| o.id).collect::<Vec<_>>();
        assert_eq!(ids(&restored), ids(&state));
        for (a, b) in restored.obstacles.obstacles().iter().zip(state.obstacles.obstacles()) {
            assert_eq!(a.x, b.x);
            assert!((a.gap_start - b.gap_start).abs() < 1e-3);
        }
    }

    #[test]
    fn test_idle_waits_for_flap() {
        let settings = Settings {
            start_idle: true,
            ..Default::default()
        };
        let mut state = GameState::new(1, settings).unwrap();
        for i in 0..30 {
            tick(&mut state, &at(i * 16));
        }
        assert_eq!(state.phase, Phase::Idle);
        assert_eq!(state.avatar.y, 300.0);
        assert_eq!(state.time_ticks, 0);

        let flap = TickInput {
            flap: true,
            now_ms: 480,
            ..Default::default()
        };
        tick(&mut state, &flap);
        assert_eq!(state.phase, Phase::Active);
        // Flap then one tick of gravity
        assert_eq!(state.avatar.velocity, -7.5);
        assert_eq!(state.avatar.y, 292.5);
    }

    #[test]
    fn test_obstacles_spawn_on_interval() {
        let mut state = GameState::new(1, Settings::default()).unwrap();
        state.avatar.y = 250.0;
        // A flap every 31 ticks nets zero vertical travel
        for i in 0..100u64 {
            let input = TickInput {
                flap: i % 31 == 0,
                now_ms: i * 20,
                ..Default::default()
            };
            tick(&mut state, &input);
        }
        // Armed at 0 ms, spawned once past 1500 ms
        assert_eq!(state.obstacles.len(), 1);
        let o = &state.obstacles.obstacles()[0];
        assert!(o.x < state.settings.screen_width);
    }

    #[test]
    fn test_determinism() {
        let settings = Settings {
            cadence: SpawnCadence::Distance { spacing: 150.0 },
            ..Default::default()
        };
        let mut a = GameState::new(99999, settings.clone()).unwrap();
        let mut b = GameState::new(99999, settings).unwrap();

        for i in 0..600u64 {
            let input = TickInput {
                now_ms: i * 16,
                autopilot: true,
                restart: true,
                ..Default::default()
            };
            tick(&mut a, &input);
            tick(&mut b, &input);
        }

        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.score, b.score);
        assert_eq!(a.round, b.round);
        assert_eq!(a.avatar, b.avatar);
        assert_eq!(a.obstacles.obstacles(), b.obstacles.obstacles());
    }

    #[test]
    fn test_autopilot_scores() {
        let mut state = GameState::new(7, Settings::default()).unwrap();
        for i in 0..3000u64 {
            let input = TickInput {
                now_ms: i * 1000 / 60,
                autopilot: true,
                restart: true,
                ..Default::default()
            };
            tick(&mut state, &input);
        }
        assert!(state.best_score.max(state.score) >= 2);
    }

    #[test]
    fn test_additive_policy_through_tick() {
        let settings = Settings {
            impulse: ImpulsePolicy::Additive {
                magnitude: 6.0,
                max_upward_speed: Some(10.0),
            },
            ..Default::default()
        };
        let mut state = GameState::new(1, settings).unwrap();
        let flap = TickInput {
            flap: true,
            ..Default::default()
        };
        tick(&mut state, &flap);
        // 0 - 6 + 0.5
        assert_eq!(state.avatar.velocity, -5.5);
        tick(&mut state, &flap);
        // -5.5 - 6 clamps to -10, then gravity
        assert_eq!(state.avatar.velocity, -9.5);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_best_score_is_max_of_finished_rounds(
            seed in any::<u64>(),
            flaps in proptest::collection::vec(any::<bool>(), 200..800),
        ) {
            let settings = Settings {
                cadence: SpawnCadence::Distance { spacing: 100.0 },
                ..Default::default()
            };
            let mut state = GameState::new(seed, settings).unwrap();
            let mut best_seen = 0u32;
            let mut previous_best = 0u32;

            for (i, flap) in flaps.iter().enumerate() {
                let input = TickInput {
                    flap: *flap,
                    restart: true,
                    now_ms: i as u64 * 16,
                    autopilot: i % 3 != 0,
                };
                let snapshot = tick(&mut state, &input);
                let crashed = snapshot
                    .events
                    .iter()
                    .any(|e| matches!(e, RoundEvent::Crashed { .. }));
                if crashed {
                    best_seen = best_seen.max(snapshot.score);
                }
                prop_assert!(snapshot.best_score >= previous_best);
                prop_assert_eq!(snapshot.best_score, best_seen);
                previous_best = snapshot.best_score;
            }
        }

        #[test]
        fn prop_each_obstacle_scores_at_most_once(
            seed in any::<u64>(),
            ticks in 100usize..600,
        ) {
            let settings = Settings {
                cadence: SpawnCadence::Distance { spacing: 120.0 },
                ..Default::default()
            };
            let mut state = GameState::new(seed, settings).unwrap();
            let mut scored_ids = Vec::new();

            for i in 0..ticks {
                let input = TickInput {
                    now_ms: i as u64 * 16,
                    autopilot: true,
                    ..Default::default()
                };
                let before: Vec<u32> = state
                    .obstacles
                    .obstacles()
                    .iter()
                    .filter(|o| o.scored)
                    .map(|o| o.id)
                    .collect();
                let snapshot = tick(&mut state, &input);
                let points = snapshot
                    .events
                    .iter()
                    .filter(|e| matches!(e, RoundEvent::Scored { .. }))
                    .count();
                let newly: Vec<u32> = snapshot
                    .obstacles
                    .iter()
                    .filter(|o| o.scored && !before.contains(&o.id))
                    .map(|o| o.id)
                    .collect();
                prop_assert_eq!(points, newly.len());
                for id in newly {
                    prop_assert!(!scored_ids.contains(&id));
                    scored_ids.push(id);
                }
            }
            prop_assert_eq!(state.score as usize, scored_ids.len());
        }
    }
}
