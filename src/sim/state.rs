//! Round state and the controller's state transitions
//!
//! `GameState` owns exactly one avatar and one obstacle stream. It is the only
//! thing that mutates `score` and `phase`; `best_score` only moves when a
//! round ends.

use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::avatar::Avatar;
use super::collision::CrashCause;
use super::obstacle::{Obstacle, ObstacleStream};
use crate::cosmetics::Cosmetics;
use crate::highscores::{HighScoreEntry, HighScores};
use crate::settings::{Settings, SettingsError};

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for the first flap (only with `start_idle`)
    Idle,
    /// Physics running
    Active,
    /// Round ended; waiting for restart
    Over,
}

/// Something that happened during the last tick (for sound/UI hooks)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundEvent {
    Started,
    Flapped,
    Scored { score: u32 },
    Crashed { cause: CrashCause },
    Restarted,
}

/// RNG stream ids
const GAMEPLAY_STREAM: u64 = 0;
const COSMETIC_STREAM: u64 = 1;

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    pub settings: Settings,
    pub phase: Phase,
    pub avatar: Avatar,
    pub obstacles: ObstacleStream,
    /// Obstacles passed this round
    pub score: u32,
    /// Best score of any finished round this session
    pub best_score: u32,
    /// 1-based round counter
    pub round: u32,
    /// Active ticks this round
    pub time_ticks: u64,
    pub cosmetics: Cosmetics,
    /// Events since the last snapshot hand-off (direct triggers included)
    pub events: Vec<RoundEvent>,
    /// `events` already went out with a snapshot; the next push starts a new batch
    events_delivered: bool,
    pub high_scores: HighScores,
    /// Gap geometry and obstacle colors
    pub(crate) rng: Pcg32,
    /// Cosmetic re-rolls only
    cosmetic_rng: Pcg32,
}

impl GameState {
    /// Create a new session with the given seed; settings are validated here
    pub fn new(seed: u64, settings: Settings) -> Result<Self, SettingsError> {
        if let Err(err) = settings.validate() {
            log::warn!("Rejected settings: {err}");
            return Err(err);
        }

        let phase = if settings.start_idle {
            Phase::Idle
        } else {
            Phase::Active
        };

        log::info!(
            "New session: seed={} preset={} phase={:?}",
            seed,
            settings.preset.as_str(),
            phase
        );

        Ok(Self {
            seed,
            avatar: Avatar::spawn(&settings),
            settings,
            phase,
            obstacles: ObstacleStream::new(),
            score: 0,
            best_score: 0,
            round: 1,
            time_ticks: 0,
            // Fixed look for the opening round; restarts re-roll
            cosmetics: Cosmetics::default(),
            events: Vec::new(),
            events_delivered: false,
            high_scores: HighScores::new(),
            rng: Pcg32::new(seed, GAMEPLAY_STREAM),
            cosmetic_rng: Pcg32::new(seed, COSMETIC_STREAM),
        })
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    /// Flap. Starts the round when idle; ignored once the round is over.
    pub fn on_trigger_impulse(&mut self) {
        match self.phase {
            Phase::Over => return,
            Phase::Idle => {
                self.phase = Phase::Active;
                self.push_event(RoundEvent::Started);
                log::info!("Round {} started", self.round);
            }
            Phase::Active => {}
        }
        self.avatar.impulse(self.settings.impulse);
        self.push_event(RoundEvent::Flapped);
    }

    /// Start a new round. Ignored unless the round is over.
    pub fn on_trigger_restart(&mut self) {
        if self.phase != Phase::Over {
            return;
        }

        self.avatar = Avatar::spawn(&self.settings);
        self.obstacles.clear();
        self.score = 0;
        self.time_ticks = 0;
        self.round += 1;
        self.cosmetics = Cosmetics::roll(&mut self.cosmetic_rng);
        self.phase = if self.settings.start_idle {
            Phase::Idle
        } else {
            Phase::Active
        };
        self.push_event(RoundEvent::Restarted);
        log::info!("Round {} ready ({:?})", self.round, self.phase);
    }

    /// Active -> Over
    pub(crate) fn end_round(&mut self, cause: CrashCause) {
        debug_assert_eq!(self.phase, Phase::Active);
        self.phase = Phase::Over;
        self.best_score = self.best_score.max(self.score);
        let entry = HighScoreEntry {
            score: self.score,
            round: self.round,
            ticks: self.time_ticks,
            cause,
        };
        if let Some(place) = self.high_scores.record(entry) {
            log::debug!("Round {} placed #{} on the leaderboard", self.round, place);
        }
        self.push_event(RoundEvent::Crashed { cause });
        log::info!(
            "Round {} over: {:?} after {} ticks, score {} (best {})",
            self.round,
            cause,
            self.time_ticks,
            self.score,
            self.best_score
        );
    }

    /// Drop events a previous snapshot already carried
    pub(crate) fn begin_batch(&mut self) {
        if self.events_delivered {
            self.events.clear();
            self.events_delivered = false;
        }
    }

    pub(crate) fn push_event(&mut self, event: RoundEvent) {
        self.begin_batch();
        self.events.push(event);
    }

    /// Snapshot returned from `tick`; its events are not repeated next frame
    pub(crate) fn hand_off(&mut self) -> Snapshot<'_> {
        self.events_delivered = true;
        self.snapshot()
    }

    /// Read-only view for the presentation layer
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.phase,
            score: self.score,
            best_score: self.best_score,
            round: self.round,
            avatar: &self.avatar,
            obstacles: self.obstacles.obstacles(),
            cosmetics: &self.cosmetics,
            events: &self.events,
        }
    }
}

/// What the renderer needs after a tick
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Snapshot<'a> {
    pub phase: Phase,
    pub score: u32,
    pub best_score: u32,
    pub round: u32,
    pub avatar: &'a Avatar,
    pub obstacles: &'a [Obstacle],
    pub cosmetics: &'a Cosmetics,
    pub events: &'a [RoundEvent],
}
