//! High score leaderboard
//!
//! Tracks the best finished rounds for the lifetime of the process, along
//! with what ended each one. Nothing is written to disk.

use serde::{Deserialize, Serialize};

use crate::sim::CrashCause;

/// Maximum number of rounds kept on the board
pub const MAX_HIGH_SCORES: usize = 10;

/// A finished round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Obstacles passed
    pub score: u32,
    /// Round number within the session (1-based)
    pub round: u32,
    /// Active ticks survived
    pub ticks: u64,
    pub cause: CrashCause,
}

/// Finished rounds, best first. Equal scores keep the earlier round ahead.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[HighScoreEntry] {
        &self.entries
    }

    /// Place a finished round on the board.
    ///
    /// Returns the 1-based placing, or `None` for a scoreless round or one
    /// that falls below a full board.
    pub fn record(&mut self, entry: HighScoreEntry) -> Option<usize> {
        if entry.score == 0 {
            return None;
        }

        let slot = self.entries.partition_point(|e| e.score >= entry.score);
        if slot >= MAX_HIGH_SCORES {
            return None;
        }

        self.entries.insert(slot, entry);
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(slot + 1)
    }
}
