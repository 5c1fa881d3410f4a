//! Score and lives bookkeeping for one round

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// How a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Loss,
    Quit,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Loss => "loss",
            Outcome::Quit => "quit",
        }
    }
}

/// Final statistics of a round, carried by the `game-end` event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSummary {
    pub score: u64,
    pub enemies_killed: u32,
    pub enemies_missed: u32,
    pub lives: u8,
    pub outcome: Outcome,
    /// Simulated seconds between round start and end
    pub duration_secs: f64,
}

/// Authoritative per-round counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundState {
    pub score: u64,
    pub lives: u8,
    pub enemies_killed: u32,
    pub enemies_missed: u32,
    /// Seconds since the last spawn decision
    pub spawn_timer: f32,
    /// Simulated clock value when the round started
    pub started_at: Option<f64>,
    /// Countdown to GameOver once the last life is gone
    pub game_over_timer: Option<f32>,
}

impl RoundState {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            score: 0,
            lives: tuning.starting_lives,
            enemies_killed: 0,
            enemies_missed: 0,
            spawn_timer: 0.0,
            started_at: None,
            game_over_timer: None,
        }
    }

    /// Back to initial values for a fresh round starting at `now`
    pub fn reset(&mut self, tuning: &Tuning, now: f64) {
        *self = Self::new(tuning);
        self.started_at = Some(now);
    }

    /// Credit a kill; returns the score delta
    pub fn record_kill(&mut self, tuning: &Tuning) -> u64 {
        self.score = self.score.saturating_add(tuning.score_per_kill);
        self.enemies_killed = self.enemies_killed.saturating_add(1);
        tuning.score_per_kill
    }

    pub fn record_miss(&mut self) {
        self.enemies_missed = self.enemies_missed.saturating_add(1);
    }

    /// Take one life away; returns the remaining count. Never goes below zero.
    pub fn lose_life(&mut self) -> u8 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }

    pub fn is_out_of_lives(&self) -> bool {
        self.lives == 0
    }

    /// Whether the last life is gone and the round is counting down to GameOver
    pub fn is_ending(&self) -> bool {
        self.game_over_timer.is_some()
    }

    /// Start the GameOver countdown (once)
    pub fn begin_game_over(&mut self, delay: f32) {
        if self.game_over_timer.is_none() {
            self.game_over_timer = Some(delay);
        }
    }

    /// Advance the GameOver countdown; true once it has run out
    pub fn advance_game_over(&mut self, dt: f32) -> bool {
        match self.game_over_timer.as_mut() {
            Some(remaining) => {
                *remaining -= dt;
                *remaining <= 0.0
            }
            None => false,
        }
    }

    pub fn summary(&self, outcome: Outcome, now: f64) -> GameSummary {
        GameSummary {
            score: self.score,
            enemies_killed: self.enemies_killed,
            enemies_missed: self.enemies_missed,
            lives: self.lives,
            outcome,
            duration_secs: self.started_at.map(|t| (now - t).max(0.0)).unwrap_or(0.0),
        }
    }
}
