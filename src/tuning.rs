//! Data-driven game balance
//!
//! Defaults reproduce the shipped browser game. A tuning document is plain
//! JSON with camelCase keys; missing keys fall back to the defaults.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Gameplay balance values consumed by the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Tuning {
    // === Speeds (pixels per second) ===
    /// Digital movement speed, also the pointer-seek speed
    pub player_speed: f32,
    /// Player bullet speed (travels up)
    pub bullet_speed: f32,
    /// Enemy descent speed
    pub enemy_speed: f32,
    /// Enemy bullet speed
    pub enemy_bullet_speed: f32,
    /// Cosmetic background scroll speed
    pub background_speed: f32,

    // === Spawning ===
    /// Enemies per second; the spawn interval is `1 / enemy_spawn_rate`.
    /// Zero disables spawning.
    pub enemy_spawn_rate: f32,
    /// Chance per second that some enemy fires, scaled by the frame delta
    pub enemy_fire_rate: f32,
    /// Probability that a spawned enemy uses the rare variant
    pub rare_variant_chance: f64,
    /// Aim enemy bullets at the player instead of firing straight down
    pub aim_enemy_bullets: bool,

    // === Round rules ===
    pub score_per_kill: u64,
    pub starting_lives: u8,
    /// Seconds between losing the last life and entering GameOver
    pub game_over_delay: f32,
    /// Seconds the hit flash stays visible
    pub flash_duration: f32,

    // === Frame driver ===
    /// Upper bound for a single frame delta (avoids jumps on tab resume)
    pub max_frame_dt: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_speed: 300.0,
            bullet_speed: 600.0,
            enemy_speed: 120.0,
            enemy_bullet_speed: 420.0,
            background_speed: 60.0,

            enemy_spawn_rate: 0.5,
            // 0.008 per frame at 60 fps
            enemy_fire_rate: 0.48,
            rare_variant_chance: 0.3,
            aim_enemy_bullets: false,

            score_per_kill: 10,
            starting_lives: 3,
            game_over_delay: 0.5,
            flash_duration: 0.8,

            max_frame_dt: 0.1,
        }
    }
}

impl Tuning {
    /// Maximum lives a round may start with
    pub const MAX_LIVES: u8 = 9;

    /// Parse and validate a tuning document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!(
            "Loaded tuning: spawn rate {}/s, enemy speed {}px/s, lives {}",
            tuning.enemy_spawn_rate,
            tuning.enemy_speed,
            tuning.starting_lives
        );
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Seconds between spawn decisions, `None` when spawning is disabled
    pub fn spawn_interval(&self) -> Option<f32> {
        (self.enemy_spawn_rate.is_finite() && self.enemy_spawn_rate > 0.0)
            .then(|| 1.0 / self.enemy_spawn_rate)
    }

    /// Check every field is usable by the simulation
    pub fn validate(&self) -> Result<(), ConfigError> {
        let speeds = [
            ("playerSpeed", self.player_speed),
            ("bulletSpeed", self.bullet_speed),
            ("enemySpeed", self.enemy_speed),
            ("enemyBulletSpeed", self.enemy_bullet_speed),
            ("backgroundSpeed", self.background_speed),
            ("enemySpawnRate", self.enemy_spawn_rate),
            ("enemyFireRate", self.enemy_fire_rate),
            ("gameOverDelay", self.game_over_delay),
            ("flashDuration", self.flash_duration),
        ];
        for (field, value) in speeds {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(
                    field,
                    format!("must be a finite, non-negative number (got {value})"),
                ));
            }
        }

        if !(0.0..=1.0).contains(&self.rare_variant_chance) {
            return Err(ConfigError::invalid(
                "rareVariantChance",
                format!("must be within 0..=1 (got {})", self.rare_variant_chance),
            ));
        }
        if self.starting_lives == 0 || self.starting_lives > Self::MAX_LIVES {
            return Err(ConfigError::invalid(
                "startingLives",
                format!(
                    "must be within 1..={} (got {})",
                    Self::MAX_LIVES,
                    self.starting_lives
                ),
            ));
        }
        if !self.max_frame_dt.is_finite() || self.max_frame_dt <= 0.0 {
            return Err(ConfigError::invalid(
                "maxFrameDt",
                format!("must be positive (got {})", self.max_frame_dt),
            ));
        }
        Ok(())
    }

    /// Balance with no background activity: no spawns, no enemy fire.
    /// Useful for scripted scenarios where the host places every entity.
    pub fn scripted() -> Self {
        Self {
            enemy_spawn_rate: 0.0,
            enemy_fire_rate: 0.0,
            ..Self::default()
        }
    }
}
