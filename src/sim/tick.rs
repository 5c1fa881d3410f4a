//! Frame driver
//!
//! `tick` is called once per rendered frame with the elapsed time. In `Menu`
//! and `GameOver` only the background scrolls; in `Playing` the systems run
//! in a fixed order:
//!
//! 1. spawn timer / enemy spawns, enemy fire
//! 2. player movement (and the fire action)
//! 3. bullet movement
//! 4. collisions
//! 5. enemy movement
//! 6. off-screen culling (escaped enemies count as missed)

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Contact, detect_collisions};
use super::entity::EntityKind;
use super::events::GameEvent;
use super::spawner::{fire_player_bullet, maybe_shoot_enemy, maybe_spawn_enemy};
use super::state::{GameCore, GamePhase};
use crate::clamp_to_playfield_x;
use crate::consts::*;

/// Desired player movement for this frame, whatever the input device
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum MovementIntent {
    /// Stay put
    #[default]
    Idle,
    /// Move at `axis * player_speed` (keyboard: -1 left, +1 right)
    Axis { axis: f32 },
    /// Jump straight to `x` (pointer snap)
    Target { x: f32 },
    /// Travel toward `x` at the player speed (pointer seek)
    Seek { x: f32 },
}

/// Input commands for a single frame.
///
/// `fire`, `start` and `quit` are one-shot pulses: the host sets them for the
/// frame the button went down and clears them afterwards (see
/// `crate::input::EdgeTrigger`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    pub movement: MovementIntent,
    /// Fire one player bullet
    pub fire: bool,
    /// Start a round from the menu, or restart after game over
    pub start: bool,
    /// Abandon the round and return to the menu
    pub quit: bool,
}

/// Sanitize a host frame delta: NaN and negatives become zero, large jumps
/// are clamped.
pub fn clamp_frame_dt(dt: f32, max_dt: f32) -> f32 {
    if dt.is_nan() || dt <= 0.0 {
        return 0.0;
    }
    if dt > max_dt {
        log::warn!("Frame delta {:.3}s clamped to {:.3}s", dt, max_dt);
        return max_dt;
    }
    dt
}

/// Advance the game by one frame
pub fn tick<R: Rng>(core: &mut GameCore<R>, input: &TickInput, dt: f32) {
    let dt = clamp_frame_dt(dt, core.tuning.max_frame_dt);
    core.clock += f64::from(dt);

    // Cosmetic systems run in every phase
    core.background_offset =
        (core.background_offset + core.tuning.background_speed * dt) % PLAYFIELD_HEIGHT;
    if core.flash > 0.0 {
        let fade = if core.tuning.flash_duration > 0.0 {
            dt / core.tuning.flash_duration
        } else {
            1.0
        };
        core.flash = (core.flash - fade).max(0.0);
    }

    // Round control happens on tick boundaries only
    if input.quit {
        core.quit();
    }
    if input.start {
        core.start();
    }

    if core.phase != GamePhase::Playing {
        return;
    }

    // Last life gone: the world keeps moving until the countdown runs out
    if core.round.advance_game_over(dt) {
        core.finish_loss();
        return;
    }

    // 1. Spawner
    maybe_spawn_enemy(&mut core.round, &mut core.store, &core.tuning, &mut core.rng, dt);
    let player_pos = core.player_position();
    maybe_shoot_enemy(&mut core.store, &core.tuning, &mut core.rng, dt, player_pos);

    // 2. Player movement and fire
    move_player(core, input.movement, dt);
    if input.fire && !core.round.is_ending() {
        if let Some(pos) = core.player_position() {
            fire_player_bullet(&mut core.store, pos, &core.tuning);
        }
    }

    // 3. Bullets
    for (_, entity) in core.store.iter_mut() {
        if entity.alive
            && matches!(entity.kind, EntityKind::PlayerBullet | EntityKind::EnemyBullet)
        {
            entity.advance(dt);
        }
    }

    // 4. Collisions
    let vulnerable = !core.round.is_ending();
    let contacts = detect_collisions(&mut core.store, core.player, vulnerable);
    for contact in contacts {
        match contact {
            Contact::EnemyKilled { pos, .. } => {
                let score_delta = core.round.record_kill(&core.tuning);
                log::debug!("Enemy killed at {} (+{})", pos, score_delta);
                core.emit(GameEvent::EnemyKilled { pos, score_delta });
            }
            Contact::PlayerShot { .. } | Contact::PlayerRammed { .. } => core.lose_life(),
        }
    }

    // 5. Enemies
    for (_, entity) in core.store.iter_mut() {
        if entity.alive && entity.kind.is_enemy() {
            entity.advance(dt);
        }
    }

    // 6. Culling
    cull_off_screen(core);
    core.store.sweep_dead();
}

fn move_player<R: Rng>(core: &mut GameCore<R>, intent: MovementIntent, dt: f32) {
    let speed = core.tuning.player_speed;
    let Some(player) = core.player.and_then(|id| core.store.get_mut(id)) else {
        return;
    };
    if !player.alive {
        return;
    }

    let x = player.pos.x;
    let new_x = match intent {
        MovementIntent::Idle => x,
        MovementIntent::Axis { axis } if axis.is_finite() => {
            x + axis.clamp(-1.0, 1.0) * speed * dt
        }
        MovementIntent::Axis { .. } => x,
        MovementIntent::Target { x: target } if target.is_finite() => target,
        MovementIntent::Target { .. } => x,
        MovementIntent::Seek { x: target } if target.is_finite() => {
            let max_step = speed * dt;
            x + (clamp_to_playfield_x(target) - x).clamp(-max_step, max_step)
        }
        MovementIntent::Seek { .. } => x,
    };
    player.pos.x = clamp_to_playfield_x(new_x);
}

/// Remove projectiles and enemies that left the playfield
fn cull_off_screen<R: Rng>(core: &mut GameCore<R>) {
    let mut missed: Vec<Vec2> = Vec::new();
    for (_, entity) in core.store.iter_mut() {
        if !entity.alive {
            continue;
        }
        let gone = match entity.kind {
            EntityKind::PlayerBullet => entity.pos.y < PLAYER_BULLET_CULL_Y,
            EntityKind::EnemyBullet => {
                entity.pos.y > BOTTOM_CULL_Y
                    || entity.pos.y < PLAYER_BULLET_CULL_Y
                    || entity.pos.x < -BULLET_SIZE.0
                    || entity.pos.x > PLAYFIELD_WIDTH + BULLET_SIZE.0
            }
            EntityKind::Enemy { .. } => {
                let escaped = entity.pos.y > BOTTOM_CULL_Y;
                if escaped {
                    missed.push(entity.pos);
                }
                escaped
            }
            EntityKind::Player => false,
        };
        if gone {
            entity.alive = false;
        }
    }

    for pos in missed {
        core.round.record_miss();
        log::debug!("Enemy escaped at x={:.0}", pos.x);
        core.emit(GameEvent::EnemyMissed { pos });
    }
}
