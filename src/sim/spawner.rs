//! Enemy spawning and firing
//!
//! All randomness comes from the caller's RNG so a seeded run replays exactly.

use glam::Vec2;
use rand::Rng;

use super::entity::{EnemyVariant, Entity, EntityId, EntityKind, EntityStore};
use super::round::RoundState;
use crate::consts::*;
use crate::playfield_x_range;
use crate::tuning::Tuning;

/// Advance the spawn timer and create an enemy once the interval elapses.
///
/// The timer resets to zero whenever the interval is reached. With spawning
/// disabled (`enemy_spawn_rate == 0`) the timer stays at zero.
pub fn maybe_spawn_enemy<R: Rng + ?Sized>(
    round: &mut RoundState,
    store: &mut EntityStore,
    tuning: &Tuning,
    rng: &mut R,
    dt: f32,
) -> Option<EntityId> {
    let Some(interval) = tuning.spawn_interval() else {
        round.spawn_timer = 0.0;
        return None;
    };

    round.spawn_timer += dt;
    if round.spawn_timer < interval {
        return None;
    }
    round.spawn_timer = 0.0;

    let (min_x, max_x) = playfield_x_range();
    let x = rng.random_range(min_x..=max_x);
    // Out-of-range or NaN chances saturate instead of panicking
    let variant = if rng.random::<f64>() < tuning.rare_variant_chance {
        EnemyVariant::Rare
    } else {
        EnemyVariant::Common
    };
    let id = spawn_enemy_at(store, x, variant, tuning);
    log::debug!("Spawned {:?} enemy at x={:.0}", variant, x);
    Some(id)
}

/// Place an enemy just above the visible top edge
pub fn spawn_enemy_at(
    store: &mut EntityStore,
    x: f32,
    variant: EnemyVariant,
    tuning: &Tuning,
) -> EntityId {
    store.insert(Entity::enemy(
        Vec2::new(x, ENEMY_SPAWN_Y),
        variant,
        tuning.enemy_speed,
    ))
}

/// Maybe have one random live enemy fire this tick.
///
/// The chance is `enemy_fire_rate * dt`, so the expected number of shots per
/// second does not depend on the frame rate. No-op without live enemies.
pub fn maybe_shoot_enemy<R: Rng + ?Sized>(
    store: &mut EntityStore,
    tuning: &Tuning,
    rng: &mut R,
    dt: f32,
    player_pos: Option<Vec2>,
) -> Option<EntityId> {
    let shooters = store.alive_ids(EntityKind::is_enemy);
    if shooters.is_empty() {
        return None;
    }

    let chance = f64::from(tuning.enemy_fire_rate * dt);
    let fires = chance > 0.0 && rng.random::<f64>() < chance;
    if !fires {
        return None;
    }

    let shooter = shooters[rng.random_range(0..shooters.len())];
    let origin = store.get(shooter)?.pos + Vec2::new(0.0, ENEMY_BULLET_OFFSET_Y);
    let direction = match player_pos {
        Some(target) if tuning.aim_enemy_bullets => target - origin,
        _ => Vec2::Y,
    };
    let id = store.insert(Entity::enemy_bullet(
        origin,
        direction,
        tuning.enemy_bullet_speed,
    ));
    log::trace!("Enemy {:?} fired from {}", shooter, origin);
    Some(id)
}

/// Fire a player bullet from the ship's nose
pub fn fire_player_bullet(store: &mut EntityStore, player_pos: Vec2, tuning: &Tuning) -> EntityId {
    store.insert(Entity::player_bullet(
        player_pos + Vec2::new(0.0, PLAYER_BULLET_OFFSET_Y),
        tuning.bullet_speed,
    ))
}
