//! Collision detection
//!
//! Everything is an axis-aligned box centred on the entity position. Boxes
//! that merely touch count as overlapping.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId, EntityKind, EntityStore};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Box of `size` (width, height) centred on `center`
    pub fn centered(center: Vec2, size: (f32, f32)) -> Self {
        let half = Vec2::new(size.0, size.1) * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Inclusive overlap test on both axes
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }
}

/// Hitbox of an entity
#[inline]
pub fn hitbox(entity: &Entity) -> Aabb {
    Aabb::centered(entity.pos, entity.kind.size())
}

/// One collision found this tick
#[derive(Debug, Clone, PartialEq)]
pub enum Contact {
    /// A player bullet destroyed an enemy
    EnemyKilled {
        bullet: EntityId,
        enemy: EntityId,
        /// Enemy position at the moment of the hit
        pos: Vec2,
    },
    /// An enemy bullet struck the player
    PlayerShot { bullet: EntityId, pos: Vec2 },
    /// An enemy flew into the player
    PlayerRammed { enemy: EntityId, pos: Vec2 },
}

impl Contact {
    pub fn damages_player(&self) -> bool {
        !matches!(self, Contact::EnemyKilled { .. })
    }
}

/// Run every collision check, marking consumed entities dead.
///
/// Checks run in a fixed order: player bullets against enemies, enemy bullets
/// against the player, then enemies against the player. Each bullet kills at
/// most one enemy (the first live one in store order). A bullet hit and a
/// body hit on the player in the same tick are two separate contacts.
///
/// `player_vulnerable == false` still consumes whatever touches the player but
/// reports nothing for it.
pub fn detect_collisions(
    store: &mut EntityStore,
    player: Option<EntityId>,
    player_vulnerable: bool,
) -> Vec<Contact> {
    let mut contacts = Vec::new();

    let bullets = store.alive_ids(|k| *k == EntityKind::PlayerBullet);
    let enemies = store.alive_ids(EntityKind::is_enemy);

    for bullet_id in bullets {
        let Some(bullet_box) = store.get(bullet_id).map(hitbox) else {
            continue;
        };
        for &enemy_id in &enemies {
            let Some(enemy) = store.get(enemy_id).filter(|e| e.alive) else {
                continue;
            };
            if bullet_box.overlaps(&hitbox(enemy)) {
                let pos = enemy.pos;
                store.kill(bullet_id);
                store.kill(enemy_id);
                log::trace!("bullet {:?} hit enemy {:?} at {}", bullet_id, enemy_id, pos);
                contacts.push(Contact::EnemyKilled {
                    bullet: bullet_id,
                    enemy: enemy_id,
                    pos,
                });
                break;
            }
        }
    }

    let Some(player_box) = player
        .and_then(|id| store.get(id))
        .filter(|p| p.alive)
        .map(hitbox)
    else {
        return contacts;
    };

    for bullet_id in store.alive_ids(|k| *k == EntityKind::EnemyBullet) {
        let Some(bullet) = store.get(bullet_id) else {
            continue;
        };
        if hitbox(bullet).overlaps(&player_box) {
            let pos = bullet.pos;
            store.kill(bullet_id);
            if player_vulnerable {
                contacts.push(Contact::PlayerShot {
                    bullet: bullet_id,
                    pos,
                });
            }
        }
    }

    for enemy_id in store.alive_ids(EntityKind::is_enemy) {
        let Some(enemy) = store.get(enemy_id) else {
            continue;
        };
        if hitbox(enemy).overlaps(&player_box) {
            let pos = enemy.pos;
            store.kill(enemy_id);
            if player_vulnerable {
                contacts.push(Contact::PlayerRammed { enemy: enemy_id, pos });
            }
        }
    }

    contacts
}
