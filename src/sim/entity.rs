//! Entity store
//!
//! Every game object lives in one arena: a dense slot vector plus a free list.
//! Ids carry a generation so a handle to a removed entity never resolves to
//! whatever reused its slot. Iteration is always in slot order, which makes
//! "first match wins" rules deterministic.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Cosmetic enemy type, picked at spawn time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnemyVariant {
    #[default]
    Common,
    Rare,
}

/// What an entity is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum EntityKind {
    Player,
    Enemy { variant: EnemyVariant },
    PlayerBullet,
    EnemyBullet,
}

impl EntityKind {
    /// Hitbox (width, height) centred on the entity position
    pub fn size(&self) -> (f32, f32) {
        match self {
            EntityKind::Player => PLAYER_SIZE,
            EntityKind::Enemy { .. } => ENEMY_SIZE,
            EntityKind::PlayerBullet | EntityKind::EnemyBullet => BULLET_SIZE,
        }
    }

    pub fn is_enemy(&self) -> bool {
        matches!(self, EntityKind::Enemy { .. })
    }
}

/// A game object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub kind: EntityKind,
    pub pos: Vec2,
    /// Travel velocity in px/s (zero for the player, who moves by intent)
    pub vel: Vec2,
    /// Cleared when the entity is consumed; dead entities are swept at the end
    /// of the tick and skipped by every system until then
    pub alive: bool,
}

impl Entity {
    pub fn player(pos: Vec2) -> Self {
        Self {
            kind: EntityKind::Player,
            pos,
            vel: Vec2::ZERO,
            alive: true,
        }
    }

    pub fn enemy(pos: Vec2, variant: EnemyVariant, speed: f32) -> Self {
        Self {
            kind: EntityKind::Enemy { variant },
            pos,
            vel: Vec2::new(0.0, speed),
            alive: true,
        }
    }

    pub fn player_bullet(pos: Vec2, speed: f32) -> Self {
        Self {
            kind: EntityKind::PlayerBullet,
            pos,
            vel: Vec2::new(0.0, -speed),
            alive: true,
        }
    }

    /// Enemy bullet travelling along `direction` (normalized here)
    pub fn enemy_bullet(pos: Vec2, direction: Vec2, speed: f32) -> Self {
        let dir = direction.try_normalize().unwrap_or(Vec2::Y);
        Self {
            kind: EntityKind::EnemyBullet,
            pos,
            vel: dir * speed,
            alive: true,
        }
    }

    /// Advance along the velocity
    pub fn advance(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }
}

/// Generational handle into the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId {
    pub index: u32,
    pub generation: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Slot {
    generation: u32,
    entity: Option<Entity>,
}

/// Arena owning every entity of the current round
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityStore {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Store an entity, reusing a free slot when one exists
    pub fn insert(&mut self, entity: Entity) -> EntityId {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.entity = Some(entity);
            return EntityId {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            entity: Some(entity),
        });
        EntityId {
            index,
            generation: 0,
        }
    }

    /// Remove an entity. A stale or unknown id is a no-op returning `None`.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let entity = slot.entity.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        Some(entity)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.entity.as_ref()
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.entity.as_mut()
    }

    /// Whether `id` resolves to an entity that has not been consumed
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.get(id).is_some_and(|e| e.alive)
    }

    /// Mark an entity consumed. Returns false if it was already dead or gone.
    pub fn kill(&mut self, id: EntityId) -> bool {
        match self.get_mut(id) {
            Some(entity) if entity.alive => {
                entity.alive = false;
                true
            }
            _ => false,
        }
    }

    /// All stored entities in slot order, dead ones included
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.entity.as_ref().map(|entity| {
                (
                    EntityId {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    entity,
                )
            })
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut Entity)> {
        self.slots.iter_mut().enumerate().filter_map(|(index, slot)| {
            let generation = slot.generation;
            slot.entity.as_mut().map(|entity| {
                (
                    EntityId {
                        index: index as u32,
                        generation,
                    },
                    entity,
                )
            })
        })
    }

    /// Ids of live entities matching `pred`, in slot order
    pub fn alive_ids(&self, pred: impl Fn(&EntityKind) -> bool) -> Vec<EntityId> {
        self.iter()
            .filter(|(_, e)| e.alive && pred(&e.kind))
            .map(|(id, _)| id)
            .collect()
    }

    pub fn count_alive(&self, pred: impl Fn(&EntityKind) -> bool) -> usize {
        self.iter().filter(|(_, e)| e.alive && pred(&e.kind)).count()
    }

    /// Remove every entity flagged dead; returns how many were dropped
    pub fn sweep_dead(&mut self) -> usize {
        let dead: Vec<EntityId> = self
            .iter()
            .filter(|(_, e)| !e.alive)
            .map(|(id, _)| id)
            .collect();
        for id in &dead {
            self.remove(*id);
        }
        dead.len()
    }

    /// Remove every entity matching `pred`
    pub fn clear_where(&mut self, pred: impl Fn(&EntityKind) -> bool) -> usize {
        let ids: Vec<EntityId> = self
            .iter()
            .filter(|(_, e)| pred(&e.kind))
            .map(|(id, _)| id)
            .collect();
        for id in &ids {
            self.remove(*id);
        }
        ids.len()
    }

    /// Drop everything. Generations survive so old ids stay stale.
    pub fn clear(&mut self) {
        self.clear_where(|_| true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_get_remove() {
        let mut store = EntityStore::new();
        let id = store.insert(Entity::player(Vec2::new(10.0, 20.0)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(id).map(|e| e.kind), Some(EntityKind::Player));

        let removed = store.remove(id).unwrap();
        assert_eq!(removed.pos, Vec2::new(10.0, 20.0));
        assert!(store.is_empty());
        assert!(store.get(id).is_none());
    }

    #[test]
    fn test_stale_id_after_reuse() {
        let mut store = EntityStore::new();
        let old = store.insert(Entity::player_bullet(Vec2::ZERO, 600.0));
        store.remove(old);

        let new = store.insert(Entity::enemy(Vec2::ZERO, EnemyVariant::Common, 120.0));
        assert_eq!(new.index, old.index);
        assert_ne!(new.generation, old.generation);

        // Stale handles never touch the new occupant
        assert!(store.get(old).is_none());
        assert!(!store.kill(old));
        assert!(store.remove(old).is_none());
        assert!(store.is_alive(new));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_kill_and_sweep() {
        let mut store = EntityStore::new();
        let a = store.insert(Entity::enemy(Vec2::ZERO, EnemyVariant::Common, 120.0));
        let b = store.insert(Entity::enemy(Vec2::X, EnemyVariant::Rare, 120.0));

        assert!(store.kill(a));
        assert!(!store.kill(a), "second kill is a no-op");
        assert_eq!(store.count_alive(EntityKind::is_enemy), 1);
        assert_eq!(store.alive_ids(EntityKind::is_enemy), vec![b]);

        assert_eq!(store.sweep_dead(), 1);
        assert_eq!(store.len(), 1);
        assert!(store.get(a).is_none());
    }

    #[test]
    fn test_iteration_is_slot_ordered() {
        let mut store = EntityStore::new();
        let ids: Vec<_> = (0..4)
            .map(|i| store.insert(Entity::player_bullet(Vec2::new(i as f32, 0.0), 600.0)))
            .collect();
        store.remove(ids[1]);
        let reused = store.insert(Entity::player_bullet(Vec2::new(9.0, 0.0), 600.0));
        assert_eq!(reused.index, 1);

        let xs: Vec<f32> = store.iter().map(|(_, e)| e.pos.x).collect();
        assert_eq!(xs, vec![0.0, 9.0, 2.0, 3.0]);
    }

    #[test]
    fn test_clear_where() {
        let mut store = EntityStore::new();
        let player = store.insert(Entity::player(Vec2::ZERO));
        store.insert(Entity::player_bullet(Vec2::ZERO, 600.0));
        store.insert(Entity::enemy_bullet(Vec2::ZERO, Vec2::Y, 420.0));

        let removed = store.clear_where(|k| *k != EntityKind::Player);
        assert_eq!(removed, 2);
        assert!(store.is_alive(player));

        store.clear();
        assert!(store.is_empty());
        assert!(store.get(player).is_none());
    }

    #[test]
    fn test_enemy_bullet_direction_normalized() {
        let bullet = Entity::enemy_bullet(Vec2::ZERO, Vec2::new(3.0, 4.0), 10.0);
        assert!((bullet.vel - Vec2::new(6.0, 8.0)).length() < 1e-4);

        let fallback = Entity::enemy_bullet(Vec2::ZERO, Vec2::ZERO, 10.0);
        assert_eq!(fallback.vel, Vec2::new(0.0, 10.0));
    }
}
