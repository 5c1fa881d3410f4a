//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded, injectable RNG only
//! - Stable iteration order (by store slot)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod entity;
pub mod events;
pub mod round;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{Aabb, Contact, detect_collisions, hitbox};
pub use entity::{EnemyVariant, Entity, EntityId, EntityKind, EntityStore};
pub use events::{EventContext, EventKind, EventSink, GameEvent, LogSink};
pub use round::{GameSummary, Outcome, RoundState};
pub use spawner::{fire_player_bullet, maybe_shoot_enemy, maybe_spawn_enemy, spawn_enemy_at};
pub use state::{GameCore, GamePhase, Snapshot};
pub use tick::{MovementIntent, TickInput, clamp_frame_dt, tick};
