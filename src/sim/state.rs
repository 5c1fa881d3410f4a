//! Game core and round state machine
//!
//! `GameCore` owns everything the simulation mutates: the entity store, the
//! round counters, the RNG and the event outbox. Collaborators get read-only
//! accessors and drained events, nothing else.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId, EntityKind, EntityStore};
use super::events::{EventContext, EventSink, GameEvent};
use super::round::{GameSummary, Outcome, RoundState};
use crate::consts::*;
use crate::error::InvariantViolation;
use crate::tuning::Tuning;

/// Current phase of the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GamePhase {
    /// Title screen, nothing simulated
    #[default]
    Menu,
    /// Active round
    Playing,
    /// Round lost, waiting for restart or quit
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Menu => "menu",
            GamePhase::Playing => "playing",
            GamePhase::GameOver => "gameover",
        }
    }
}

/// Read-only view polled by renderers and analytics samplers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u8,
    pub enemies_killed: u32,
    pub enemies_missed: u32,
    /// Rounds started so far; 0 until the first start
    pub round: u32,
    pub player_pos: Option<Vec2>,
    /// Simulated seconds since the core was created
    pub clock: f64,
}

/// The whole simulation, generic over its random source
#[derive(Debug, Clone)]
pub struct GameCore<R = Pcg32> {
    pub(crate) tuning: Tuning,
    pub(crate) rng: R,
    pub(crate) phase: GamePhase,
    pub(crate) round: RoundState,
    pub(crate) store: EntityStore,
    pub(crate) player: Option<EntityId>,
    /// Simulated seconds, summed from clamped frame deltas
    pub(crate) clock: f64,
    /// Cosmetic background scroll (pixels), runs in every phase
    pub(crate) background_offset: f32,
    /// Hit flash intensity 0..1 for the renderer
    pub(crate) flash: f32,
    /// Start signals are ignored until the host is ready
    pub(crate) host_ready: bool,
    /// Number of the current (or last) round, 0 before the first start
    pub(crate) round_number: u32,
    pub(crate) events: Vec<GameEvent>,
    /// Counters at emission time, parallel to `events`
    pub(crate) contexts: Vec<EventContext>,
}

impl GameCore<Pcg32> {
    /// Create a core with a seeded PCG random source
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        Self::with_rng(tuning, Pcg32::seed_from_u64(seed))
    }
}

impl<R: Rng> GameCore<R> {
    /// Create a core driven by any random source
    pub fn with_rng(tuning: Tuning, rng: R) -> Self {
        if let Err(e) = tuning.validate() {
            log::warn!("Running with unchecked tuning: {}", e);
        }
        let round = RoundState::new(&tuning);
        Self {
            tuning,
            rng,
            phase: GamePhase::Menu,
            round,
            store: EntityStore::new(),
            player: None,
            clock: 0.0,
            background_offset: 0.0,
            flash: 0.0,
            host_ready: true,
            round_number: 0,
            events: Vec::new(),
            contexts: Vec::new(),
        }
    }

    // === Read-only accessors ===

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u64 {
        self.round.score
    }

    pub fn lives(&self) -> u8 {
        self.round.lives
    }

    pub fn enemies_killed(&self) -> u32 {
        self.round.enemies_killed
    }

    pub fn enemies_missed(&self) -> u32 {
        self.round.enemies_missed
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn entities(&self) -> &EntityStore {
        &self.store
    }

    pub fn player_id(&self) -> Option<EntityId> {
        self.player
    }

    pub fn player_position(&self) -> Option<Vec2> {
        self.player
            .and_then(|id| self.store.get(id))
            .filter(|p| p.alive)
            .map(|p| p.pos)
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn background_offset(&self) -> f32 {
        self.background_offset
    }

    pub fn flash(&self) -> f32 {
        self.flash
    }

    pub fn is_host_ready(&self) -> bool {
        self.host_ready
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            score: self.round.score,
            lives: self.round.lives,
            enemies_killed: self.round.enemies_killed,
            enemies_missed: self.round.enemies_missed,
            round: self.round_number,
            player_pos: self.player_position(),
            clock: self.clock,
        }
    }

    // === Host hooks ===

    /// Report whether the renderer surface and input bindings are ready
    pub fn set_host_ready(&mut self, ready: bool) {
        self.host_ready = ready;
    }

    /// Place an entity directly (scripted scenarios, host-driven spawns).
    /// Ignored outside a round.
    pub fn insert_entity(&mut self, entity: Entity) -> Option<EntityId> {
        if self.phase != GamePhase::Playing || entity.kind == EntityKind::Player {
            return None;
        }
        Some(self.store.insert(entity))
    }

    // === Events ===

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.contexts.push(EventContext {
            round: self.round_number,
            clock: self.clock,
            score: self.round.score,
            lives: self.round.lives,
        });
        self.events.push(event);
    }

    /// Events raised since the last drain, oldest first
    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.contexts.clear();
        std::mem::take(&mut self.events)
    }

    /// Like `drain_events`, each event paired with the counters it was
    /// raised under
    pub fn drain_events_with_context(&mut self) -> Vec<(EventContext, GameEvent)> {
        let contexts = std::mem::take(&mut self.contexts);
        let events = std::mem::take(&mut self.events);
        contexts.into_iter().zip(events).collect()
    }

    /// Hand every pending event to `sink`, once
    pub fn flush_events(&mut self, sink: &mut impl EventSink) {
        for (context, event) in self.drain_events_with_context() {
            sink.on_event_in(&context, &event);
        }
    }

    // === State machine ===

    /// Start (or restart) a round. No-op while already playing or while the
    /// host is not ready. Returns whether a round started.
    pub fn start(&mut self) -> bool {
        if self.phase == GamePhase::Playing {
            return false;
        }
        if !self.host_ready {
            log::warn!("Start ignored: host not ready");
            return false;
        }
        self.enter_playing();
        true
    }

    fn enter_playing(&mut self) {
        self.store.clear();
        self.round.reset(&self.tuning, self.clock);
        self.flash = 0.0;
        self.round_number = self.round_number.wrapping_add(1);
        self.player = Some(
            self.store
                .insert(Entity::player(Vec2::new(PLAYER_START_X, PLAYER_START_Y))),
        );
        self.phase = GamePhase::Playing;
        log::info!("Round started (lives {})", self.round.lives);
        self.emit(GameEvent::info("Game started"));
    }

    /// Abandon the current round and go back to the menu. From `Playing`
    /// this reports a `quit` game-end first; from `GameOver` the loss was
    /// already reported. Returns whether the phase changed.
    pub fn quit(&mut self) -> bool {
        match self.phase {
            GamePhase::Menu => false,
            GamePhase::Playing => {
                let summary = self.round.summary(Outcome::Quit, self.clock);
                log::info!(
                    "Round quit: score {}, killed {}, missed {}",
                    summary.score,
                    summary.enemies_killed,
                    summary.enemies_missed
                );
                self.emit(GameEvent::GameEnd(summary));
                self.enter_menu();
                true
            }
            GamePhase::GameOver => {
                self.enter_menu();
                true
            }
        }
    }

    fn enter_menu(&mut self) {
        self.store.clear();
        self.player = None;
        self.round.game_over_timer = None;
        self.flash = 0.0;
        self.phase = GamePhase::Menu;
        self.emit(GameEvent::info("Returned to menu"));
    }

    /// Apply one point of damage to the player
    pub(crate) fn lose_life(&mut self) {
        if self.round.is_ending() {
            return;
        }
        let remaining = self.round.lose_life();
        self.flash = 1.0;
        log::debug!("Life lost, {} remaining", remaining);
        self.emit(GameEvent::LifeLost { remaining });
        if self.round.is_out_of_lives() {
            self.round.begin_game_over(self.tuning.game_over_delay);
        }
    }

    /// Tear the round down after the last life and report the loss
    pub(crate) fn finish_loss(&mut self) -> GameSummary {
        self.store.clear();
        self.player = None;
        self.round.game_over_timer = None;
        self.phase = GamePhase::GameOver;

        let summary = self.round.summary(Outcome::Loss, self.clock);
        log::info!(
            "Game over: score {}, killed {}, missed {}",
            summary.score,
            summary.enemies_killed,
            summary.enemies_missed
        );
        self.emit(GameEvent::info(format!(
            "Game Over! Final Score: {}, Killed: {}, Missed: {}",
            summary.score, summary.enemies_killed, summary.enemies_missed
        )));
        self.emit(GameEvent::GameEnd(summary.clone()));
        summary
    }

    /// Check the invariants that must hold between ticks
    pub fn validate_invariants(&self) -> Result<(), InvariantViolation> {
        let max = self.tuning.starting_lives;
        if self.round.lives > max {
            return Err(InvariantViolation::LivesOutOfRange {
                lives: self.round.lives,
                max,
            });
        }
        if self.round.spawn_timer < 0.0 {
            return Err(InvariantViolation::NegativeSpawnTimer {
                value: self.round.spawn_timer,
            });
        }

        for (id, entity) in self.store.iter() {
            if !entity.pos.is_finite() {
                return Err(InvariantViolation::NonFinitePosition { index: id.index });
            }
        }

        match self.phase {
            GamePhase::Playing => {
                let id = self.player.ok_or(InvariantViolation::PlayerMissing)?;
                match self.store.get(id) {
                    Some(p) if p.kind == EntityKind::Player => {}
                    _ => return Err(InvariantViolation::StalePlayerId),
                }
            }
            GamePhase::Menu | GamePhase::GameOver => {
                if self.player.is_some() {
                    return Err(InvariantViolation::PlayerOutsideRound);
                }
                if !self.store.is_empty() {
                    return Err(InvariantViolation::EntitiesOutsideRound {
                        count: self.store.len(),
                    });
                }
            }
        }
        Ok(())
    }
}
