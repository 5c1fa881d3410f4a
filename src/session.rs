//! In-memory analytics recorder
//!
//! Collects what the page used to ship to its analytics backend: one row per
//! game event, throttled player position samples, and the final round record.
//! Nothing here touches the network or storage; export with `to_json`.
//!
//! Per frame the host calls `tick`, then `observe(&core.snapshot())` and
//! `core.flush_events(&mut recorder)` in either order. Events are filed by
//! the round number they were raised in, so a quit and a restart landing in
//! the same frame still split cleanly. A round's log closes on its
//! `game-end` event; later events of that round (such as "Returned to menu")
//! are appended to it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::sim::{
    EventContext, EventKind, EventSink, GameEvent, GamePhase, GameSummary, Snapshot,
};

/// One logged game event with the round counters at the moment it was raised
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRow {
    pub event_type: EventKind,
    pub clock: f64,
    pub position: Option<Vec2>,
    pub score_at_event: u64,
    pub lives_at_event: u8,
    pub detail: String,
}

/// Player position at a point in simulated time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
    pub clock: f64,
    pub x: f32,
    pub y: f32,
}

/// Everything recorded for one round
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionLog {
    pub round: u32,
    pub started_at: f64,
    pub events: Vec<EventRow>,
    pub positions: Vec<PositionSample>,
    /// Set by the round's `game-end` event
    pub summary: Option<GameSummary>,
}

impl SessionLog {
    pub fn is_finished(&self) -> bool {
        self.summary.is_some()
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|row| row.event_type == kind).count()
    }
}

/// Event sink that builds a `SessionLog` per round
#[derive(Debug, Clone)]
pub struct SessionRecorder {
    sample_interval: f64,
    last_sample_at: Option<f64>,
    /// Counters from the latest snapshot, used for events delivered without
    /// their own context
    latest: EventContext,
    current: Option<SessionLog>,
    finished: Vec<SessionLog>,
}

impl SessionRecorder {
    pub fn new(settings: &Settings) -> Self {
        Self {
            sample_interval: f64::from(settings.sample_interval),
            last_sample_at: None,
            latest: EventContext {
                round: 0,
                clock: 0.0,
                score: 0,
                lives: 0,
            },
            current: None,
            finished: Vec::new(),
        }
    }

    /// Feed the latest snapshot: makes sure the round has an open log and
    /// samples the player position at most once per sample interval.
    pub fn observe(&mut self, snapshot: &Snapshot) {
        self.latest = EventContext {
            round: snapshot.round,
            clock: snapshot.clock,
            score: snapshot.score,
            lives: snapshot.lives,
        };

        if snapshot.phase != GamePhase::Playing {
            return;
        }
        if self.log_mut(snapshot.round).is_none() {
            self.open(snapshot.round, snapshot.clock);
        }

        let Some(pos) = snapshot.player_pos else {
            return;
        };
        let due = self
            .last_sample_at
            .is_none_or(|last| snapshot.clock - last >= self.sample_interval);
        if !due {
            return;
        }
        match self.current.as_mut() {
            Some(current) if current.round == snapshot.round => {
                current.positions.push(PositionSample {
                    clock: snapshot.clock,
                    x: pos.x,
                    y: pos.y,
                });
                self.last_sample_at = Some(snapshot.clock);
            }
            _ => {}
        }
    }

    /// The round being recorded, if any
    pub fn current(&self) -> Option<&SessionLog> {
        self.current.as_ref()
    }

    /// Completed rounds, oldest first
    pub fn finished(&self) -> &[SessionLog] {
        &self.finished
    }

    pub fn take_finished(&mut self) -> Vec<SessionLog> {
        std::mem::take(&mut self.finished)
    }

    /// Completed rounds as a JSON array
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.finished)
    }

    /// Start a log for `round`. A log still open for an older round was never
    /// ended and is filed as is.
    fn open(&mut self, round: u32, clock: f64) {
        if let Some(stale) = self.current.take() {
            log::warn!("Session for round {} closed without game-end", stale.round);
            self.finished.push(stale);
        }
        log::debug!("Session log opened for round {} at t={:.2}", round, clock);
        self.current = Some(SessionLog {
            round,
            started_at: clock,
            ..SessionLog::default()
        });
        self.last_sample_at = None;
    }

    /// Log for `round`, open or already finished
    fn log_mut(&mut self, round: u32) -> Option<&mut SessionLog> {
        match self.current.as_mut() {
            Some(current) if current.round == round => Some(current),
            _ => self.finished.iter_mut().rev().find(|log| log.round == round),
        }
    }

    fn row(context: &EventContext, event: &GameEvent) -> EventRow {
        let (score, lives) = match event {
            GameEvent::LifeLost { remaining } => (context.score, *remaining),
            GameEvent::GameEnd(summary) => (summary.score, summary.lives),
            _ => (context.score, context.lives),
        };
        EventRow {
            event_type: event.kind(),
            clock: context.clock,
            position: event.position(),
            score_at_event: score,
            lives_at_event: lives,
            detail: event.describe(),
        }
    }
}

impl EventSink for SessionRecorder {
    /// Without a context the latest snapshot's counters are used
    fn on_event(&mut self, event: &GameEvent) {
        let context = self.latest;
        self.on_event_in(&context, event);
    }

    fn on_event_in(&mut self, context: &EventContext, event: &GameEvent) {
        if context.round == 0 {
            log::trace!("No round yet for {}", event.kind().as_str());
            return;
        }
        if self.log_mut(context.round).is_none() {
            self.open(context.round, context.clock);
        }
        let row = Self::row(context, event);
        let Some(log) = self.log_mut(context.round) else {
            return;
        };
        log.events.push(row);

        let GameEvent::GameEnd(summary) = event else {
            return;
        };
        log.summary = Some(summary.clone());
        if self
            .current
            .as_ref()
            .is_some_and(|current| current.round == context.round)
        {
            if let Some(done) = self.current.take() {
                log::info!(
                    "Session closed: {} events, {} samples",
                    done.events.len(),
                    done.positions.len()
                );
                self.finished.push(done);
            }
        }
    }
}
