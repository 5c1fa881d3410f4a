//! Domain events pushed to external collaborators (logging, analytics)
//!
//! Events are buffered by the core during a tick and handed to an
//! `EventSink` afterwards. Each occurrence is delivered at most once.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::round::GameSummary;

/// Something interesting that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum GameEvent {
    #[serde(rename_all = "camelCase")]
    EnemyKilled { pos: Vec2, score_delta: u64 },
    EnemyMissed { pos: Vec2 },
    LifeLost { remaining: u8 },
    Info { message: String },
    GameEnd(GameSummary),
}

/// Event discriminant, for filtering without matching payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    EnemyKilled,
    EnemyMissed,
    LifeLost,
    Info,
    GameEnd,
}

impl EventKind {
    /// Wire name used by the page's event log
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::EnemyKilled => "enemy-killed",
            EventKind::EnemyMissed => "enemy-missed",
            EventKind::LifeLost => "life-lost",
            EventKind::Info => "info",
            EventKind::GameEnd => "game-end",
        }
    }
}

impl GameEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::EnemyKilled { .. } => EventKind::EnemyKilled,
            GameEvent::EnemyMissed { .. } => EventKind::EnemyMissed,
            GameEvent::LifeLost { .. } => EventKind::LifeLost,
            GameEvent::Info { .. } => EventKind::Info,
            GameEvent::GameEnd(_) => EventKind::GameEnd,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        GameEvent::Info {
            message: message.into(),
        }
    }

    /// Position the event happened at, if it has one
    pub fn position(&self) -> Option<Vec2> {
        match self {
            GameEvent::EnemyKilled { pos, .. } | GameEvent::EnemyMissed { pos } => Some(*pos),
            _ => None,
        }
    }

    /// Human readable line, matching the page's event log text
    pub fn describe(&self) -> String {
        match self {
            GameEvent::EnemyKilled { pos, score_delta } => format!(
                "Enemy destroyed at x:{}, y:{} (+{} pts)",
                pos.x.floor(),
                pos.y.floor(),
                score_delta
            ),
            GameEvent::EnemyMissed { pos } => format!("Enemy escaped at x:{}", pos.x.floor()),
            GameEvent::LifeLost { remaining } => format!("Life lost! {remaining} remaining"),
            GameEvent::Info { message } => message.clone(),
            GameEvent::GameEnd(summary) => format!(
                "Round ended ({}): score {}, killed {}, missed {}",
                summary.outcome.as_str(),
                summary.score,
                summary.enemies_killed,
                summary.enemies_missed
            ),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Round counters at the moment an event was raised (after the event's own
/// effect was applied)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventContext {
    /// Round number, 0 before the first start
    pub round: u32,
    pub clock: f64,
    pub score: u64,
    pub lives: u8,
}

/// Receiver of simulation events. Sinks only observe; they never get access
/// to the entity store or round state.
pub trait EventSink {
    fn on_event(&mut self, event: &GameEvent);

    /// Called by `GameCore::flush_events`; sinks that care about the
    /// counters at emission time override this
    fn on_event_in(&mut self, context: &EventContext, event: &GameEvent) {
        let _ = context;
        self.on_event(event);
    }
}

impl EventSink for Vec<GameEvent> {
    fn on_event(&mut self, event: &GameEvent) {
        self.push(event.clone());
    }
}

impl<F: FnMut(&GameEvent)> EventSink for F {
    fn on_event(&mut self, event: &GameEvent) {
        self(event)
    }
}

/// Sink that writes every event to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn on_event(&mut self, event: &GameEvent) {
        match event.kind() {
            EventKind::Info | EventKind::GameEnd => {
                log::info!("[{}] {}", event.kind().as_str(), event.describe())
            }
            _ => log::debug!("[{}] {}", event.kind().as_str(), event.describe()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::round::Outcome;

    #[test]
    fn test_wire_format() {
        let event = GameEvent::EnemyKilled {
            pos: Vec2::new(100.0, 50.0),
            score_delta: 10,
        };
        let json = event.to_json().unwrap();
        assert!(json.contains("\"type\":\"enemy-killed\""));
        assert!(json.contains("\"scoreDelta\":10"));

        let end = GameEvent::GameEnd(GameSummary {
            score: 30,
            enemies_killed: 3,
            enemies_missed: 1,
            lives: 0,
            outcome: Outcome::Loss,
            duration_secs: 12.0,
        });
        let json = end.to_json().unwrap();
        assert!(json.contains("\"type\":\"game-end\""));
        assert!(json.contains("\"outcome\":\"loss\""));
        assert!(json.contains("\"enemiesMissed\":1"));

        let back: GameEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, end);
    }

    #[test]
    fn test_describe() {
        let event = GameEvent::EnemyKilled {
            pos: Vec2::new(100.7, 50.2),
            score_delta: 10,
        };
        assert_eq!(event.describe(), "Enemy destroyed at x:100, y:50 (+10 pts)");
        assert_eq!(
            GameEvent::LifeLost { remaining: 2 }.describe(),
            "Life lost! 2 remaining"
        );
        assert_eq!(event.kind().as_str(), "enemy-killed");
    }

    #[test]
    fn test_closure_sink() {
        let mut seen = Vec::new();
        let mut sink = |e: &GameEvent| seen.push(e.kind());
        sink.on_event(&GameEvent::info("hello"));
        sink.on_event(&GameEvent::LifeLost { remaining: 1 });
        assert_eq!(seen, vec![EventKind::Info, EventKind::LifeLost]);
    }
}
