//! Error types for the fallible edges of the crate
//!
//! The simulation itself is total; only configuration parsing and invariant
//! checks can fail.

use std::fmt;

/// Failure to load or validate a `Tuning` or `Settings` document
#[derive(Debug)]
pub enum ConfigError {
    /// The JSON document could not be parsed
    Parse(serde_json::Error),
    /// A field parsed but holds a value the simulation cannot run with
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "config parse error: {err}"),
            Self::Invalid { field, reason } => write!(f, "invalid `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

/// A broken simulation invariant, reported by `GameCore::validate_invariants`
#[derive(Clone, Debug, PartialEq)]
pub enum InvariantViolation {
    LivesOutOfRange { lives: u8, max: u8 },
    PlayerMissing,
    PlayerOutsideRound,
    StalePlayerId,
    EntitiesOutsideRound { count: usize },
    NonFinitePosition { index: u32 },
    NegativeSpawnTimer { value: f32 },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LivesOutOfRange { lives, max } => {
                write!(f, "lives out of range: {lives} (allowed 0..={max})")
            }
            Self::PlayerMissing => write!(f, "no player entity while playing"),
            Self::PlayerOutsideRound => write!(f, "player entity exists outside a round"),
            Self::StalePlayerId => write!(f, "player id does not resolve to a player entity"),
            Self::EntitiesOutsideRound { count } => {
                write!(f, "{count} entities remain outside a round")
            }
            Self::NonFinitePosition { index } => {
                write!(f, "entity in slot {index} has a non-finite position")
            }
            Self::NegativeSpawnTimer { value } => write!(f, "spawn timer is negative: {value}"),
        }
    }
}

impl std::error::Error for InvariantViolation {}
