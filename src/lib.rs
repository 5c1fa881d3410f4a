//! Space Captcha - gameplay core of an arcade shooter used as a CAPTCHA
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, collisions, round state)
//! - `input`: Host input adapter (edge-triggered buttons, keyboard/pointer movement)
//! - `session`: In-memory analytics recorder fed by simulation events
//! - `platform`: Per-frame host loop (`Host`) and the wasm32 browser bindings
//! - `tuning`: Data-driven game balance
//! - `settings`: Host preferences

pub mod error;
pub mod input;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{ConfigError, InvariantViolation};
pub use session::SessionRecorder;
pub use settings::{PointerMode, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (pixels, origin top-left, y grows downward)
    pub const PLAYFIELD_WIDTH: f32 = 550.0;
    pub const PLAYFIELD_HEIGHT: f32 = 700.0;
    /// Horizontal margin kept clear on both sides for the player and spawns
    pub const PLAYFIELD_MARGIN: f32 = 25.0;

    /// Player spawn position
    pub const PLAYER_START_X: f32 = 275.0;
    pub const PLAYER_START_Y: f32 = 610.0;

    /// Hitbox sizes (width, height), centred on the entity position
    pub const PLAYER_SIZE: (f32, f32) = (40.0, 60.0);
    pub const ENEMY_SIZE: (f32, f32) = (40.0, 40.0);
    pub const BULLET_SIZE: (f32, f32) = (10.0, 20.0);

    /// Enemies appear this far above the visible top edge
    pub const ENEMY_SPAWN_Y: f32 = -30.0;
    /// Player bullets leave from the ship's nose
    pub const PLAYER_BULLET_OFFSET_Y: f32 = -30.0;
    /// Enemy bullets leave from below the enemy
    pub const ENEMY_BULLET_OFFSET_Y: f32 = 20.0;

    /// Player bullets are culled above this line
    pub const PLAYER_BULLET_CULL_Y: f32 = -10.0;
    /// Enemies and enemy bullets are culled below this line
    pub const BOTTOM_CULL_Y: f32 = PLAYFIELD_HEIGHT;
}

/// Horizontal range the player (and enemy spawns) may occupy
#[inline]
pub fn playfield_x_range() -> (f32, f32) {
    (
        consts::PLAYFIELD_MARGIN,
        consts::PLAYFIELD_WIDTH - consts::PLAYFIELD_MARGIN,
    )
}

/// Clamp an x coordinate to the playable horizontal band
#[inline]
pub fn clamp_to_playfield_x(x: f32) -> f32 {
    let (min, max) = playfield_x_range();
    if x.is_nan() {
        return consts::PLAYER_START_X;
    }
    x.clamp(min, max)
}
