//! Host input adapter
//!
//! Browsers report button *levels* (held / not held); the simulation wants
//! one-shot pulses. `Controls` keeps the raw device state and produces one
//! `TickInput` per frame.

use serde::{Deserialize, Serialize};

use crate::settings::{PointerMode, Settings};
use crate::sim::{MovementIntent, TickInput};

/// Turns a held button into a single pulse on the frame it goes down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeTrigger {
    was_down: bool,
}

impl EdgeTrigger {
    /// Feed the current level; true only on the up -> down transition
    pub fn pressed(&mut self, down: bool) -> bool {
        let pressed = down && !self.was_down;
        self.was_down = down;
        pressed
    }
}

/// Raw device state, updated from DOM events between frames
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    /// Fire key (space) held
    pub fire_key: bool,
    pub start_key: bool,
    pub quit_key: bool,
    /// Last pointer x in playfield coordinates
    pub pointer_x: Option<f32>,
    /// Pointer clicks since the last frame
    clicks: u32,
    fire_edge: EdgeTrigger,
    start_edge: EdgeTrigger,
    quit_edge: EdgeTrigger,
}

impl Controls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a primary-button click (counts as one fire pulse)
    pub fn click(&mut self) {
        self.clicks = self.clicks.saturating_add(1);
    }

    pub fn pointer_moved(&mut self, x: f32) {
        if x.is_finite() {
            self.pointer_x = Some(x);
        }
    }

    /// Forget the pointer (it left the canvas)
    pub fn pointer_left(&mut self) {
        self.pointer_x = None;
    }

    /// Build this frame's input and consume pending pulses
    pub fn frame_input(&mut self, settings: &Settings) -> TickInput {
        let fire_pressed = self.fire_edge.pressed(self.fire_key);
        let clicked = self.clicks > 0;
        self.clicks = 0;

        TickInput {
            movement: self.movement(settings),
            fire: fire_pressed || clicked,
            start: self.start_edge.pressed(self.start_key),
            quit: self.quit_edge.pressed(self.quit_key),
        }
    }

    /// Keys win over the pointer while held; otherwise follow the pointer
    fn movement(&self, settings: &Settings) -> MovementIntent {
        if settings.keyboard_enabled {
            let axis = match (self.left, self.right) {
                (true, false) => -1.0,
                (false, true) => 1.0,
                _ => 0.0,
            };
            if axis != 0.0 {
                return MovementIntent::Axis { axis };
            }
        }
        match (self.pointer_x, settings.pointer_mode) {
            (Some(x), PointerMode::Snap) => MovementIntent::Target { x },
            (Some(x), PointerMode::Seek) => MovementIntent::Seek { x },
            (None, _) => MovementIntent::Idle,
        }
    }
}
