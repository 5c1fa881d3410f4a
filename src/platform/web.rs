//! Browser bindings
//!
//! The page owns the canvas, the animation frame loop and the analytics
//! upload. It forwards DOM input here, calls `tick` once per frame and polls
//! the getters for drawing.

use wasm_bindgen::prelude::*;

use super::Host;
use crate::settings::Settings;
use crate::sim::{EnemyVariant, EntityKind, GamePhase};
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Logger already installed by an earlier instance
        return;
    }
    log::info!("Space Captcha core loaded");
}

fn js_error(err: impl std::fmt::Display) -> JsError {
    JsError::new(&err.to_string())
}

#[wasm_bindgen]
pub struct WebGame {
    host: Host,
}

#[wasm_bindgen]
impl WebGame {
    /// `tuning_json` / `settings_json` may be empty for defaults
    #[wasm_bindgen(constructor)]
    pub fn new(seed: f64, tuning_json: &str, settings_json: &str) -> Result<WebGame, JsError> {
        let tuning = if tuning_json.trim().is_empty() {
            Tuning::default()
        } else {
            Tuning::from_json(tuning_json).map_err(js_error)?
        };
        let settings = if settings_json.trim().is_empty() {
            Settings::default()
        } else {
            Settings::from_json(settings_json).map_err(js_error)?
        };
        Ok(WebGame {
            host: Host::new(tuning, settings, seed as u64),
        })
    }

    /// Advance one frame; `dt` in seconds
    pub fn tick(&mut self, dt: f32) {
        self.host.frame(dt);
    }

    pub fn set_host_ready(&mut self, ready: bool) {
        self.host.core_mut().set_host_ready(ready);
    }

    // === Input ===

    pub fn set_key(&mut self, code: &str, down: bool) {
        let controls = self.host.controls_mut();
        match code {
            "ArrowLeft" | "KeyA" => controls.left = down,
            "ArrowRight" | "KeyD" => controls.right = down,
            "Space" => controls.fire_key = down,
            "Enter" => controls.start_key = down,
            "Escape" => controls.quit_key = down,
            _ => {}
        }
    }

    pub fn pointer_move(&mut self, x: f32) {
        self.host.controls_mut().pointer_moved(x);
    }

    pub fn pointer_leave(&mut self) {
        self.host.controls_mut().pointer_left();
    }

    pub fn pointer_down(&mut self) {
        self.host.controls_mut().click();
    }

    // === Read-only state ===

    #[wasm_bindgen(getter)]
    pub fn phase(&self) -> String {
        self.host.core().phase().as_str().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn playing(&self) -> bool {
        self.host.core().phase() == GamePhase::Playing
    }

    #[wasm_bindgen(getter)]
    pub fn score(&self) -> f64 {
        self.host.core().score() as f64
    }

    #[wasm_bindgen(getter)]
    pub fn lives(&self) -> u8 {
        self.host.core().lives()
    }

    #[wasm_bindgen(getter)]
    pub fn enemies_killed(&self) -> u32 {
        self.host.core().enemies_killed()
    }

    #[wasm_bindgen(getter)]
    pub fn enemies_missed(&self) -> u32 {
        self.host.core().enemies_missed()
    }

    #[wasm_bindgen(getter)]
    pub fn flash(&self) -> f32 {
        self.host.flash()
    }

    #[wasm_bindgen(getter)]
    pub fn background_offset(&self) -> f32 {
        self.host.core().background_offset()
    }

    /// Live entities as `[kind, x, y, ...]` triples for the renderer
    pub fn entities(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.host.core().entities().len() * 3);
        for (_, entity) in self.host.core().entities().iter() {
            if !entity.alive {
                continue;
            }
            let kind = match entity.kind {
                EntityKind::Player => 0.0,
                EntityKind::Enemy { variant } => match variant {
                    EnemyVariant::Common => 1.0,
                    EnemyVariant::Rare => 2.0,
                },
                EntityKind::PlayerBullet => 3.0,
                EntityKind::EnemyBullet => 4.0,
            };
            out.extend_from_slice(&[kind, entity.pos.x, entity.pos.y]);
        }
        out
    }

    /// Events since the last call, as a JSON array
    pub fn drain_events(&mut self) -> Result<String, JsError> {
        let events = self.host.drain_events();
        serde_json::to_string(&events).map_err(js_error)
    }

    /// Completed round logs for the analytics upload, as a JSON array
    pub fn take_sessions(&mut self) -> Result<String, JsError> {
        let sessions = self.host.recorder_mut().take_finished();
        serde_json::to_string(&sessions).map_err(js_error)
    }
}
