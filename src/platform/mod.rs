//! Platform glue
//!
//! `Host` is the per-frame loop every embedding runs: read controls, tick the
//! core, feed the session recorder, queue events for the page. The browser
//! bindings in `web` are a thin `wasm-bindgen` wrapper around it; the native
//! demo drives it directly.

#[cfg(target_arch = "wasm32")]
mod web;
#[cfg(target_arch = "wasm32")]
pub use web::WebGame;

use rand::Rng;
use rand_pcg::Pcg32;

use crate::input::Controls;
use crate::session::SessionRecorder;
use crate::settings::Settings;
use crate::sim::{EventSink, GameCore, GameEvent, Snapshot, tick};
use crate::tuning::Tuning;

/// A game core plus the host-side state around it
#[derive(Debug, Clone)]
pub struct Host<R = Pcg32> {
    core: GameCore<R>,
    settings: Settings,
    controls: Controls,
    recorder: SessionRecorder,
    /// Events waiting for the page (UI log, analytics upload)
    outbox: Vec<GameEvent>,
}

impl Host<Pcg32> {
    pub fn new(tuning: Tuning, settings: Settings, seed: u64) -> Self {
        Self::with_core(GameCore::new(tuning, seed), settings)
    }
}

impl<R: Rng> Host<R> {
    pub fn with_core(core: GameCore<R>, settings: Settings) -> Self {
        let recorder = SessionRecorder::new(&settings);
        Self {
            core,
            settings,
            controls: Controls::new(),
            recorder,
            outbox: Vec::new(),
        }
    }

    /// Run one rendered frame
    pub fn frame(&mut self, dt: f32) {
        let input = self.controls.frame_input(&self.settings);
        tick(&mut self.core, &input, dt);
        self.recorder.observe(&self.core.snapshot());

        for (context, event) in self.core.drain_events_with_context() {
            self.recorder.on_event_in(&context, &event);
            self.outbox.push(event);
        }
    }

    pub fn core(&self) -> &GameCore<R> {
        &self.core
    }

    /// Scripted setups only; regular play goes through `frame`
    pub fn core_mut(&mut self) -> &mut GameCore<R> {
        &mut self.core
    }

    pub fn snapshot(&self) -> Snapshot {
        self.core.snapshot()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut Controls {
        &mut self.controls
    }

    pub fn recorder(&self) -> &SessionRecorder {
        &self.recorder
    }

    pub fn recorder_mut(&mut self) -> &mut SessionRecorder {
        &mut self.recorder
    }

    /// Hit flash for the renderer, zero under reduced motion
    pub fn flash(&self) -> f32 {
        if self.settings.effective_flash() {
            self.core.flash()
        } else {
            0.0
        }
    }

    pub fn pending_events(&self) -> &[GameEvent] {
        &self.outbox
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.outbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{EventKind, GamePhase};

    const DT: f32 = 1.0 / 60.0;

    fn host() -> Host {
        Host::new(Tuning::scripted(), Settings::default(), 7)
    }

    #[test]
    fn test_start_key_starts_round() {
        let mut host = host();
        host.controls_mut().start_key = true;
        host.frame(DT);
        assert_eq!(host.core().phase(), GamePhase::Playing);

        // Still held: no second start
        host.frame(DT);
        let events = host.drain_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0], GameEvent::info("Game started"));
        assert!(host.pending_events().is_empty());
    }

    #[test]
    fn test_recorder_sees_every_event() {
        let mut host = host();
        host.controls_mut().start_key = true;
        host.frame(DT);
        host.controls_mut().start_key = false;
        host.controls_mut().quit_key = true;
        host.frame(DT);

        assert_eq!(host.core().phase(), GamePhase::Menu);
        let sessions = host.recorder().finished();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].count(EventKind::GameEnd), 1);
        // "Game started", game-end, "Returned to menu"
        assert_eq!(sessions[0].events.len(), 3);
        assert_eq!(host.pending_events().len(), 3);
    }

    #[test]
    fn test_quit_and_restart_in_one_frame_keep_rounds_apart() {
        let mut host = host();
        host.controls_mut().start_key = true;
        host.frame(DT);
        host.controls_mut().start_key = false;
        host.frame(DT);

        host.controls_mut().start_key = true;
        host.controls_mut().quit_key = true;
        host.frame(DT);

        assert_eq!(host.core().phase(), GamePhase::Playing);
        let sessions = host.recorder().finished();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].round, 1);
        assert!(sessions[0].is_finished());
        let current = host.recorder().current().unwrap();
        assert_eq!(current.round, 2);
        assert_eq!(current.events.len(), 1);
        assert_eq!(current.events[0].event_type, EventKind::Info);
    }

    #[test]
    fn test_pointer_moves_player() {
        let mut host = host();
        host.controls_mut().start_key = true;
        host.frame(DT);
        host.controls_mut().pointer_moved(100.0);
        host.frame(DT);
        assert_eq!(host.core().player_position().map(|p| p.x), Some(100.0));
    }

    #[test]
    fn test_reduced_motion_hides_flash() {
        let settings = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        let mut host = Host::new(Tuning::scripted(), settings, 7);
        host.core_mut().start();
        host.core_mut().lose_life();
        assert!(host.core().flash() > 0.0);
        assert_eq!(host.flash(), 0.0);
    }
}
