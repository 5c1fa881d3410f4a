//! Space Captcha entry point
//!
//! The browser build is driven from JavaScript through `platform::WebGame`.
//! Natively this runs a headless autopilot for a while and prints the
//! recorded sessions as JSON.

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use space_captcha::platform::Host;
    use space_captcha::sim::{EventSink, GamePhase, LogSink};
    use space_captcha::{Settings, Tuning};

    const FRAME_DT: f32 = 1.0 / 60.0;
    /// Frames per press/release cycle of the fire key
    const FIRE_CYCLE: u64 = 12;

    pub struct Args {
        pub seed: u64,
        pub seconds: f32,
    }

    impl Args {
        pub fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, String> {
            let seed = match args.next() {
                Some(s) => s.parse().map_err(|_| format!("invalid seed: {s}"))?,
                None => 1,
            };
            let seconds = match args.next() {
                Some(s) => s
                    .parse::<f32>()
                    .ok()
                    .filter(|v| v.is_finite() && *v > 0.0)
                    .ok_or_else(|| format!("invalid duration: {s}"))?,
                None => 60.0,
            };
            Ok(Self { seed, seconds })
        }
    }

    /// Chase the lowest enemy, fire steadily, restart after each loss
    fn steer(host: &mut Host, frame: u64) {
        let phase = host.core().phase();
        let target = host
            .core()
            .entities()
            .iter()
            .filter(|(_, e)| e.alive && e.kind.is_enemy())
            .max_by(|(_, a), (_, b)| a.pos.y.total_cmp(&b.pos.y))
            .map(|(_, e)| e.pos.x);
        let player_x = host.core().player_position().map(|p| p.x);

        let controls = host.controls_mut();
        controls.start_key = phase != GamePhase::Playing && !controls.start_key;
        controls.fire_key = frame % FIRE_CYCLE < FIRE_CYCLE / 2;
        if let Some(x) = target.or(player_x) {
            controls.pointer_moved(x);
        }
    }

    pub fn run(args: &Args) -> serde_json::Result<String> {
        log::info!(
            "Autopilot: seed {}, {:.1}s of simulated play",
            args.seed,
            args.seconds
        );
        let settings = Settings {
            pointer_mode: space_captcha::PointerMode::Seek,
            ..Settings::default()
        };
        let mut host = Host::new(Tuning::default(), settings, args.seed);
        let frames = (args.seconds / FRAME_DT).ceil() as u64;

        let mut log_sink = LogSink;
        for frame in 0..frames {
            steer(&mut host, frame);
            host.frame(FRAME_DT);
            for event in host.drain_events() {
                log_sink.on_event(&event);
            }
        }

        // Close an unfinished round so it shows up in the export
        if host.core().phase() == GamePhase::Playing {
            let controls = host.controls_mut();
            controls.start_key = false;
            controls.quit_key = true;
            host.frame(FRAME_DT);
            for event in host.drain_events() {
                log_sink.on_event(&event);
            }
        }

        log::info!("{} rounds recorded", host.recorder().finished().len());
        host.recorder().to_json()
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Space Captcha (native) starting...");

    let args = match autopilot::Args::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{msg}");
            eprintln!("usage: space-captcha [seed] [seconds]");
            std::process::exit(2);
        }
    };

    match autopilot::run(&args) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            log::error!("Failed to export sessions: {e}");
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::init, this is just to satisfy the compiler
}
