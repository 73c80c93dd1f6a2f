//! Birthday Quest entry point
//!
//! In the browser the wasm exports in `web` are driven from JS. Natively this
//! runs a headless autoplay of the whole journey in virtual time.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use birthday_quest::autoplay::Autopilot;
    use birthday_quest::sim::{PathChoice, StepSequencer};
    use birthday_quest::{GameTuning, Settings, format_clock};

    /// One autopilot decision per frame of virtual time
    const FRAME_MS: u64 = 100;
    /// Give up after three virtual hours
    const LIMIT_MS: u64 = 3 * 60 * 60 * 1000;

    env_logger::init();
    log::info!("Birthday Quest (native) starting...");

    let mut args = std::env::args().skip(1);
    let choice = match args.next().as_deref() {
        Some("love") => PathChoice::Love,
        Some("glam") => PathChoice::Glam,
        _ => PathChoice::Crown,
    };
    let settings = Settings {
        seed: args.next().and_then(|s| s.parse().ok()),
        ..Settings::load()
    };

    let mut journey = StepSequencer::from_settings(&settings, GameTuning::default(), 1);
    let mut pilot = Autopilot::new();

    while pilot.steer(&mut journey, choice) {
        for event in journey.drain_events() {
            log::debug!("cue: {event:?}");
        }
        journey.advance(FRAME_MS);
        if journey.now_ms() > LIMIT_MS {
            log::error!("Journey did not finish in time");
            std::process::exit(1);
        }
    }

    println!(
        "Journey via {:?} finished in {} of virtual time",
        choice,
        format_clock((journey.now_ms() / 1000) as u32)
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is journey_init, this is just to satisfy the compiler
}
