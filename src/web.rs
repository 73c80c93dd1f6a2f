//! Browser bindings
//!
//! JS owns the DOM and the animation frame loop. It calls `journey_tick`
//! once per frame with the frame timestamp, forwards clicks as actions and
//! renders from the JSON returned by `journey_view`.

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

use crate::audio::AudioManager;
use crate::settings::Settings;
use crate::sim::{GameAction, GameEvent, PathChoice, StepSequencer};
use crate::tuning::GameTuning;

/// Frames longer than this are treated as a backgrounded tab catching up
const MAX_FRAME_MS: f64 = 60_000.0;

struct App {
    journey: StepSequencer,
    audio: AudioManager,
    settings: Settings,
    last_frame: Option<f64>,
    /// Cues not yet handed to JS
    cues: Vec<GameEvent>,
}

impl App {
    /// Play sounds for new events and queue the visual cues
    fn flush(&mut self) {
        let events = self.journey.drain_events();
        self.audio.play_events(&events);
        let confetti = self.settings.confetti_enabled();
        self.cues
            .extend(events.into_iter().filter(|e| confetti || *e != GameEvent::Confetti));
    }
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

fn with_app<R>(f: impl FnOnce(&mut App) -> R) -> Option<R> {
    APP.with(|cell| {
        let mut borrow = cell.borrow_mut();
        let Some(app) = borrow.as_mut() else {
            log::warn!("Journey not initialized. Call journey_init() first.");
            return None;
        };
        let out = f(app);
        app.flush();
        Some(out)
    })
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        log::error!("Failed to serialize view: {e}");
        "null".to_string()
    })
}

/// Set up logging, load settings and start the journey.
/// `tuning_json` may override any subset of the game balance.
#[wasm_bindgen]
pub fn journey_init(tuning_json: Option<String>) {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let settings = Settings::load();
    let tuning = match tuning_json.as_deref().map(GameTuning::from_json) {
        Some(Ok(tuning)) => tuning,
        Some(Err(e)) => {
            log::warn!("Falling back to default tuning: {e}");
            GameTuning::default()
        }
        None => GameTuning::default(),
    };

    let journey = StepSequencer::from_settings(&settings, tuning, js_sys::Date::now() as u64);
    let app = App {
        journey,
        audio: AudioManager::from_settings(&settings),
        settings,
        last_frame: None,
        cues: Vec::new(),
    };
    APP.with(|cell| *cell.borrow_mut() = Some(app));
    log::info!("Birthday Quest initialized");
}

/// Advance the journey to the frame timestamp (ms). Returns the new cues as JSON.
#[wasm_bindgen]
pub fn journey_tick(now_ms: f64) -> String {
    with_app(|app| {
        let elapsed = app.last_frame.map_or(0.0, |last| (now_ms - last).clamp(0.0, MAX_FRAME_MS));
        app.last_frame = Some(now_ms);
        app.journey.advance(elapsed as u64);
        app.flush();
        to_json(&std::mem::take(&mut app.cues))
    })
    .unwrap_or_else(|| "[]".to_string())
}

#[wasm_bindgen]
pub fn journey_view() -> String {
    with_app(|app| to_json(&app.journey.view())).unwrap_or_else(|| "null".to_string())
}

#[wasm_bindgen]
pub fn journey_next() -> bool {
    with_app(|app| app.journey.next()).unwrap_or(false)
}

#[wasm_bindgen]
pub fn journey_prev() -> bool {
    with_app(|app| app.journey.prev()).unwrap_or(false)
}

/// `choice` is `"Crown"`, `"Love"` or `"Glam"`
#[wasm_bindgen]
pub fn journey_select_path(choice: &str) -> Result<bool, JsValue> {
    let choice: PathChoice =
        serde_json::from_value(serde_json::Value::String(choice.to_string())).map_err(|e| JsValue::from_str(&e.to_string()))?;
    with_app(|app| {
        app.audio.resume();
        app.journey.select_path(choice)
    })
    .ok_or_else(|| JsValue::from_str("journey not initialized"))
}

#[wasm_bindgen]
pub fn journey_start_path() -> bool {
    with_app(|app| app.journey.start_path()).unwrap_or(false)
}

/// `action_json` is a serialized `GameAction`, e.g. `{"PopBalloon":3}`
#[wasm_bindgen]
pub fn journey_act(action_json: &str) -> Result<(), JsValue> {
    let action: GameAction = serde_json::from_str(action_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    with_app(|app| app.journey.act(action)).ok_or_else(|| JsValue::from_str("journey not initialized"))
}

#[wasm_bindgen]
pub fn journey_back() {
    with_app(|app| app.journey.back());
}

#[wasm_bindgen]
pub fn journey_skip_rules() -> bool {
    with_app(|app| app.journey.skip_rules()).unwrap_or(false)
}

#[wasm_bindgen]
pub fn journey_finish_path() -> bool {
    with_app(|app| app.journey.finish_path()).unwrap_or(false)
}

#[wasm_bindgen]
pub fn journey_celebrate() -> bool {
    with_app(|app| app.journey.celebrate()).unwrap_or(false)
}

#[wasm_bindgen]
pub fn journey_set_muted(muted: bool) {
    with_app(|app| {
        app.settings.muted = muted;
        app.audio.apply_settings(&app.settings);
        app.settings.save();
    });
}

#[wasm_bindgen]
pub fn journey_set_volume(master: f32, sfx: f32) {
    with_app(|app| {
        app.settings.master_volume = master;
        app.settings.sfx_volume = sfx;
        app.settings = app.settings.clone().sanitized();
        app.audio.apply_settings(&app.settings);
        app.settings.save();
    });
}
