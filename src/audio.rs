//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!
//! The sim emits [`GameEvent`]s; this module maps them to short tone
//! sequences. Off the browser the manager is silent.

#[cfg(target_arch = "wasm32")]
use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::settings::Settings;
use crate::sim::event::GameEvent;
use crate::sim::phase::Phase;

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wave {
    Sine,
    Triangle,
    Square,
}

/// One note of a sound effect
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub freq: f32,
    /// Seconds after the effect starts
    pub offset: f32,
    pub secs: f32,
    /// Peak gain before volume scaling
    pub gain: f32,
    pub wave: Wave,
}

const fn sine(freq: f32, offset: f32, secs: f32) -> Tone {
    Tone {
        freq,
        offset,
        secs,
        gain: 0.1,
        wave: Wave::Sine,
    }
}

const fn shaped(wave: Wave, gain: f32, tone: Tone) -> Tone {
    Tone { wave, gain, ..tone }
}

const POP: &[Tone] = &[sine(800.0, 0.0, 0.1)];
const PATH_SELECT: &[Tone] = &[sine(600.0, 0.0, 0.2)];
const CELEBRATE: &[Tone] = &[sine(600.0, 0.0, 0.5)];
const COUNTDOWN_BEEP: &[Tone] = &[sine(440.0, 0.0, 0.15)];
const GO: &[Tone] = &[sine(880.0, 0.0, 0.25)];
const CARD_FLIP: &[Tone] = &[shaped(Wave::Triangle, 0.1, sine(520.0, 0.0, 0.06))];
const PAIR_MATCH: &[Tone] = &[sine(660.0, 0.0, 0.1), sine(880.0, 0.1, 0.15)];
const MISMATCH: &[Tone] = &[shaped(Wave::Triangle, 0.1, sine(220.0, 0.0, 0.2))];
const DICE_ROLL: &[Tone] = &[
    shaped(Wave::Square, 0.05, sine(300.0, 0.0, 0.04)),
    shaped(Wave::Square, 0.05, sine(360.0, 0.06, 0.04)),
];
const SNAKE_BITE: &[Tone] = &[sine(400.0, 0.0, 0.15), sine(300.0, 0.15, 0.15), sine(200.0, 0.3, 0.25)];
const LADDER_CLIMB: &[Tone] = &[sine(400.0, 0.0, 0.1), sine(500.0, 0.1, 0.1), sine(650.0, 0.2, 0.2)];
const CORRECT: &[Tone] = &[sine(700.0, 0.0, 0.1), sine(1050.0, 0.1, 0.2)];
const WRONG: &[Tone] = &[shaped(Wave::Square, 0.05, sine(180.0, 0.0, 0.3))];
const GATE_OPEN: &[Tone] = &[sine(523.0, 0.0, 0.12), sine(784.0, 0.12, 0.2)];
const LIFE_LOST: &[Tone] = &[shaped(Wave::Triangle, 0.1, sine(160.0, 0.0, 0.4))];
/// C major arpeggio
const WIN: &[Tone] = &[
    sine(523.0, 0.0, 0.15),
    sine(659.0, 0.15, 0.15),
    sine(784.0, 0.3, 0.15),
    sine(1047.0, 0.45, 0.4),
];
const RETRY: &[Tone] = &[sine(392.0, 0.0, 0.2), sine(330.0, 0.2, 0.3)];

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Balloon popped
    Pop,
    /// Journey picked on the reveal step
    PathSelect,
    /// Final step fanfare
    Celebrate,
    /// Countdown started
    CountdownBeep,
    /// Play started
    Go,
    CardFlip,
    PairMatch,
    Mismatch,
    DiceRoll,
    SnakeBite,
    LadderClimb,
    Correct,
    Wrong,
    GateOpen,
    LifeLost,
    Win,
    Retry,
}

impl SoundEffect {
    /// Sound for a sim event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        let effect = match event {
            GameEvent::PhaseChanged(Phase::Countdown) => SoundEffect::CountdownBeep,
            GameEvent::PhaseChanged(Phase::Playing) => SoundEffect::Go,
            GameEvent::PhaseChanged(_) => return None,
            GameEvent::CardFlipped { .. } => SoundEffect::CardFlip,
            GameEvent::PairMatched => SoundEffect::PairMatch,
            GameEvent::Mismatch => SoundEffect::Mismatch,
            GameEvent::BalloonPopped { .. } => SoundEffect::Pop,
            GameEvent::DiceRolled { .. } => SoundEffect::DiceRoll,
            GameEvent::SnakeBite { .. } | GameEvent::TripleSix { .. } => SoundEffect::SnakeBite,
            GameEvent::LadderClimb { .. } => SoundEffect::LadderClimb,
            GameEvent::AnswerCorrect => SoundEffect::Correct,
            GameEvent::AnswerWrong | GameEvent::QuestionTimedOut => SoundEffect::Wrong,
            GameEvent::GateQuestion { .. } => SoundEffect::CountdownBeep,
            GameEvent::GateOpened { .. } => SoundEffect::GateOpen,
            GameEvent::GuardCaught => return None,
            GameEvent::LifeLost { .. } => SoundEffect::LifeLost,
            GameEvent::FinishReached => SoundEffect::LadderClimb,
            GameEvent::Won => SoundEffect::Win,
            GameEvent::Retry => SoundEffect::Retry,
            GameEvent::PathSelected => SoundEffect::PathSelect,
            GameEvent::Confetti => return None,
            GameEvent::Celebrate => SoundEffect::Celebrate,
        };
        Some(effect)
    }

    pub fn tones(&self) -> &'static [Tone] {
        match self {
            SoundEffect::Pop => POP,
            SoundEffect::PathSelect => PATH_SELECT,
            SoundEffect::Celebrate => CELEBRATE,
            SoundEffect::CountdownBeep => COUNTDOWN_BEEP,
            SoundEffect::Go => GO,
            SoundEffect::CardFlip => CARD_FLIP,
            SoundEffect::PairMatch => PAIR_MATCH,
            SoundEffect::Mismatch => MISMATCH,
            SoundEffect::DiceRoll => DICE_ROLL,
            SoundEffect::SnakeBite => SNAKE_BITE,
            SoundEffect::LadderClimb => LADDER_CLIMB,
            SoundEffect::Correct => CORRECT,
            SoundEffect::Wrong => WRONG,
            SoundEffect::GateOpen => GATE_OPEN,
            SoundEffect::LifeLost => LIFE_LOST,
            SoundEffect::Win => WIN,
            SoundEffect::Retry => RETRY,
        }
    }

    /// Seconds until the last note ends
    pub fn duration(&self) -> f32 {
        self.tones().iter().map(|t| t.offset + t.secs).fold(0.0, f32::max)
    }
}

/// Audio manager for the game
pub struct AudioManager {
    #[cfg(target_arch = "wasm32")]
    ctx: Option<AudioContext>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    #[cfg(target_arch = "wasm32")]
    pub fn new() -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn new() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Create a manager with volumes taken from settings
    pub fn from_settings(settings: &Settings) -> Self {
        let mut audio = Self::new();
        audio.apply_settings(settings);
        audio
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.set_muted(settings.muted);
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        #[cfg(target_arch = "wasm32")]
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play the sound for every event that has one
    pub fn play_events(&self, events: &[GameEvent]) {
        for effect in events.iter().filter_map(SoundEffect::for_event) {
            self.play(effect);
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.play_tones(effect, vol);
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn play_tones(&self, effect: SoundEffect, vol: f32) {
        log::trace!("sfx {effect:?} at volume {vol:.2}");
    }

    #[cfg(target_arch = "wasm32")]
    fn play_tones(&self, effect: SoundEffect, vol: f32) {
        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        let t = ctx.current_time();
        for tone in effect.tones() {
            let Some((osc, gain)) = self.create_osc(ctx, tone.freq, tone.wave) else {
                return;
            };
            let start = t + tone.offset as f64;
            let end = start + tone.secs as f64;

            gain.gain().set_value_at_time(tone.gain * vol, start).ok();
            gain.gain().exponential_ramp_to_value_at_time(0.01, end).ok();

            osc.start_with_when(start).ok();
            osc.stop_with_when(end).ok();
        }
    }

    /// Create an oscillator with gain envelope
    #[cfg(target_arch = "wasm32")]
    fn create_osc(&self, ctx: &AudioContext, freq: f32, wave: Wave) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(match wave {
            Wave::Sine => OscillatorType::Sine,
            Wave::Triangle => OscillatorType::Triangle,
            Wave::Square => OscillatorType::Square,
        });
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }
}
