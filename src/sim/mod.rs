//! Deterministic simulation module
//!
//! All journey logic lives here. This module must be pure and deterministic:
//! - Virtual time only (see [`timer::Scheduler`])
//! - Seeded RNG only
//! - Stable iteration order
//! - No rendering or platform dependencies

pub mod content;
pub mod controller;
pub mod event;
pub mod games;
pub mod path;
pub mod phase;
pub mod scoring;
pub mod steps;
pub mod timer;

pub use controller::{ControllerSignal, GameController, GameView, MiniGame};
pub use event::GameEvent;
pub use games::{Direction, FieldView, GameAction, GameKind};
pub use path::{PathKind, PathProgress, PathScreen, PathSequencer, PathSignal, PathView};
pub use phase::{AttemptState, Phase, PhaseTimings};
pub use scoring::{Thresholds, Verdict};
pub use steps::{JourneyView, PathChoice, Step, StepSequencer};
pub use timer::{Fired, Scheduler, TimerId, TimerPurpose, TimerTag};
