//! Game balance knobs
//!
//! Everything here has a default matching the shipped game. A host can
//! override any subset with a JSON document; missing keys keep their
//! defaults.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::TuningError;
use crate::sim::phase::PhaseTimings;
use crate::sim::scoring::Thresholds;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameTuning {
    pub memory: PhaseTimings,
    /// All cards are shown face-up for this long at the start of play
    pub memory_preview_secs: u32,
    pub balloon: PhaseTimings,
    pub quiz: PhaseTimings,
    pub quiz_question_secs: u32,
    pub board: PhaseTimings,
    /// Chance that the computer keeps a ladder it would land on
    pub computer_ladder_chance: f64,
    pub maze: PhaseTimings,
    pub thresholds: Thresholds,
}

impl Default for GameTuning {
    fn default() -> Self {
        Self {
            memory: PhaseTimings::standard(Some(MEMORY_PLAY_SECS), MEMORY_WIN_SECS),
            memory_preview_secs: MEMORY_PREVIEW_SECS,
            balloon: PhaseTimings::standard(Some(BALLOON_PLAY_SECS), BALLOON_WIN_SECS),
            quiz: PhaseTimings::standard(None, QUIZ_WIN_SECS),
            quiz_question_secs: QUIZ_QUESTION_SECS,
            board: PhaseTimings::standard(Some(BOARD_PLAY_SECS), BOARD_WIN_SECS),
            computer_ladder_chance: COMPUTER_LADDER_CHANCE,
            maze: PhaseTimings::standard(Some(MAZE_PLAY_SECS), MAZE_WIN_SECS),
            thresholds: Thresholds::default(),
        }
    }
}

impl GameTuning {
    /// Parse and validate a (possibly partial) tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!("Loaded custom tuning");
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        for (game, timings) in [
            ("memory", &self.memory),
            ("balloon", &self.balloon),
            ("quiz", &self.quiz),
            ("board", &self.board),
            ("maze", &self.maze),
        ] {
            check_timings(game, timings)?;
        }
        if self.memory_preview_secs == 0 {
            return Err(TuningError::ZeroDuration {
                game: "memory",
                phase: "preview",
            });
        }
        if self.quiz_question_secs == 0 {
            return Err(TuningError::ZeroDuration {
                game: "quiz",
                phase: "question",
            });
        }
        if !(0.0..=1.0).contains(&self.computer_ladder_chance) {
            return Err(TuningError::InvalidChance(self.computer_ladder_chance));
        }

        let t = &self.thresholds;
        let pairs = MEMORY_PAIRS as u32;
        let questions = QUIZ_QUESTIONS_PER_ATTEMPT as u32;
        for (name, value, max) in [
            ("memory_pairs", t.memory_pairs, pairs),
            ("memory_points", t.memory_points, pairs * MEMORY_POINTS_PER_PAIR),
            ("balloons_popped", t.balloons_popped, BALLOON_COUNT as u32),
            ("quiz_correct", t.quiz_correct, questions),
            ("quiz_points", t.quiz_points, questions * QUIZ_POINTS_PER_CORRECT),
        ] {
            if value > max {
                return Err(TuningError::UnreachableThreshold { name, value, max });
            }
        }
        Ok(())
    }
}

fn check_timings(game: &'static str, timings: &PhaseTimings) -> Result<(), TuningError> {
    let zero = |phase| Err(TuningError::ZeroDuration { game, phase });
    if timings.rules_secs == 0 {
        return zero("rules");
    }
    if timings.countdown_secs == 0 {
        return zero("countdown");
    }
    if timings.play_secs == Some(0) {
        return zero("play");
    }
    if timings.win_secs == 0 {
        return zero("win");
    }
    if timings.retry_secs == 0 {
        return zero("retry");
    }
    Ok(())
}
