//! Cues emitted by the simulation for the sound and render layers
//!
//! The sim never plays sounds itself. It pushes events and the platform
//! drains them once per frame.

use serde::{Deserialize, Serialize};

use super::phase::Phase;

/// A presentation cue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    PhaseChanged(Phase),
    /// Memory: a card was turned face up
    CardFlipped { card: u32 },
    PairMatched,
    Mismatch,
    BalloonPopped { id: u32 },
    /// Board race: `computer` is false for the player's roll
    DiceRolled { value: u8, computer: bool },
    SnakeBite { from: u8, to: u8 },
    LadderClimb { from: u8, to: u8 },
    /// Three sixes in a row
    TripleSix { computer: bool },
    AnswerCorrect,
    AnswerWrong,
    QuestionTimedOut,
    /// Maze: the player walked into a closed gate
    GateQuestion { gate: usize },
    GateOpened { gate: usize },
    GuardCaught,
    LifeLost { lives_left: u8 },
    FinishReached,
    Won,
    Retry,
    /// A journey was picked on the reveal step
    PathSelected,
    /// Burst of confetti over the whole screen
    Confetti,
    /// Final step fanfare
    Celebrate,
}
