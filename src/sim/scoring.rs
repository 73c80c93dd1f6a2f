//! Scoring evaluator
//!
//! Each mini-game keeps a small progress record. When play ends the record is
//! checked once against a fixed inclusive threshold to decide between a win
//! and a retry. Records are always read after the triggering action has been
//! applied.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Outcome of an evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Won,
    Retry,
}

impl From<bool> for Verdict {
    fn from(passed: bool) -> Self {
        if passed { Verdict::Won } else { Verdict::Retry }
    }
}

/// Pass marks for every mini-game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub memory_points: u32,
    pub memory_pairs: u32,
    pub balloons_popped: u32,
    pub quiz_correct: u32,
    pub quiz_points: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            memory_points: 20,
            memory_pairs: 4,
            balloons_popped: 10,
            quiz_correct: 3,
            quiz_points: 30,
        }
    }
}

/// A progress record that can be scored
pub trait Evaluate {
    fn passes(&self, thresholds: &Thresholds) -> bool;

    fn verdict(&self, thresholds: &Thresholds) -> Verdict {
        self.passes(thresholds).into()
    }
}

/// Memory match: pairs found and points (5 per pair)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchProgress {
    pub matches: u32,
    pub points: u32,
}

impl MatchProgress {
    pub fn record_pair(&mut self) {
        self.matches += 1;
        self.points += MEMORY_POINTS_PER_PAIR;
    }
}

impl Evaluate for MatchProgress {
    fn passes(&self, t: &Thresholds) -> bool {
        self.points >= t.memory_points || self.matches >= t.memory_pairs
    }
}

/// Balloon pop: balloons popped and score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopProgress {
    pub popped: u32,
    pub score: u32,
}

impl Evaluate for PopProgress {
    fn passes(&self, t: &Thresholds) -> bool {
        self.popped >= t.balloons_popped
    }
}

/// Quiz: questions attempted, answered correctly and points (10 per correct)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizProgress {
    pub attempted: u32,
    pub correct: u32,
    pub points: u32,
}

impl QuizProgress {
    pub fn record(&mut self, correct: bool) {
        self.attempted += 1;
        if correct {
            self.correct += 1;
            self.points += QUIZ_POINTS_PER_CORRECT;
        }
    }

    pub fn all_attempted(&self) -> bool {
        self.attempted as usize >= QUIZ_QUESTIONS_PER_ATTEMPT
    }
}

impl Evaluate for QuizProgress {
    fn passes(&self, t: &Thresholds) -> bool {
        self.all_attempted() && (self.correct >= t.quiz_correct || self.points >= t.quiz_points)
    }
}

/// Board race: token positions (both start on tile 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceProgress {
    pub player: u8,
    pub computer: u8,
}

impl Default for RaceProgress {
    fn default() -> Self {
        Self {
            player: 1,
            computer: 1,
        }
    }
}

impl Evaluate for RaceProgress {
    /// Reaching the goal wins outright; otherwise only a strict lead counts.
    /// A tie or a deficit when time runs out is a retry.
    fn passes(&self, _t: &Thresholds) -> bool {
        self.player >= BOARD_GOAL || (self.computer < BOARD_GOAL && self.player > self.computer)
    }
}

/// Love maze: remaining lives and whether the finish was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeProgress {
    pub lives: u8,
    pub reached_finish: bool,
    pub score: u32,
}

impl Default for MazeProgress {
    fn default() -> Self {
        Self {
            lives: MAZE_LIVES,
            reached_finish: false,
            score: 0,
        }
    }
}

impl Evaluate for MazeProgress {
    fn passes(&self, _t: &Thresholds) -> bool {
        self.reached_finish && self.lives > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_four_pairs_wins() {
        let mut p = MatchProgress::default();
        for _ in 0..4 {
            p.record_pair();
        }
        assert_eq!(p.points, 20);
        assert_eq!(p.verdict(&Thresholds::default()), Verdict::Won);
    }

    #[test]
    fn test_memory_three_pairs_retries() {
        let p = MatchProgress {
            matches: 3,
            points: 15,
        };
        assert_eq!(p.verdict(&Thresholds::default()), Verdict::Retry);
    }

    #[test]
    fn test_balloon_threshold_inclusive() {
        let t = Thresholds::default();
        let at = PopProgress {
            popped: 10,
            score: 10,
        };
        let below = PopProgress {
            popped: 9,
            score: 9,
        };
        assert_eq!(at.verdict(&t), Verdict::Won);
        assert_eq!(below.verdict(&t), Verdict::Retry);
    }

    #[test]
    fn test_quiz_points_or_correct() {
        let t = Thresholds::default();
        let by_points = QuizProgress {
            attempted: 5,
            correct: 2,
            points: 30,
        };
        assert_eq!(by_points.verdict(&t), Verdict::Won);

        let mut by_answers = QuizProgress::default();
        for correct in [true, false, true, false, true] {
            by_answers.record(correct);
        }
        assert_eq!(by_answers.verdict(&t), Verdict::Won);

        let short = QuizProgress {
            attempted: 5,
            correct: 2,
            points: 20,
        };
        assert_eq!(short.verdict(&t), Verdict::Retry);
    }

    #[test]
    fn test_quiz_requires_all_attempted() {
        let p = QuizProgress {
            attempted: 4,
            correct: 4,
            points: 40,
        };
        assert_eq!(p.verdict(&Thresholds::default()), Verdict::Retry);
    }

    #[test]
    fn test_below_threshold_always_retries() {
        let t = Thresholds::default();
        let p = PopProgress {
            popped: 7,
            score: 7,
        };
        for _ in 0..10 {
            assert_eq!(p.verdict(&t), Verdict::Retry);
        }
    }

    #[test]
    fn test_race_verdicts() {
        let t = Thresholds::default();
        let goal = RaceProgress {
            player: 100,
            computer: 99,
        };
        let ahead = RaceProgress {
            player: 60,
            computer: 40,
        };
        let tied = RaceProgress {
            player: 40,
            computer: 40,
        };
        let behind = RaceProgress {
            player: 30,
            computer: 40,
        };
        let lost = RaceProgress {
            player: 90,
            computer: 100,
        };
        assert_eq!(goal.verdict(&t), Verdict::Won);
        assert_eq!(ahead.verdict(&t), Verdict::Won);
        assert_eq!(tied.verdict(&t), Verdict::Retry);
        assert_eq!(behind.verdict(&t), Verdict::Retry);
        assert_eq!(lost.verdict(&t), Verdict::Retry);
    }

    #[test]
    fn test_maze_needs_finish_and_lives() {
        let t = Thresholds::default();
        let mut p = MazeProgress::default();
        assert_eq!(p.verdict(&t), Verdict::Retry);
        p.reached_finish = true;
        assert_eq!(p.verdict(&t), Verdict::Won);
        p.lives = 0;
        assert_eq!(p.verdict(&t), Verdict::Retry);
    }
}
