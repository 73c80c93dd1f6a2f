//! Mini-game rule sets
//!
//! Each game supplies the parts that differ between games (content, the
//! play-phase action handler, optional sub-timer, scoring) and the shared
//! [`GameController`](super::controller::GameController) runs the lifecycle.

pub mod balloon;
pub mod board;
pub mod maze;
pub mod memory;
pub mod quiz;

use std::fmt;

use glam::IVec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::content::Answer;
use super::event::GameEvent;
use super::phase::PhaseTimings;
use super::scoring::Verdict;

pub use balloon::{BalloonPop, BalloonView};
pub use board::{BoardRace, BoardView};
pub use maze::{LoveMaze, MazeView};
pub use memory::{MemoryMatch, MemoryView};
pub use quiz::{Quiz, QuizView};

/// Every mini-game in the journey
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameKind {
    BoardRace,
    MemoryMatch,
    FriendshipQuiz,
    RomanceQuiz,
    BalloonPop,
    LoveMaze,
}

impl GameKind {
    pub fn title(&self) -> &'static str {
        match self {
            GameKind::BoardRace => "Royal Snakes & Ladders",
            GameKind::MemoryMatch => "Memory Match",
            GameKind::FriendshipQuiz => "Friendship Quiz",
            GameKind::RomanceQuiz => "Romance Quiz",
            GameKind::BalloonPop => "Bonus Balloon Pop",
            GameKind::LoveMaze => "Love Maze",
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Grid direction for maze movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(&self) -> IVec2 {
        match self {
            Direction::Up => IVec2::NEG_Y,
            Direction::Down => IVec2::Y,
            Direction::Left => IVec2::NEG_X,
            Direction::Right => IVec2::X,
        }
    }
}

/// A player input. Actions that make no sense for the mounted game are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameAction {
    RollDice,
    FlipCard(u32),
    SubmitAnswer(Answer),
    PopBalloon(u32),
    MovePlayer(Direction),
    AnswerGate(usize),
}

/// Whether play continues after an action or sub-tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Play continues with the sub-timer restarted from now
    RestartSubTick,
    /// The game's own completion condition was met; evaluate now
    Finished,
}

/// Play-phase state handed to a rule set
pub struct Play<'a, R: Rules + ?Sized> {
    pub content: &'a R::Content,
    pub field: &'a mut R::Field,
    pub progress: &'a mut R::Progress,
    pub rng: &'a mut Pcg32,
    pub events: &'a mut Vec<GameEvent>,
}

/// Renderable play field, one variant per game
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "game")]
pub enum FieldView {
    Memory(MemoryView),
    Balloons(BalloonView),
    Quiz(QuizView),
    Board(BoardView),
    Maze(MazeView),
}

/// Game-specific half of a mini-game
pub trait Rules {
    /// Generated once per attempt, read-only during play
    type Content;
    /// Mutable play field built from the content
    type Field;
    /// Counters the verdict is computed from
    type Progress: Default;

    fn kind(&self) -> GameKind;

    fn timings(&self) -> PhaseTimings;

    /// Lines shown on the rules screen
    fn rules_text(&self) -> &'static [&'static str];

    fn generate(&mut self, attempt: u32, rng: &mut Pcg32) -> Self::Content;

    fn setup(&self, content: &Self::Content) -> Self::Field;

    fn act(&mut self, play: Play<'_, Self>, action: &GameAction) -> Flow;

    /// Interval of the play-phase sub-timer, if the game has one
    fn sub_tick_ms(&self) -> Option<u64> {
        None
    }

    fn sub_tick(&mut self, _play: Play<'_, Self>) -> Flow {
        Flow::Continue
    }

    /// False while the play clock is paused (memory preview, maze gate question)
    fn clock_running(&self, _field: &Self::Field) -> bool {
        true
    }

    /// Seconds to show while playing when the game has no play budget
    fn play_clock(&self, _field: &Self::Field) -> Option<u32> {
        None
    }

    fn passed(&self, progress: &Self::Progress) -> bool;

    /// Called once per attempt after the verdict is known
    fn evaluated(&mut self, _content: &Self::Content, _field: &Self::Field, _verdict: Verdict) {}

    fn field_view(
        &self,
        content: &Self::Content,
        field: &Self::Field,
        progress: &Self::Progress,
    ) -> FieldView;
}

/// Drives a rule set directly, without the lifecycle controller
#[cfg(test)]
pub(crate) struct Harness<R: Rules> {
    pub rules: R,
    pub content: R::Content,
    pub field: R::Field,
    pub progress: R::Progress,
    pub rng: Pcg32,
    pub events: Vec<GameEvent>,
}

#[cfg(test)]
impl<R: Rules> Harness<R> {
    pub fn new(mut rules: R, seed: u64, attempt: u32) -> Self {
        use rand::SeedableRng;
        let mut rng = Pcg32::seed_from_u64(seed);
        let content = rules.generate(attempt, &mut rng);
        let field = rules.setup(&content);
        Self {
            rules,
            content,
            field,
            progress: R::Progress::default(),
            rng,
            events: Vec::new(),
        }
    }

    pub fn act(&mut self, action: GameAction) -> Flow {
        let play = Play {
            content: &self.content,
            field: &mut self.field,
            progress: &mut self.progress,
            rng: &mut self.rng,
            events: &mut self.events,
        };
        self.rules.act(play, &action)
    }

    pub fn tick(&mut self) -> Flow {
        let play = Play {
            content: &self.content,
            field: &mut self.field,
            progress: &mut self.progress,
            rng: &mut self.rng,
            events: &mut self.events,
        };
        self.rules.sub_tick(play)
    }
}

/// Minimal rule set for lifecycle tests: each roll scores a point, two
/// points pass, a pop ends play
#[cfg(test)]
pub(crate) struct Tally {
    pub kind: GameKind,
    pub play_secs: Option<u32>,
    /// Attempt numbers content was generated for
    pub generated: Vec<u32>,
}

#[cfg(test)]
impl Tally {
    pub fn new(play_secs: Option<u32>) -> Self {
        Self {
            kind: GameKind::BalloonPop,
            play_secs,
            generated: Vec::new(),
        }
    }

    pub fn of(kind: GameKind) -> Self {
        Self {
            kind,
            ..Self::new(None)
        }
    }
}

#[cfg(test)]
impl Rules for Tally {
    type Content = u32;
    type Field = ();
    type Progress = u32;

    fn kind(&self) -> GameKind {
        self.kind
    }

    fn timings(&self) -> PhaseTimings {
        PhaseTimings::standard(self.play_secs, 2)
    }

    fn rules_text(&self) -> &'static [&'static str] {
        &["tally"]
    }

    fn generate(&mut self, attempt: u32, _rng: &mut Pcg32) -> u32 {
        self.generated.push(attempt);
        attempt
    }

    fn setup(&self, _content: &u32) {}

    fn act(&mut self, play: Play<'_, Self>, action: &GameAction) -> Flow {
        match action {
            GameAction::RollDice => {
                *play.progress += 1;
                Flow::Continue
            }
            GameAction::PopBalloon(_) => Flow::Finished,
            _ => Flow::Continue,
        }
    }

    fn passed(&self, progress: &u32) -> bool {
        *progress >= 2
    }

    fn field_view(&self, _content: &u32, _field: &(), progress: &u32) -> FieldView {
        FieldView::Board(BoardView {
            player: *progress as u8,
            computer: 1,
            turn: board::Turn::Player,
            last_roll: None,
            player_sixes: 0,
            message: "",
            snakes: &[],
            ladders: &[],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_deltas_are_unit() {
        for dir in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
            let d = dir.delta();
            assert_eq!(d.x.abs() + d.y.abs(), 1);
        }
        assert_eq!(Direction::Up.delta(), IVec2::new(0, -1));
    }

    #[test]
    fn test_action_json_shape() {
        let action = GameAction::SubmitAnswer(Answer::Multiple(vec![0, 2]));
        let json = serde_json::to_string(&action).unwrap();
        assert_eq!(json, r#"{"SubmitAnswer":{"Multiple":[0,2]}}"#);
        let back: GameAction = serde_json::from_str(r#"{"MovePlayer":"Left"}"#).unwrap();
        assert_eq!(back, GameAction::MovePlayer(Direction::Left));
    }
}
