//! Royal snakes & ladders: race the computer to tile 100

use rand::Rng;
use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::{FieldView, Flow, GameAction, GameKind, Play, Rules};
use crate::consts::BOARD_GOAL;
use crate::sim::event::GameEvent;
use crate::sim::phase::PhaseTimings;
use crate::sim::scoring::{Evaluate, RaceProgress, Thresholds};
use crate::tuning::GameTuning;

/// Snake head -> tail
pub const SNAKES: [(u8, u8); 10] = [
    (16, 6),
    (47, 26),
    (49, 11),
    (56, 53),
    (62, 19),
    (64, 60),
    (87, 24),
    (93, 73),
    (95, 75),
    (98, 78),
];

/// Ladder foot -> top
pub const LADDERS: [(u8, u8); 8] = [
    (4, 14),
    (9, 21),
    (21, 42),
    (28, 84),
    (36, 44),
    (51, 67),
    (71, 91),
    (80, 100),
];

const RULES: &[&str] = &[
    "Race the computer from tile 1 to tile 100.",
    "Roll the dice to move. A 6 gives you another roll.",
    "Three 6s in a row sends you back to the start and ends your turn!",
    "Ladders carry you up, snakes bring you down.",
    "Reach 100 first, or be ahead when the 7 minutes run out, to win.",
];

fn snake_at(tile: u8) -> Option<u8> {
    SNAKES.iter().find(|(head, _)| *head == tile).map(|(_, tail)| *tail)
}

fn ladder_at(tile: u8) -> Option<u8> {
    LADDERS.iter().find(|(foot, _)| *foot == tile).map(|(_, top)| *top)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Turn {
    Player,
    Computer,
}

#[derive(Debug, Clone)]
pub struct BoardField {
    pub turn: Turn,
    pub player_sixes: u8,
    pub computer_sixes: u8,
    pub last_roll: Option<u8>,
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardView {
    pub player: u8,
    pub computer: u8,
    pub turn: Turn,
    pub last_roll: Option<u8>,
    pub player_sixes: u8,
    pub message: &'static str,
    pub snakes: &'static [(u8, u8)],
    pub ladders: &'static [(u8, u8)],
}

/// What happens after a move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    /// Rolled a 6, same side rolls again
    Again,
    EndTurn,
    Reached,
}

/// Follow a snake or ladder from `tile`
fn slide(tile: u8, computer: bool, events: &mut Vec<GameEvent>) -> u8 {
    if let Some(tail) = snake_at(tile) {
        events.push(GameEvent::SnakeBite { from: tile, to: tail });
        tail
    } else if let Some(top) = ladder_at(tile) {
        log::debug!("Ladder {tile} -> {top} (computer: {computer})");
        events.push(GameEvent::LadderClimb { from: tile, to: top });
        top
    } else {
        tile
    }
}

/// Apply a roll that lands on `target`. Returns the new position.
fn resolve_move(
    target: u8,
    roll: u8,
    sixes: &mut u8,
    computer: bool,
    events: &mut Vec<GameEvent>,
) -> (u8, Outcome) {
    if roll == 6 {
        *sixes += 1;
        if *sixes >= 3 {
            *sixes = 0;
            events.push(GameEvent::TripleSix { computer });
            return (1, Outcome::EndTurn);
        }
    } else {
        *sixes = 0;
    }

    let landed = slide(target, computer, events);
    if landed >= BOARD_GOAL {
        return (BOARD_GOAL, Outcome::Reached);
    }
    let outcome = if roll == 6 { Outcome::Again } else { Outcome::EndTurn };
    (landed, outcome)
}

/// Where the computer's roll lands. It only keeps a ladder landing with
/// probability `ladder_chance`; otherwise it shifts to a nearby non-ladder
/// tile that is still ahead.
fn computer_target(from: u8, roll: u8, ladder_chance: f64, rng: &mut impl Rng) -> u8 {
    let target = (from + roll).min(BOARD_GOAL);
    if ladder_at(target).is_none() || rng.random::<f64>() < ladder_chance {
        return target;
    }

    let alternatives: Vec<u8> = (-2i16..=2)
        .filter(|&offset| offset != 0)
        .map(|offset| target as i16 + offset)
        .filter(|&alt| alt > from as i16 && alt <= BOARD_GOAL as i16)
        .map(|alt| alt as u8)
        .filter(|&alt| ladder_at(alt).is_none())
        .collect();
    alternatives.choose(rng).copied().unwrap_or(target)
}

fn roll_die(rng: &mut impl Rng) -> u8 {
    rng.random_range(1..=6)
}

#[derive(Debug, Clone)]
pub struct BoardRace {
    timings: PhaseTimings,
    thresholds: Thresholds,
    ladder_chance: f64,
}

impl BoardRace {
    pub fn new(tuning: &GameTuning) -> Self {
        Self {
            timings: tuning.board,
            thresholds: tuning.thresholds,
            ladder_chance: tuning.computer_ladder_chance,
        }
    }
}

impl Default for BoardRace {
    fn default() -> Self {
        Self::new(&GameTuning::default())
    }
}

impl Rules for BoardRace {
    /// The board itself is fixed
    type Content = ();
    type Field = BoardField;
    type Progress = RaceProgress;

    fn kind(&self) -> GameKind {
        GameKind::BoardRace
    }

    fn timings(&self) -> PhaseTimings {
        self.timings
    }

    fn rules_text(&self) -> &'static [&'static str] {
        RULES
    }

    fn generate(&mut self, _attempt: u32, _rng: &mut Pcg32) {}

    fn setup(&self, _content: &()) -> BoardField {
        BoardField {
            turn: Turn::Player,
            player_sixes: 0,
            computer_sixes: 0,
            last_roll: None,
            message: "Your turn! Roll the dice",
        }
    }

    fn act(&mut self, play: Play<'_, Self>, action: &GameAction) -> Flow {
        if *action != GameAction::RollDice || play.field.turn != Turn::Player {
            return Flow::Continue;
        }

        let roll = roll_die(play.rng);
        play.events.push(GameEvent::DiceRolled { value: roll, computer: false });
        play.field.last_roll = Some(roll);

        let target = (play.progress.player + roll).min(BOARD_GOAL);
        let (pos, outcome) = resolve_move(target, roll, &mut play.field.player_sixes, false, play.events);
        play.progress.player = pos;

        match outcome {
            Outcome::Reached => {
                play.field.message = "You won the race!";
                Flow::Finished
            }
            Outcome::Again => {
                play.field.message = "You got a 6! Roll again";
                Flow::Continue
            }
            Outcome::EndTurn => {
                play.field.turn = Turn::Computer;
                play.field.message = if pos == 1 && roll == 6 {
                    "Three 6s! Back to start!"
                } else {
                    "Computer's turn"
                };
                Flow::Continue
            }
        }
    }

    fn sub_tick_ms(&self) -> Option<u64> {
        Some(1000)
    }

    /// The computer takes one roll per sub-tick
    fn sub_tick(&mut self, play: Play<'_, Self>) -> Flow {
        if play.field.turn != Turn::Computer {
            return Flow::Continue;
        }

        let from = play.progress.computer;
        let roll = roll_die(play.rng);
        play.events.push(GameEvent::DiceRolled { value: roll, computer: true });
        play.field.last_roll = Some(roll);

        let target = computer_target(from, roll, self.ladder_chance, play.rng);
        let (pos, outcome) = resolve_move(target, roll, &mut play.field.computer_sixes, true, play.events);
        play.progress.computer = pos;

        match outcome {
            Outcome::Reached => {
                play.field.message = "Computer won! Try again!";
                Flow::Finished
            }
            Outcome::Again => Flow::Continue,
            Outcome::EndTurn => {
                play.field.turn = Turn::Player;
                play.field.message = "Your turn! Roll the dice";
                Flow::Continue
            }
        }
    }

    fn passed(&self, progress: &RaceProgress) -> bool {
        progress.passes(&self.thresholds)
    }

    fn field_view(&self, _content: &(), field: &BoardField, progress: &RaceProgress) -> FieldView {
        FieldView::Board(BoardView {
            player: progress.player,
            computer: progress.computer,
            turn: field.turn,
            last_roll: field.last_roll,
            player_sixes: field.player_sixes,
            message: field.message,
            snakes: &SNAKES,
            ladders: &LADDERS,
        })
    }
}
