//! Scripted player for headless runs
//!
//! Reads the same views the browser renders and picks one action per call.
//! It is allowed to peek at answers, so it wins everything except the board
//! race, which stays down to the dice.

use std::collections::{BTreeMap, VecDeque};

use glam::IVec2;

use crate::sim::content::questions::Expected;
use crate::sim::content::{Answer, Tile};
use crate::sim::games::board::Turn;
use crate::sim::games::{BalloonView, BoardView, MazeView, MemoryView, QuizView};
use crate::sim::{
    Direction, FieldView, GameAction, GameKind, GameView, PathChoice, PathScreen, Phase, Step, StepSequencer,
};

#[derive(Debug, Default)]
pub struct Autopilot {
    /// (game, attempt) the memory below belongs to
    round: Option<(GameKind, u32)>,
    /// Card id to symbol, learned while cards were face up
    seen: BTreeMap<u32, char>,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next action for the game on screen, if one makes sense right now
    pub fn next_action(&mut self, game: &GameView) -> Option<GameAction> {
        if game.phase != Phase::Playing {
            return None;
        }
        if self.round != Some((game.kind, game.attempt)) {
            self.round = Some((game.kind, game.attempt));
            self.seen.clear();
        }

        match game.field.as_ref()? {
            FieldView::Board(view) => board(view),
            FieldView::Memory(view) => self.memory(view),
            FieldView::Quiz(view) => quiz(view),
            FieldView::Balloons(view) => balloons(view),
            FieldView::Maze(view) => maze(view),
        }
    }

    /// Make one move through the whole journey. Returns false once the
    /// final celebration has been triggered.
    pub fn steer(&mut self, journey: &mut StepSequencer, choice: PathChoice) -> bool {
        if let Some(path) = journey.path() {
            match path.screen() {
                PathScreen::Welcome => {
                    journey.start_path();
                }
                PathScreen::Celebration => {
                    journey.finish_path();
                }
                PathScreen::Game(_) => {
                    let action = path.game().and_then(|game| self.next_action(&game.view()));
                    if let Some(action) = action {
                        journey.act(action);
                    }
                }
            }
            return true;
        }

        match journey.step() {
            Step::SurpriseReveal => {
                if journey.selected_path().is_none() {
                    journey.select_path(choice);
                }
                true
            }
            Step::FinalCelebration => {
                journey.celebrate();
                false
            }
            Step::Welcome | Step::BirthdayGame | Step::MemoryLane => {
                journey.next();
                true
            }
        }
    }

    fn memory(&mut self, view: &MemoryView) -> Option<GameAction> {
        for card in &view.cards {
            if let Some(symbol) = card.symbol {
                self.seen.insert(card.id, symbol);
            }
        }
        if view.preview_secs_left > 0 {
            return None;
        }

        let face_up: Vec<u32> = view
            .cards
            .iter()
            .filter(|c| c.symbol.is_some() && !c.matched)
            .map(|c| c.id)
            .collect();
        let hidden = || view.cards.iter().filter(|c| c.symbol.is_none() && !c.matched);

        // Finish an open pair
        if let [open] = face_up.as_slice() {
            let symbol = self.seen.get(open)?;
            let partner = hidden().find(|c| self.seen.get(&c.id) == Some(symbol));
            return partner.or_else(|| hidden().next()).map(|c| GameAction::FlipCard(c.id));
        }

        // Start a known pair, or explore
        let target = hidden()
            .find(|c| {
                self.seen.get(&c.id).is_some_and(|symbol| {
                    hidden().any(|other| other.id != c.id && self.seen.get(&other.id) == Some(symbol))
                })
            })
            .or_else(|| hidden().find(|c| !self.seen.contains_key(&c.id)))
            .or_else(|| hidden().next())?;
        Some(GameAction::FlipCard(target.id))
    }
}

fn board(view: &BoardView) -> Option<GameAction> {
    (view.turn == Turn::Player).then_some(GameAction::RollDice)
}

fn quiz(view: &QuizView) -> Option<GameAction> {
    let question = view.question.as_ref()?;
    let answer = match question.expected {
        Expected::Single(i) => Answer::Single(i),
        Expected::Multiple(set) => Answer::Multiple(set.to_vec()),
        Expected::Text(text) => Answer::Text(text.to_string()),
    };
    Some(GameAction::SubmitAnswer(answer))
}

fn balloons(view: &BalloonView) -> Option<GameAction> {
    view.balloons
        .iter()
        .find(|b| !b.popped)
        .map(|b| GameAction::PopBalloon(b.id))
}

const DIRECTIONS: [Direction; 4] = [Direction::Up, Direction::Right, Direction::Down, Direction::Left];

fn maze(view: &MazeView) -> Option<GameAction> {
    if let Some(gate) = &view.question {
        return Some(GameAction::AnswerGate(gate.correct));
    }
    first_step(view, true)
        .or_else(|| first_step(view, false))
        .map(GameAction::MovePlayer)
}

/// Breadth-first search to the finish; returns the first move
fn first_step(view: &MazeView, avoid_guards: bool) -> Option<Direction> {
    let walkable = |p: IVec2| {
        let row = usize::try_from(p.y).ok().and_then(|y| view.tiles.get(y));
        let tile = row.and_then(|r| usize::try_from(p.x).ok().and_then(|x| r.get(x)));
        matches!(tile, Some(Tile::Open | Tile::Gate | Tile::Finish))
            && !(avoid_guards && view.guards.contains(&p))
    };

    let mut first: BTreeMap<(i32, i32), Direction> = BTreeMap::new();
    let mut queue = VecDeque::new();
    for dir in DIRECTIONS {
        let next = view.player + dir.delta();
        if walkable(next) && first.insert((next.x, next.y), dir).is_none() {
            queue.push_back(next);
        }
    }

    while let Some(cell) = queue.pop_front() {
        let dir = first.get(&(cell.x, cell.y)).copied()?;
        if cell == view.finish {
            return Some(dir);
        }
        for step in DIRECTIONS {
            let next = cell + step.delta();
            if next != view.player && walkable(next) && !first.contains_key(&(next.x, next.y)) {
                first.insert((next.x, next.y), dir);
                queue.push_back(next);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::content::maze::{self, FINISH, START};
    use crate::sim::games::memory::CardView;

    fn playing(kind: GameKind, field: FieldView) -> GameView {
        GameView {
            kind,
            title: kind.title(),
            phase: Phase::Playing,
            attempt: 1,
            seconds_left: 10,
            clock: "0:10".into(),
            rules: &[],
            verdict: None,
            field: Some(field),
        }
    }

    fn memory_view(cards: &[(u32, Option<char>)], preview: u32) -> FieldView {
        FieldView::Memory(MemoryView {
            cards: cards
                .iter()
                .map(|&(id, symbol)| CardView {
                    id,
                    symbol,
                    matched: false,
                })
                .collect(),
            preview_secs_left: preview,
            matches: 0,
            points: 0,
            extra_shuffles: 0,
        })
    }

    #[test]
    fn test_idle_outside_play() {
        let mut pilot = Autopilot::new();
        let mut view = playing(GameKind::MemoryMatch, memory_view(&[], 0));
        view.phase = Phase::Rules;
        assert_eq!(pilot.next_action(&view), None);
    }

    #[test]
    fn test_memory_uses_preview() {
        let mut pilot = Autopilot::new();
        let preview = memory_view(&[(0, Some('a')), (1, Some('b')), (2, Some('a')), (3, Some('b'))], 3);
        assert_eq!(pilot.next_action(&playing(GameKind::MemoryMatch, preview)), None);

        let hidden = memory_view(&[(0, None), (1, None), (2, None), (3, None)], 0);
        assert_eq!(
            pilot.next_action(&playing(GameKind::MemoryMatch, hidden)),
            Some(GameAction::FlipCard(0))
        );
        let one_open = memory_view(&[(0, Some('a')), (1, None), (2, None), (3, None)], 0);
        assert_eq!(
            pilot.next_action(&playing(GameKind::MemoryMatch, one_open)),
            Some(GameAction::FlipCard(2))
        );
    }

    #[test]
    fn test_maze_route_reaches_finish() {
        let mut view = MazeView {
            tiles: maze::tiles(),
            player: START,
            finish: FINISH,
            guards: Vec::new(),
            gates: Vec::new(),
            lives: 3,
            score: 0,
            question: None,
        };
        for _ in 0..200 {
            if view.player == FINISH {
                break;
            }
            let Some(GameAction::MovePlayer(dir)) = maze(&view) else {
                panic!("no route from {}", view.player);
            };
            let next = view.player + dir.delta();
            assert_ne!(maze::tile_at(next), Tile::Wall);
            view.player = next;
        }
        assert_eq!(view.player, FINISH);
    }
}
