//! Love maze: reach the finish past the guards and locked gates

use glam::IVec2;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::{FieldView, Flow, GameAction, GameKind, Play, Rules};
use crate::consts::MAZE_FINISH_SCORE;
use crate::sim::content::maze::{self, FINISH, GATES, GateSpec, START};
use crate::sim::content::{Guard, Tile, spawn_guards};
use crate::sim::event::GameEvent;
use crate::sim::phase::PhaseTimings;
use crate::sim::scoring::{Evaluate, MazeProgress, Thresholds};
use crate::tuning::GameTuning;

const RULES: &[&str] = &[
    "Guide your heart from the start to the finish flag.",
    "Love guards patrol the corridors. Touching one costs a life.",
    "Locked gates ask a question. Answer right to open them, wrong costs a life.",
    "You have 3 lives and 5 minutes.",
];

#[derive(Debug, Clone)]
pub struct MazeField {
    pub player: IVec2,
    pub guards: Vec<Guard>,
    pub gates_open: [bool; GATES.len()],
    /// Gate whose question is on screen; play is frozen until answered
    pub pending_gate: Option<usize>,
}

impl MazeField {
    fn guard_on_player(&self) -> bool {
        self.guards.iter().any(|g| g.pos() == self.player)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GateView {
    pub pos: IVec2,
    pub open: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MazeView {
    pub tiles: Vec<Vec<Tile>>,
    pub player: IVec2,
    pub finish: IVec2,
    pub guards: Vec<IVec2>,
    pub gates: Vec<GateView>,
    pub lives: u8,
    pub score: u32,
    pub question: Option<GateSpec>,
}

/// Lose a life and go back to the start
fn lose_life(play: &mut Play<'_, LoveMaze>) -> Flow {
    play.progress.lives = play.progress.lives.saturating_sub(1);
    play.field.player = START;
    play.events.push(GameEvent::LifeLost {
        lives_left: play.progress.lives,
    });
    if play.progress.lives == 0 {
        Flow::Finished
    } else {
        Flow::Continue
    }
}

fn caught(play: &mut Play<'_, LoveMaze>) -> Flow {
    log::debug!("Caught by a guard at {}", play.field.player);
    play.events.push(GameEvent::GuardCaught);
    lose_life(play)
}

#[derive(Debug, Clone)]
pub struct LoveMaze {
    timings: PhaseTimings,
    thresholds: Thresholds,
}

impl LoveMaze {
    pub fn new(tuning: &GameTuning) -> Self {
        Self {
            timings: tuning.maze,
            thresholds: tuning.thresholds,
        }
    }

    fn step(&self, mut play: Play<'_, Self>, delta: IVec2) -> Flow {
        let next = play.field.player + delta;
        match maze::tile_at(next) {
            Tile::Wall => return Flow::Continue,
            Tile::Gate => {
                let Some(gate) = maze::gate_at(next) else {
                    return Flow::Continue;
                };
                if !play.field.gates_open[gate] {
                    play.field.pending_gate = Some(gate);
                    play.events.push(GameEvent::GateQuestion { gate });
                    return Flow::Continue;
                }
            }
            Tile::Open | Tile::Finish => {}
        }

        play.field.player = next;
        if next == FINISH {
            play.progress.reached_finish = true;
            play.progress.score = MAZE_FINISH_SCORE;
            play.events.push(GameEvent::FinishReached);
            return Flow::Finished;
        }
        if play.field.guard_on_player() {
            return caught(&mut play);
        }
        Flow::Continue
    }

    fn answer(&self, mut play: Play<'_, Self>, choice: usize) -> Flow {
        let Some(gate) = play.field.pending_gate.take() else {
            return Flow::Continue;
        };
        if GATES[gate].correct == choice {
            play.field.gates_open[gate] = true;
            play.events.push(GameEvent::GateOpened { gate });
            Flow::Continue
        } else {
            play.events.push(GameEvent::AnswerWrong);
            lose_life(&mut play)
        }
    }
}

impl Default for LoveMaze {
    fn default() -> Self {
        Self::new(&GameTuning::default())
    }
}

impl Rules for LoveMaze {
    /// Guard placement for the attempt
    type Content = Vec<Guard>;
    type Field = MazeField;
    type Progress = MazeProgress;

    fn kind(&self) -> GameKind {
        GameKind::LoveMaze
    }

    fn timings(&self) -> PhaseTimings {
        self.timings
    }

    fn rules_text(&self) -> &'static [&'static str] {
        RULES
    }

    fn generate(&mut self, _attempt: u32, rng: &mut Pcg32) -> Vec<Guard> {
        spawn_guards(rng)
    }

    fn setup(&self, content: &Vec<Guard>) -> MazeField {
        MazeField {
            player: START,
            guards: content.clone(),
            gates_open: [false; GATES.len()],
            pending_gate: None,
        }
    }

    fn act(&mut self, play: Play<'_, Self>, action: &GameAction) -> Flow {
        match *action {
            GameAction::MovePlayer(dir) if play.field.pending_gate.is_none() => self.step(play, dir.delta()),
            GameAction::AnswerGate(choice) => self.answer(play, choice),
            _ => Flow::Continue,
        }
    }

    fn sub_tick_ms(&self) -> Option<u64> {
        Some(1000)
    }

    /// Guards advance one patrol step
    fn sub_tick(&mut self, mut play: Play<'_, Self>) -> Flow {
        if play.field.pending_gate.is_some() {
            return Flow::Continue;
        }
        play.field.guards.iter_mut().for_each(Guard::advance);
        if play.field.guard_on_player() {
            return caught(&mut play);
        }
        Flow::Continue
    }

    fn clock_running(&self, field: &MazeField) -> bool {
        field.pending_gate.is_none()
    }

    fn passed(&self, progress: &MazeProgress) -> bool {
        progress.passes(&self.thresholds)
    }

    fn field_view(&self, _content: &Vec<Guard>, field: &MazeField, progress: &MazeProgress) -> FieldView {
        FieldView::Maze(MazeView {
            tiles: maze::tiles(),
            player: field.player,
            finish: FINISH,
            guards: field.guards.iter().map(Guard::pos).collect(),
            gates: GATES
                .iter()
                .zip(field.gates_open)
                .map(|(g, open)| GateView { pos: g.pos, open })
                .collect(),
            lives: progress.lives,
            score: progress.score,
            question: field.pending_gate.map(|g| GATES[g]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::MAZE_LIVES;
    use crate::sim::games::{Direction, Harness};

    /// A maze with no guards in the way
    fn quiet_harness() -> Harness<LoveMaze> {
        let mut h = Harness::new(LoveMaze::default(), 17, 1);
        h.field.guards.clear();
        h
    }

    fn walk(h: &mut Harness<LoveMaze>, path: &[(Direction, usize)]) -> Flow {
        let mut flow = Flow::Continue;
        for &(dir, n) in path {
            for _ in 0..n {
                flow = h.act(GameAction::MovePlayer(dir));
            }
        }
        flow
    }

    #[test]
    fn test_walls_block() {
        let mut h = quiet_harness();
        // (1,14) is the outer wall
        h.act(GameAction::MovePlayer(Direction::Down));
        assert_eq!(h.field.player, START);
    }

    #[test]
    fn test_closed_gate_asks_question_and_pauses() {
        let mut h = quiet_harness();
        h.field.player = IVec2::new(7, 10);
        h.act(GameAction::MovePlayer(Direction::Up));
        assert_eq!(h.field.player, IVec2::new(7, 10));
        assert_eq!(h.field.pending_gate, Some(1));
        assert!(!h.rules.clock_running(&h.field));

        // Movement is frozen until answered
        h.act(GameAction::MovePlayer(Direction::Down));
        assert_eq!(h.field.player, IVec2::new(7, 10));

        h.act(GameAction::AnswerGate(1));
        assert!(h.field.gates_open[1]);
        assert!(h.rules.clock_running(&h.field));
        h.act(GameAction::MovePlayer(Direction::Up));
        assert_eq!(h.field.player, IVec2::new(7, 9));
    }

    #[test]
    fn test_wrong_gate_answer_costs_life() {
        let mut h = quiet_harness();
        h.field.player = IVec2::new(7, 10);
        h.act(GameAction::MovePlayer(Direction::Up));
        h.act(GameAction::AnswerGate(0));
        assert_eq!(h.progress.lives, MAZE_LIVES - 1);
        assert_eq!(h.field.player, START);
        assert!(!h.field.gates_open[1]);
        assert_eq!(h.field.pending_gate, None);
    }

    #[test]
    fn test_guard_contact_resets_player() {
        let mut h = quiet_harness();
        h.field.player = IVec2::new(3, 3);
        h.field.guards.push(Guard {
            id: 1,
            patrol: vec![IVec2::new(5, 3), IVec2::new(4, 3)],
            step: 0,
        });
        let flow = h.tick();
        assert_eq!(flow, Flow::Continue);
        assert_eq!(h.field.player, IVec2::new(3, 3));

        // Walking into the guard
        h.act(GameAction::MovePlayer(Direction::Right));
        assert_eq!(h.field.player, START);
        assert_eq!(h.progress.lives, MAZE_LIVES - 1);
        assert!(h.events.contains(&GameEvent::GuardCaught));
    }

    #[test]
    fn test_last_life_finishes() {
        let mut h = quiet_harness();
        h.progress.lives = 1;
        h.field.player = IVec2::new(7, 10);
        h.act(GameAction::MovePlayer(Direction::Up));
        assert_eq!(h.act(GameAction::AnswerGate(3)), Flow::Finished);
        assert!(!h.rules.passed(&h.progress));
    }

    #[test]
    fn test_reaching_finish_wins() {
        let mut h = quiet_harness();
        h.field.player = IVec2::new(13, 1);
        let flow = walk(&mut h, &[(Direction::Right, 1)]);
        assert_eq!(flow, Flow::Finished);
        assert!(h.progress.reached_finish);
        assert_eq!(h.progress.score, MAZE_FINISH_SCORE);
        assert!(h.rules.passed(&h.progress));
    }

    #[test]
    fn test_full_route_from_start() {
        let mut h = quiet_harness();
        // Around both gates through the top-left rooms
        let flow = walk(
            &mut h,
            &[
                (Direction::Up, 2),
                (Direction::Right, 2),
                (Direction::Up, 2),
                (Direction::Left, 2),
                (Direction::Up, 2),
                (Direction::Right, 2),
                (Direction::Up, 2),
                (Direction::Left, 2),
                (Direction::Up, 4),
                (Direction::Right, 2),
                (Direction::Down, 2),
                (Direction::Right, 2),
                (Direction::Up, 2),
                (Direction::Right, 4),
                (Direction::Down, 2),
                (Direction::Right, 2),
                (Direction::Down, 2),
                (Direction::Right, 2),
                (Direction::Up, 4),
                (Direction::Right, 1),
            ],
        );
        assert_eq!(h.field.pending_gate, None);
        assert_eq!(flow, Flow::Finished);
        assert_eq!(h.field.player, FINISH);
        assert_eq!(h.progress.lives, MAZE_LIVES);
    }
}
