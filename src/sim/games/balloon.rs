//! Bonus balloon pop: pop as many drifting balloons as possible

use rand_pcg::Pcg32;
use serde::Serialize;

use super::{FieldView, Flow, GameAction, GameKind, Play, Rules};
use crate::consts::BALLOON_TICK_MS;
use crate::sim::content::{Balloon, spawn_balloons};
use crate::sim::event::GameEvent;
use crate::sim::phase::PhaseTimings;
use crate::sim::scoring::{Evaluate, PopProgress, Thresholds};
use crate::tuning::GameTuning;

const RULES: &[&str] = &[
    "20 balloons float around the screen.",
    "Tap a balloon to pop it. Each pop is worth 1 point.",
    "You have 15 seconds.",
    "Pop at least 10 balloons to win.",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalloonView {
    pub balloons: Vec<BalloonSprite>,
    pub popped: u32,
    pub score: u32,
    pub target: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalloonSprite {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub color: &'static str,
    pub popped: bool,
}

#[derive(Debug, Clone)]
pub struct BalloonPop {
    timings: PhaseTimings,
    thresholds: Thresholds,
}

impl BalloonPop {
    pub fn new(tuning: &GameTuning) -> Self {
        Self {
            timings: tuning.balloon,
            thresholds: tuning.thresholds,
        }
    }
}

impl Default for BalloonPop {
    fn default() -> Self {
        Self::new(&GameTuning::default())
    }
}

impl Rules for BalloonPop {
    /// Initial spawn; the field moves independently
    type Content = Vec<Balloon>;
    type Field = Vec<Balloon>;
    type Progress = PopProgress;

    fn kind(&self) -> GameKind {
        GameKind::BalloonPop
    }

    fn timings(&self) -> PhaseTimings {
        self.timings
    }

    fn rules_text(&self) -> &'static [&'static str] {
        RULES
    }

    fn generate(&mut self, _attempt: u32, rng: &mut Pcg32) -> Vec<Balloon> {
        spawn_balloons(rng)
    }

    fn setup(&self, content: &Vec<Balloon>) -> Vec<Balloon> {
        content.clone()
    }

    fn act(&mut self, play: Play<'_, Self>, action: &GameAction) -> Flow {
        let GameAction::PopBalloon(id) = *action else {
            return Flow::Continue;
        };
        let Some(balloon) = play.field.iter_mut().find(|b| b.id == id && !b.popped) else {
            return Flow::Continue;
        };

        balloon.popped = true;
        play.progress.popped += 1;
        play.progress.score += 1;
        play.events.push(GameEvent::BalloonPopped { id });

        if play.field.iter().all(|b| b.popped) {
            Flow::Finished
        } else {
            Flow::Continue
        }
    }

    fn sub_tick_ms(&self) -> Option<u64> {
        Some(BALLOON_TICK_MS)
    }

    fn sub_tick(&mut self, play: Play<'_, Self>) -> Flow {
        play.field.iter_mut().for_each(Balloon::step);
        Flow::Continue
    }

    fn passed(&self, progress: &PopProgress) -> bool {
        progress.passes(&self.thresholds)
    }

    fn field_view(&self, _content: &Vec<Balloon>, field: &Vec<Balloon>, progress: &PopProgress) -> FieldView {
        FieldView::Balloons(BalloonView {
            balloons: field
                .iter()
                .map(|b| BalloonSprite {
                    id: b.id,
                    x: b.pos.x,
                    y: b.pos.y,
                    size: b.size,
                    color: b.color_hex(),
                    popped: b.popped,
                })
                .collect(),
            popped: progress.popped,
            score: progress.score,
            target: self.thresholds.balloons_popped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::BALLOON_COUNT;
    use crate::sim::games::Harness;

    #[test]
    fn test_pop_counts_once() {
        let mut h = Harness::new(BalloonPop::default(), 11, 1);
        h.act(GameAction::PopBalloon(3));
        h.act(GameAction::PopBalloon(3));
        assert_eq!(h.progress.popped, 1);
        assert_eq!(h.progress.score, 1);
        assert_eq!(h.events, vec![GameEvent::BalloonPopped { id: 3 }]);
    }

    #[test]
    fn test_unknown_balloon_ignored() {
        let mut h = Harness::new(BalloonPop::default(), 11, 1);
        assert_eq!(h.act(GameAction::PopBalloon(999)), Flow::Continue);
        assert_eq!(h.progress.popped, 0);
    }

    #[test]
    fn test_popping_everything_finishes() {
        let mut h = Harness::new(BalloonPop::default(), 11, 1);
        let mut flow = Flow::Continue;
        for id in 0..BALLOON_COUNT as u32 {
            flow = h.act(GameAction::PopBalloon(id));
        }
        assert_eq!(flow, Flow::Finished);
        assert!(h.rules.passed(&h.progress));
    }

    #[test]
    fn test_sub_tick_moves_only_live_balloons() {
        let mut h = Harness::new(BalloonPop::default(), 11, 1);
        h.act(GameAction::PopBalloon(0));
        let before: Vec<_> = h.field.iter().map(|b| b.pos).collect();
        h.tick();
        assert_eq!(h.field[0].pos, before[0]);
        assert!(h.field[1..].iter().zip(&before[1..]).any(|(b, p)| b.pos != *p));
        // Content keeps the spawn positions
        assert_eq!(h.content[1].pos, before[1]);
    }

    #[test]
    fn test_ten_pops_pass() {
        let mut h = Harness::new(BalloonPop::default(), 2, 1);
        for id in 0..9 {
            h.act(GameAction::PopBalloon(id));
        }
        assert!(!h.rules.passed(&h.progress));
        h.act(GameAction::PopBalloon(9));
        assert!(h.rules.passed(&h.progress));
    }
}
