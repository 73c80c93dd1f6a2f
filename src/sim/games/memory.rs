//! Memory match: find the 8 pairs among 16 cards

use rand_pcg::Pcg32;
use serde::Serialize;

use super::{FieldView, Flow, GameAction, GameKind, Play, Rules};
use crate::sim::content::{Card, ShuffledDeck, shuffle_deck};
use crate::sim::phase::PhaseTimings;
use crate::sim::event::GameEvent;
use crate::sim::scoring::{Evaluate, MatchProgress, Thresholds};
use crate::tuning::GameTuning;

const RULES: &[&str] = &[
    "All cards are shown face up for a few seconds. Memorise them!",
    "Then flip two cards at a time to find matching pairs.",
    "Each pair is worth 5 points.",
    "Find 4 pairs (20 points) before the clock runs out to win.",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardState {
    pub card: Card,
    pub face_up: bool,
    pub matched: bool,
}

#[derive(Debug, Clone)]
pub struct MemoryField {
    pub cards: Vec<CardState>,
    /// Seconds of face-up preview left; flips are refused until zero
    pub preview_left: u32,
    /// Indices of face-up, unmatched cards
    pub open: Vec<usize>,
}

impl MemoryField {
    fn hide_open(&mut self) {
        for idx in self.open.drain(..) {
            self.cards[idx].face_up = false;
        }
    }

    fn all_matched(&self) -> bool {
        self.cards.iter().all(|c| c.matched)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub id: u32,
    /// `None` while face down
    pub symbol: Option<char>,
    pub matched: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryView {
    pub cards: Vec<CardView>,
    pub preview_secs_left: u32,
    pub matches: u32,
    pub points: u32,
    pub extra_shuffles: u32,
}

#[derive(Debug, Clone)]
pub struct MemoryMatch {
    timings: PhaseTimings,
    thresholds: Thresholds,
    preview_secs: u32,
}

impl MemoryMatch {
    pub fn new(tuning: &GameTuning) -> Self {
        Self {
            timings: tuning.memory,
            thresholds: tuning.thresholds,
            preview_secs: tuning.memory_preview_secs,
        }
    }
}

impl Default for MemoryMatch {
    fn default() -> Self {
        Self::new(&GameTuning::default())
    }
}

impl Rules for MemoryMatch {
    type Content = ShuffledDeck;
    type Field = MemoryField;
    type Progress = MatchProgress;

    fn kind(&self) -> GameKind {
        GameKind::MemoryMatch
    }

    fn timings(&self) -> PhaseTimings {
        self.timings
    }

    fn rules_text(&self) -> &'static [&'static str] {
        RULES
    }

    fn generate(&mut self, attempt: u32, rng: &mut Pcg32) -> ShuffledDeck {
        let deck = shuffle_deck(attempt, rng);
        log::debug!("Memory deck for attempt {attempt}: {} extra rounds", deck.extra_rounds);
        deck
    }

    fn setup(&self, content: &ShuffledDeck) -> MemoryField {
        let preview = self.preview_secs > 0;
        MemoryField {
            cards: content
                .cards
                .iter()
                .map(|&card| CardState {
                    card,
                    face_up: preview,
                    matched: false,
                })
                .collect(),
            preview_left: self.preview_secs,
            open: Vec::with_capacity(2),
        }
    }

    fn act(&mut self, play: Play<'_, Self>, action: &GameAction) -> Flow {
        let GameAction::FlipCard(id) = *action else {
            return Flow::Continue;
        };
        let field = play.field;
        if field.preview_left > 0 {
            return Flow::Continue;
        }
        let Some(idx) = field.cards.iter().position(|c| c.card.id == id) else {
            log::debug!("Flip of unknown card {id}");
            return Flow::Continue;
        };
        if field.cards[idx].matched || field.cards[idx].face_up {
            return Flow::Continue;
        }

        // A mismatch still showing is turned back before the next flip
        if field.open.len() == 2 {
            field.hide_open();
        }

        field.cards[idx].face_up = true;
        field.open.push(idx);
        play.events.push(GameEvent::CardFlipped { card: id });

        if let [a, b] = field.open[..] {
            if field.cards[a].card.symbol == field.cards[b].card.symbol {
                field.cards[a].matched = true;
                field.cards[b].matched = true;
                field.open.clear();
                play.progress.record_pair();
                play.events.push(GameEvent::PairMatched);
                if field.all_matched() {
                    return Flow::Finished;
                }
            } else {
                play.events.push(GameEvent::Mismatch);
                // Shown for one full sub-tick interval
                return Flow::RestartSubTick;
            }
        }
        Flow::Continue
    }

    fn sub_tick_ms(&self) -> Option<u64> {
        Some(1000)
    }

    fn sub_tick(&mut self, play: Play<'_, Self>) -> Flow {
        let field = play.field;
        if field.preview_left > 0 {
            field.preview_left -= 1;
            if field.preview_left == 0 {
                for card in &mut field.cards {
                    card.face_up = false;
                }
            }
        } else if field.open.len() == 2 {
            field.hide_open();
        }
        Flow::Continue
    }

    fn clock_running(&self, field: &MemoryField) -> bool {
        field.preview_left == 0
    }

    fn passed(&self, progress: &MatchProgress) -> bool {
        progress.passes(&self.thresholds)
    }

    fn field_view(&self, content: &ShuffledDeck, field: &MemoryField, progress: &MatchProgress) -> FieldView {
        FieldView::Memory(MemoryView {
            cards: field
                .cards
                .iter()
                .map(|c| CardView {
                    id: c.card.id,
                    symbol: (c.face_up || c.matched).then_some(c.card.symbol),
                    matched: c.matched,
                })
                .collect(),
            preview_secs_left: field.preview_left,
            matches: progress.matches,
            points: progress.points,
            extra_shuffles: content.extra_rounds,
        })
    }
}
