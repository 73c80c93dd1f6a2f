//! Memory card deck and the attempt-scaled shuffle

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Card faces, one per pair
pub const SYMBOLS: [char; MEMORY_PAIRS] = ['⭐', '🎂', '🎁', '🌈', '💖', '🎉', '🦄', '🎈'];

/// A memory card. Ids are unique; each symbol appears on exactly two cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: u32,
    pub symbol: char,
}

/// A shuffled deck plus how many extra complexity rounds went into it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShuffledDeck {
    pub cards: Vec<Card>,
    pub extra_rounds: u32,
}

/// Unshuffled deck: symbol `i` sits on cards `2i` and `2i + 1`
pub fn fresh_deck() -> Vec<Card> {
    SYMBOLS
        .iter()
        .enumerate()
        .flat_map(|(i, &symbol)| {
            let id = i as u32 * 2;
            [Card { id, symbol }, Card { id: id + 1, symbol }]
        })
        .collect()
}

/// Shuffle a fresh deck. Later attempts get up to
/// [`MAX_EXTRA_SHUFFLES`] additional rounds of scrambling.
pub fn shuffle_deck(attempt: u32, rng: &mut impl Rng) -> ShuffledDeck {
    let mut cards = fresh_deck();
    cards.shuffle(rng);

    let extra_rounds = attempt.saturating_sub(1).min(MAX_EXTRA_SHUFFLES);
    for round in 0..extra_rounds as usize {
        scramble_round(&mut cards, round, rng);
    }

    ShuffledDeck {
        cards,
        extra_rounds,
    }
}

fn scramble_round<T>(cards: &mut [T], round: usize, rng: &mut impl Rng) {
    let len = cards.len();

    for segment in cards.chunks_mut(4 + round * 2) {
        segment.reverse();
    }

    let interval = 2 + round;
    let mut i = 0;
    while i + interval < len {
        cards.swap(i, i + interval);
        i += interval * 2;
    }

    if round >= 2 {
        for block in cards.chunks_mut(6) {
            if block.len() >= 3 {
                block.rotate_left(1);
            }
        }
    }

    if round >= 3 && len > 1 {
        let swaps = 8 + round * 2;
        let min_distance = len / 4;
        for swap in 0..swaps {
            let a = rng.random_range(0..len);
            let mut b = rng.random_range(0..len);
            // The last two swaps take whatever they get
            while a.abs_diff(b) < min_distance && swap < swaps - 2 {
                b = rng.random_range(0..len);
            }
            cards.swap(a, b);
        }
    }
}
