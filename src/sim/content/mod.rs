//! Random content generators
//!
//! Everything a mini-game needs that is regenerated per attempt. All
//! functions take the caller's RNG so runs replay exactly from a seed.

pub mod balloons;
pub mod maze;
pub mod questions;
pub mod shuffle;

pub use balloons::{Balloon, spawn_balloons};
pub use maze::{Guard, Tile, spawn_guards};
pub use questions::{Answer, Question, QuestionKind, select_questions};
pub use shuffle::{Card, ShuffledDeck, shuffle_deck};
