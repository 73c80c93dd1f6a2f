//! Birthday Quest - an interactive birthday journey
//!
//! Core modules:
//! - `sim`: Deterministic core (timers, mini-game lifecycle, paths, steps)
//! - `audio`: Procedural sound effects
//! - `settings`: Player preferences
//! - `tuning`: Data-driven game balance
//! - `autoplay`: Scripted player for headless runs
//! - `web`: Browser bindings (wasm32 only)

pub mod audio;
pub mod autoplay;
pub mod error;
pub mod settings;
pub mod sim;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::TuningError;
pub use settings::Settings;
pub use tuning::GameTuning;

/// Game configuration constants
pub mod consts {
    /// Phase timers tick once per second
    pub const PHASE_TICK_MS: u64 = 1000;

    /// Shared lifecycle durations (seconds)
    pub const RULES_SECS: u32 = 10;
    pub const COUNTDOWN_SECS: u32 = 3;
    pub const RETRY_SECS: u32 = 4;

    /// Memory match
    pub const MEMORY_PAIRS: usize = 8;
    pub const MEMORY_POINTS_PER_PAIR: u32 = 5;
    pub const MEMORY_PLAY_SECS: u32 = 45;
    pub const MEMORY_PREVIEW_SECS: u32 = 6;
    pub const MEMORY_WIN_SECS: u32 = 7;
    /// Extra shuffle rounds are capped at this many
    pub const MAX_EXTRA_SHUFFLES: u32 = 5;

    /// Balloon pop
    pub const BALLOON_COUNT: usize = 20;
    pub const BALLOON_PLAY_SECS: u32 = 15;
    pub const BALLOON_WIN_SECS: u32 = 5;
    /// Balloon motion step (100ms)
    pub const BALLOON_TICK_MS: u64 = 100;

    /// Quiz
    pub const QUIZ_QUESTIONS_PER_ATTEMPT: usize = 5;
    pub const QUIZ_POINTS_PER_CORRECT: u32 = 10;
    pub const QUIZ_QUESTION_SECS: u32 = 15;
    pub const QUIZ_WIN_SECS: u32 = 5;

    /// Board race (snakes & ladders)
    pub const BOARD_GOAL: u8 = 100;
    pub const BOARD_PLAY_SECS: u32 = 420;
    pub const BOARD_WIN_SECS: u32 = 5;
    /// Chance that the computer keeps a ladder landing
    pub const COMPUTER_LADDER_CHANCE: f64 = 0.275;

    /// Love maze
    pub const MAZE_SIZE: usize = 15;
    pub const MAZE_LIVES: u8 = 3;
    pub const MAZE_GUARDS: usize = 3;
    pub const MAZE_PLAY_SECS: u32 = 300;
    pub const MAZE_WIN_SECS: u32 = 5;
    pub const MAZE_FINISH_SCORE: u32 = 100;

    /// Delay before the path celebration screen (ms)
    pub const CELEBRATION_DELAY_MS: u64 = 1000;
    /// Delay between picking a path and mounting it (ms)
    pub const PATH_MOUNT_DELAY_MS: u64 = 500;
}

/// Format whole seconds as `m:ss`
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(45), "0:45");
        assert_eq!(format_clock(420), "7:00");
        assert_eq!(format_clock(301), "5:01");
    }
}
