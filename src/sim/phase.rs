//! Mini-game lifecycle phases and per-attempt state

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Lifecycle phase shared by every mini-game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Instructions with an auto-advance countdown
    Rules,
    /// Short "3, 2, 1" before play
    Countdown,
    /// Interactive play
    Playing,
    /// Scoring decision (never observed between ticks)
    Evaluating,
    /// Results screen, then hand-off to the path
    Won,
    /// Encouragement screen, then back to the rules
    Retry,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Rules => "Rules",
            Phase::Countdown => "Countdown",
            Phase::Playing => "Playing",
            Phase::Evaluating => "Evaluating",
            Phase::Won => "Won",
            Phase::Retry => "Retry",
        }
    }
}

/// Phase durations for one mini-game (seconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTimings {
    pub rules_secs: u32,
    pub countdown_secs: u32,
    /// `None` when play ends only by the game's own completion condition
    pub play_secs: Option<u32>,
    pub win_secs: u32,
    pub retry_secs: u32,
}

impl PhaseTimings {
    /// Standard rules/countdown/retry with a game-specific play budget and win screen
    pub const fn standard(play_secs: Option<u32>, win_secs: u32) -> Self {
        Self {
            rules_secs: RULES_SECS,
            countdown_secs: COUNTDOWN_SECS,
            play_secs,
            win_secs,
            retry_secs: RETRY_SECS,
        }
    }

    /// Seconds shown when `phase` is entered
    pub fn duration(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Rules => self.rules_secs,
            Phase::Countdown => self.countdown_secs,
            Phase::Playing => self.play_secs.unwrap_or(0),
            Phase::Evaluating => 0,
            Phase::Won => self.win_secs,
            Phase::Retry => self.retry_secs,
        }
    }
}

/// Mutable state of one mini-game instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptState<P> {
    /// Starts at 1, increments on every retry
    pub attempt_number: u32,
    pub phase: Phase,
    pub phase_time_remaining: u32,
    /// Game-specific counters, only mutated while playing
    pub progress: P,
}

impl<P: Default> AttemptState<P> {
    pub fn new(timings: &PhaseTimings) -> Self {
        Self {
            attempt_number: 1,
            phase: Phase::Rules,
            phase_time_remaining: timings.rules_secs,
            progress: P::default(),
        }
    }

    /// Count one second off the phase clock. Returns true when it hits zero.
    pub fn tick_second(&mut self) -> bool {
        self.phase_time_remaining = self.phase_time_remaining.saturating_sub(1);
        self.phase_time_remaining == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_attempt_starts_in_rules() {
        let timings = PhaseTimings::standard(Some(15), 5);
        let state: AttemptState<u32> = AttemptState::new(&timings);
        assert_eq!(state.attempt_number, 1);
        assert_eq!(state.phase, Phase::Rules);
        assert_eq!(state.phase_time_remaining, RULES_SECS);
        assert_eq!(state.progress, 0);
    }

    #[test]
    fn test_tick_second_clamps_at_zero() {
        let timings = PhaseTimings::standard(Some(15), 5);
        let mut state: AttemptState<u32> = AttemptState::new(&timings);
        state.phase_time_remaining = 1;
        assert!(state.tick_second());
        assert!(state.tick_second());
        assert_eq!(state.phase_time_remaining, 0);
    }

    #[test]
    fn test_durations() {
        let timings = PhaseTimings::standard(None, 7);
        assert_eq!(timings.duration(Phase::Playing), 0);
        assert_eq!(timings.duration(Phase::Won), 7);
        assert_eq!(timings.duration(Phase::Retry), RETRY_SECS);
        assert_eq!(timings.duration(Phase::Countdown), COUNTDOWN_SECS);
    }
}
