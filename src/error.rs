//! Errors for loading game balance data

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{game} {phase} duration must be at least one second")]
    ZeroDuration { game: &'static str, phase: &'static str },

    #[error("threshold {name} = {value} can never be reached (max {max})")]
    UnreachableThreshold {
        name: &'static str,
        value: u32,
        max: u32,
    },

    #[error("computer ladder chance {0} is outside 0..=1")]
    InvalidChance(f64),
}
