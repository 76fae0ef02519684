//! Countdown and progress accrual

use crate::consts::{PROGRESS_TICKS_PER_SEC, TARGET_PROGRESS};
use crate::tuning::DifficultyTuning;

/// Conditions slowing progress this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Suppressors {
    /// Bite cooldown is running
    pub bitten: bool,
    /// A boss is inside its scold window
    pub scolded: bool,
}

/// Combined multiplier; active suppressors compound
pub fn rate_multiplier(tuning: &DifficultyTuning, suppressors: Suppressors) -> f64 {
    let mut multiplier = 1.0;
    if suppressors.bitten {
        multiplier *= tuning.bite_slowdown;
    }
    if suppressors.scolded {
        multiplier *= tuning.boss_scold_factor;
    }
    multiplier
}

/// Percent gained on one progress tick
pub fn progress_gain_per_tick(tuning: &DifficultyTuning, suppressors: Suppressors) -> f64 {
    tuning.base_progress_per_sec / PROGRESS_TICKS_PER_SEC * rate_multiplier(tuning, suppressors)
}

/// New progress value, clamped to [prev, TARGET_PROGRESS]
pub fn accrue(prev: f64, gain: f64) -> f64 {
    (prev + gain).min(TARGET_PROGRESS).max(prev)
}

pub fn is_complete(progress: f64) -> bool {
    progress >= TARGET_PROGRESS
}
