//! Difficulty tuning table
//!
//! Every balance number that differs between tiers lives here. Lookup is a
//! match over a closed enum so it is total; text that names no tier is
//! rejected at the parsing boundary instead of defaulting.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

/// Balance values for one tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DifficultyTuning {
    /// Countdown length
    pub initial_time_secs: u32,
    /// Progress percent per second with no suppressors
    pub base_progress_per_sec: f64,
    /// Rate multiplier while the bite cooldown is running
    pub bite_slowdown: f64,
    /// Enemy spawn cadence at session start
    pub spawn_interval_initial_ms: u64,
    /// Spawn cadence floor
    pub spawn_interval_min_ms: u64,
    /// Enemy speed in pixels per movement tick
    pub enemy_speed: f32,
    /// Chance per boss check that a boss shows up
    pub boss_spawn_chance: f32,
    /// Rate multiplier while the boss is scolding
    pub boss_scold_factor: f64,
    /// Length of the scold window
    pub boss_duration_ms: u64,
    /// Grace period between boss arrival and scolding
    pub boss_scold_delay_ms: u64,
}

const EASY: DifficultyTuning = DifficultyTuning {
    initial_time_secs: 180,
    base_progress_per_sec: 2.0,
    bite_slowdown: 0.7,
    spawn_interval_initial_ms: 2200,
    spawn_interval_min_ms: 1000,
    enemy_speed: 1.2,
    boss_spawn_chance: 0.08,
    boss_scold_factor: 0.8,
    boss_duration_ms: 15_000,
    boss_scold_delay_ms: 2000,
};

const NORMAL: DifficultyTuning = DifficultyTuning {
    initial_time_secs: 120,
    base_progress_per_sec: 1.5,
    bite_slowdown: 0.5,
    spawn_interval_initial_ms: 1500,
    spawn_interval_min_ms: 600,
    enemy_speed: 1.5,
    boss_spawn_chance: 0.15,
    boss_scold_factor: 0.6,
    boss_duration_ms: 12_000,
    boss_scold_delay_ms: 1500,
};

const HARD: DifficultyTuning = DifficultyTuning {
    initial_time_secs: 90,
    base_progress_per_sec: 1.2,
    bite_slowdown: 0.3,
    spawn_interval_initial_ms: 1000,
    spawn_interval_min_ms: 400,
    enemy_speed: 1.8,
    boss_spawn_chance: 0.25,
    boss_scold_factor: 0.4,
    boss_duration_ms: 10_000,
    boss_scold_delay_ms: 1000,
};

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }

    /// Balance values for this tier
    pub fn tuning(self) -> &'static DifficultyTuning {
        match self {
            Difficulty::Easy => &EASY,
            Difficulty::Normal => &NORMAL,
            Difficulty::Hard => &HARD,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown difficulty '{0}' (expected easy, normal or hard)")]
pub struct ParseDifficultyError(pub String);

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "normal" | "medium" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ParseDifficultyError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_values() {
        let hard = Difficulty::Hard.tuning();
        assert_eq!(hard.initial_time_secs, 90);
        assert_eq!(hard.spawn_interval_min_ms, 400);

        let normal = Difficulty::Normal.tuning();
        assert_eq!(normal.initial_time_secs, 120);
        assert!((normal.boss_scold_factor - 0.6).abs() < 1e-9);

        let easy = Difficulty::Easy.tuning();
        assert!((easy.base_progress_per_sec - 2.0).abs() < 1e-9);
        assert_eq!(easy.boss_duration_ms, 15_000);
    }

    #[test]
    fn test_harder_tiers_are_harder() {
        for pair in Difficulty::ALL.windows(2) {
            let (easier, harder) = (pair[0].tuning(), pair[1].tuning());
            assert!(harder.initial_time_secs < easier.initial_time_secs);
            assert!(harder.base_progress_per_sec < easier.base_progress_per_sec);
            assert!(harder.enemy_speed > easier.enemy_speed);
            assert!(harder.boss_spawn_chance > easier.boss_spawn_chance);
            assert!(harder.spawn_interval_initial_ms < easier.spawn_interval_initial_ms);
        }
    }

    #[test]
    fn test_multipliers_in_unit_range() {
        for difficulty in Difficulty::ALL {
            let t = difficulty.tuning();
            assert!(t.bite_slowdown > 0.0 && t.bite_slowdown <= 1.0);
            assert!(t.boss_scold_factor > 0.0 && t.boss_scold_factor <= 1.0);
            assert!(t.spawn_interval_min_ms <= t.spawn_interval_initial_ms);
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!("Easy".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert_eq!("medium".parse::<Difficulty>(), Ok(Difficulty::Normal));
        assert_eq!(" HARD ".parse::<Difficulty>(), Ok(Difficulty::Hard));
        let err = "nightmare".parse::<Difficulty>().unwrap_err();
        assert_eq!(err, ParseDifficultyError("nightmare".to_string()));
        assert!(err.to_string().contains("nightmare"));
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Difficulty::Hard).unwrap();
        assert_eq!(json, "\"hard\"");
        let parsed: Difficulty = serde_json::from_str("\"easy\"").unwrap();
        assert_eq!(parsed, Difficulty::Easy);
    }
}
