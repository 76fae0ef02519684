//! Tender Rescue - A timed arcade game about finishing a tender on deadline
//!
//! Core modules:
//! - `sim`: Deterministic session simulation (timers, enemies, boss, progress)
//! - `tuning`: Difficulty table
//! - `settings`: Runtime configuration for drivers
//! - `autopilot`: Scripted player for demo/headless runs

pub mod autopilot;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use autopilot::Autopilot;
pub use settings::{AutopilotSettings, Settings, SettingsError};
pub use tuning::{Difficulty, DifficultyTuning, ParseDifficultyError};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Countdown timer period
    pub const CLOCK_TICK_MS: u64 = 1000;
    /// Progress accrual period (10 ticks per second)
    pub const PROGRESS_TICK_MS: u64 = 100;
    /// Progress ticks per second, the base rate is divided by this per tick
    pub const PROGRESS_TICKS_PER_SEC: f64 = 10.0;
    /// Enemy movement period
    pub const MOVE_TICK_MS: u64 = 30;
    /// How often an empty boss slot rolls for a new boss
    pub const BOSS_CHECK_MS: u64 = 3000;
    /// How often a scolding boss changes its taunt
    pub const TAUNT_INTERVAL_MS: u64 = 4000;

    /// Progress needed to win (percent)
    pub const TARGET_PROGRESS: f64 = 100.0;

    /// Writer position as a fraction of the viewport
    pub const WRITER_X_FRACTION: f32 = 0.5;
    pub const WRITER_Y_FRACTION: f32 = 0.6;
    /// Enemies closer than this to the writer bite
    pub const WRITER_HITBOX_RADIUS: f32 = 50.0;

    /// How long a bite slows progress
    pub const BITE_EFFECT_MS: u64 = 2500;
    /// Swatted enemies stay on screen this long before removal
    pub const SWAT_REMOVAL_DELAY_MS: u64 = 300;
    /// Exit animation time before the boss slot frees up
    pub const BOSS_EXIT_DELAY_MS: u64 = 1000;

    /// Enemies spawn this far outside the screen edge
    pub const SPAWN_EDGE_MARGIN: f32 = 30.0;
    /// Spawn interval shrinks by this much after every spawn
    pub const SPAWN_INTERVAL_STEP_MS: u64 = 50;

    /// Jitter per axis is (r - 0.5) * WIGGLE_FACTOR * speed * WIGGLE_SCALE
    pub const ENEMY_WIGGLE_FACTOR: f32 = 0.5;
    pub const ENEMY_WIGGLE_SCALE: f32 = 5.0;

    /// Boss vertical band as a fraction of viewport height
    pub const BOSS_Y_FRACTION: f32 = 0.25;

    /// Score awards
    pub const SWAT_POINTS: u32 = 1;
    pub const BOSS_DISMISS_POINTS: u32 = 5;

    /// Timer display turns urgent at or below this
    pub const LOW_TIME_WARNING_SECS: u32 = 10;

    /// Used when the player leaves the name blank
    pub const DEFAULT_PLAYER_NAME: &str = "Tender Writer";
}

/// Screen bounds in pixels (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Where the writer sits (enemies home toward this point)
    pub fn writer_position(&self) -> Vec2 {
        Vec2::new(
            self.width * consts::WRITER_X_FRACTION,
            self.height * consts::WRITER_Y_FRACTION,
        )
    }

    /// Vertical band the boss slides along
    pub fn boss_y(&self) -> f32 {
        self.height * consts::BOSS_Y_FRACTION
    }
}

/// Format seconds as `MM:SS`
pub fn format_time_left(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Whether the timer should be shown as urgent
#[inline]
pub fn time_running_low(secs: u32) -> bool {
    secs <= consts::LOW_TIME_WARNING_SECS
}

/// Trimmed player name, or `DEFAULT_PLAYER_NAME` when blank
pub fn name_or_default(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        consts::DEFAULT_PLAYER_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time_left() {
        assert_eq!(format_time_left(180), "03:00");
        assert_eq!(format_time_left(75), "01:15");
        assert_eq!(format_time_left(0), "00:00");
    }

    #[test]
    fn test_time_running_low() {
        assert!(time_running_low(10));
        assert!(time_running_low(0));
        assert!(!time_running_low(11));
    }

    #[test]
    fn test_writer_position() {
        let viewport = Viewport::new(1000.0, 800.0);
        let pos = viewport.writer_position();
        assert!((pos.x - 500.0).abs() < 0.001);
        assert!((pos.y - 480.0).abs() < 0.001);
        assert!((viewport.boss_y() - 200.0).abs() < 0.001);
    }

    #[test]
    fn test_name_or_default() {
        assert_eq!(name_or_default(""), consts::DEFAULT_PLAYER_NAME);
        assert_eq!(name_or_default("   "), consts::DEFAULT_PLAYER_NAME);
        assert_eq!(name_or_default(" Mei "), "Mei");
    }
}
