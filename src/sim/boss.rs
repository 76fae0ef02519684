//! The boss
//!
//! At most one boss exists at a time. It slides in, waits out a short grace
//! period, then scolds (slowing progress) until its window closes or the
//! player clicks it away.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tuning::DifficultyTuning;

/// Side the boss slides in from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlideDirection {
    Left,
    Right,
}

impl SlideDirection {
    /// Pick a side from a uniform fraction in [0, 1)
    pub fn from_fraction(r: f32) -> SlideDirection {
        if r < 0.5 {
            SlideDirection::Left
        } else {
            SlideDirection::Right
        }
    }
}

/// Where the boss is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossPhase {
    /// Visible, grace period before scolding
    Entering,
    /// Visible and slowing progress
    Scolding,
    /// Window closed, sliding out
    Exiting,
    /// Clicked away, sliding out
    Dismissed,
}

/// Taunt templates; `{name}` is replaced with the player's name
pub const TAUNTS: [&str; 14] = [
    "{name}, speed it up!",
    "Where's the efficiency?!",
    "We're running out of time!",
    "{name}, you want a raise at this pace?",
    "I'm watching you!",
    "Deadlines are the best motivator!",
    "{name}! Why are you writing so slowly?",
    "Even I type faster than you, {name}!",
    "Faster, faster, there's no time left!",
    "{name}, this progress is way too slow! Overtime tonight!",
    "Can you do this or not?! I'll find someone who can!",
    "Hey, {name}, wake up! Slacking off again?",
    "Move it! The project comes first!",
    "{name}, at this speed the bid goes stale before it's done!",
];

/// Render taunt `index` (wrapping) for `name`
pub fn taunt(index: usize, name: &str) -> String {
    TAUNTS[index % TAUNTS.len()].replace("{name}", name)
}

/// Pick a taunt from a uniform fraction in [0, 1)
pub fn taunt_from_fraction(r: f32, name: &str) -> String {
    let index = (r.clamp(0.0, 1.0) * TAUNTS.len() as f32) as usize;
    taunt(index.min(TAUNTS.len() - 1), name)
}

/// The boss entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boss {
    pub id: u32,
    /// Vertical band (screen pixels)
    pub y: f32,
    pub visible: bool,
    pub scold_start_ms: u64,
    pub scold_end_ms: u64,
    /// Clicked away by the player
    pub dismissed: bool,
    pub slide: SlideDirection,
    /// Current taunt, only while scolding
    #[serde(default)]
    pub message: Option<String>,
}

impl Boss {
    /// A boss arriving at `now_ms` with timings from `tuning`
    pub fn new(id: u32, y: f32, now_ms: u64, tuning: &DifficultyTuning, slide: SlideDirection) -> Self {
        let scold_start_ms = now_ms + tuning.boss_scold_delay_ms;
        Self {
            id,
            y,
            visible: true,
            scold_start_ms,
            scold_end_ms: scold_start_ms + tuning.boss_duration_ms,
            dismissed: false,
            slide,
            message: None,
        }
    }

    /// Arrive with a random slide direction
    pub fn arrive<R: Rng>(id: u32, y: f32, now_ms: u64, tuning: &DifficultyTuning, rng: &mut R) -> Self {
        let slide = SlideDirection::from_fraction(rng.random::<f32>());
        Self::new(id, y, now_ms, tuning, slide)
    }

    pub fn phase(&self, now_ms: u64) -> BossPhase {
        if self.dismissed {
            BossPhase::Dismissed
        } else if !self.visible || now_ms >= self.scold_end_ms {
            BossPhase::Exiting
        } else if now_ms < self.scold_start_ms {
            BossPhase::Entering
        } else {
            BossPhase::Scolding
        }
    }

    /// Actively suppressing progress at `now_ms`
    pub fn is_scolding(&self, now_ms: u64) -> bool {
        self.phase(now_ms) == BossPhase::Scolding
    }

    /// Visible and not yet clicked away
    pub fn can_dismiss(&self) -> bool {
        self.visible && !self.dismissed
    }

    /// Player clicked the boss; false if that can't happen now
    pub fn dismiss(&mut self) -> bool {
        if !self.can_dismiss() {
            return false;
        }
        self.dismissed = true;
        self.visible = false;
        self.message = None;
        true
    }

    /// Scold window closed; false if the boss already left or was dismissed
    pub fn leave(&mut self) -> bool {
        if !self.can_dismiss() {
            return false;
        }
        self.visible = false;
        self.message = None;
        true
    }

    /// Replace the current taunt with a random one
    pub fn pick_taunt<R: Rng>(&mut self, player_name: &str, rng: &mut R) -> &str {
        let message = taunt_from_fraction(rng.random::<f32>(), player_name);
        self.message.insert(message).as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Difficulty;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn normal_boss(now_ms: u64) -> Boss {
        Boss::new(4, 180.0, now_ms, Difficulty::Normal.tuning(), SlideDirection::Left)
    }

    #[test]
    fn test_timings_from_tuning() {
        let boss = normal_boss(3000);
        assert_eq!(boss.scold_start_ms, 4500);
        assert_eq!(boss.scold_end_ms, 16_500);
        assert!(boss.visible);
        assert!(!boss.dismissed);
    }

    #[test]
    fn test_phases() {
        let boss = normal_boss(3000);
        assert_eq!(boss.phase(3000), BossPhase::Entering);
        assert_eq!(boss.phase(4499), BossPhase::Entering);
        assert_eq!(boss.phase(4500), BossPhase::Scolding);
        assert_eq!(boss.phase(16_499), BossPhase::Scolding);
        assert_eq!(boss.phase(16_500), BossPhase::Exiting);
        assert!(!boss.is_scolding(16_500));
    }

    #[test]
    fn test_dismiss_once() {
        let mut boss = normal_boss(0);
        boss.message = Some("x".to_string());
        assert!(boss.dismiss());
        assert!(!boss.dismiss());
        assert!(!boss.visible);
        assert!(boss.message.is_none());
        assert_eq!(boss.phase(5000), BossPhase::Dismissed);
        assert!(!boss.is_scolding(5000));
        assert!(!boss.leave());
    }

    #[test]
    fn test_leave_blocks_dismiss() {
        let mut boss = normal_boss(0);
        assert!(boss.leave());
        assert!(!boss.dismiss());
        assert_eq!(boss.phase(100), BossPhase::Exiting);
    }

    #[test]
    fn test_taunts() {
        assert_eq!(taunt(0, "Mei"), "Mei, speed it up!");
        assert_eq!(taunt(1, "Mei"), "Where's the efficiency?!");
        assert_eq!(taunt(TAUNTS.len(), "Mei"), taunt(0, "Mei"));
        assert_eq!(taunt_from_fraction(0.0, "Mei"), taunt(0, "Mei"));
        assert_eq!(taunt_from_fraction(0.9999, "Mei"), taunt(TAUNTS.len() - 1, "Mei"));
        assert!(TAUNTS.iter().any(|t| t.contains("{name}")));
    }

    #[test]
    fn test_pick_taunt_from_pool() {
        let mut boss = normal_boss(0);
        let mut rng = Pcg32::seed_from_u64(2);
        for _ in 0..20 {
            let message = boss.pick_taunt("Mei", &mut rng).to_string();
            assert!(!message.contains("{name}"));
            assert!((0..TAUNTS.len()).any(|i| taunt(i, "Mei") == message));
        }
    }

    #[test]
    fn test_slide_direction() {
        assert_eq!(SlideDirection::from_fraction(0.1), SlideDirection::Left);
        assert_eq!(SlideDirection::from_fraction(0.5), SlideDirection::Right);
    }
}
