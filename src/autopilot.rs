//! Demo player
//!
//! Plays a session the way an attentive human would: waits a reaction delay
//! after each enemy appears, swats the one closest to the writer at a limited
//! cadence, and clicks the boss away once it starts scolding. Used by the
//! headless runner and end-to-end tests.

use rand::Rng;

use crate::settings::AutopilotSettings;
use crate::sim::{GameStatus, Session, Snapshot};

/// One click the autopilot wants to make
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Swat(u32),
    DismissBoss(u32),
}

#[derive(Debug, Clone)]
pub struct Autopilot {
    settings: AutopilotSettings,
    last_swat_ms: Option<u64>,
}

impl Autopilot {
    pub fn new(settings: AutopilotSettings) -> Self {
        Self {
            settings,
            last_swat_ms: None,
        }
    }

    pub fn settings(&self) -> &AutopilotSettings {
        &self.settings
    }

    fn swat_ready(&self, now_ms: u64) -> bool {
        match self.last_swat_ms {
            Some(last) => now_ms >= last + self.settings.swat_cooldown_ms,
            None => true,
        }
    }

    /// Clicks to make given what is on screen
    pub fn plan(&self, snapshot: &Snapshot) -> Vec<Action> {
        let mut actions = Vec::new();
        if !self.settings.enabled || snapshot.status != GameStatus::Playing {
            return actions;
        }

        if self.settings.dismiss_boss {
            if let Some(boss) = snapshot.boss.as_ref().filter(|b| b.scolding) {
                actions.push(Action::DismissBoss(boss.id));
            }
        }

        if self.swat_ready(snapshot.now_ms) {
            let target = snapshot.target;
            let nearest = snapshot
                .enemies
                .iter()
                .filter(|e| e.is_live() && e.age_ms(snapshot.now_ms) >= self.settings.reaction_ms)
                .min_by(|a, b| {
                    a.distance_to(target)
                        .partial_cmp(&b.distance_to(target))
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
            if let Some(enemy) = nearest {
                actions.push(Action::Swat(enemy.id));
            }
        }

        actions
    }

    /// Plan and apply clicks; returns how many landed
    pub fn act<R: Rng>(&mut self, session: &mut Session<R>) -> usize {
        let mut landed = 0;
        for action in self.plan(&session.snapshot()) {
            let hit = match action {
                Action::Swat(id) => {
                    let hit = session.swat(id);
                    if hit {
                        self.last_swat_ms = Some(session.now_ms());
                    }
                    hit
                }
                Action::DismissBoss(id) => session.dismiss_boss(id),
            };
            if hit {
                landed += 1;
            } else {
                log::trace!("Autopilot missed {:?}", action);
            }
        }
        landed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Viewport;
    use crate::sim::{Boss, BossView, Edge, Enemy, SlideDirection};
    use crate::tuning::Difficulty;
    use glam::Vec2;

    fn snapshot(now_ms: u64, enemies: Vec<Enemy>, boss: Option<BossView>) -> Snapshot {
        let mut session = Session::new(1, Viewport::default());
        session.begin("Mei", Difficulty::Normal).unwrap();
        let mut snapshot = session.snapshot();
        snapshot.now_ms = now_ms;
        snapshot.enemies = enemies;
        snapshot.boss = boss;
        snapshot
    }

    fn enemy_at(id: u32, pos: Vec2, spawned_at_ms: u64) -> Enemy {
        Enemy::new(id, Edge::Top, pos, spawned_at_ms)
    }

    #[test]
    fn test_swats_nearest_old_enough_enemy() {
        let pilot = Autopilot::new(AutopilotSettings::default());
        let target = Viewport::default().writer_position();
        let far = enemy_at(1, target + Vec2::new(300.0, 0.0), 0);
        let near = enemy_at(2, target + Vec2::new(100.0, 0.0), 0);
        let nearest_but_fresh = enemy_at(3, target + Vec2::new(60.0, 0.0), 900);
        let mut swatted = enemy_at(4, target + Vec2::new(55.0, 0.0), 0);
        swatted.swat(500);

        let snap = snapshot(1000, vec![far, near, nearest_but_fresh, swatted], None);
        assert_eq!(pilot.plan(&snap), vec![Action::Swat(2)]);
    }

    #[test]
    fn test_swat_cooldown() {
        let mut pilot = Autopilot::new(AutopilotSettings::default());
        pilot.last_swat_ms = Some(1000);
        let enemy = enemy_at(1, Vec2::ZERO, 0);

        assert!(pilot.plan(&snapshot(1349, vec![enemy.clone()], None)).is_empty());
        assert_eq!(
            pilot.plan(&snapshot(1350, vec![enemy], None)),
            vec![Action::Swat(1)]
        );
    }

    #[test]
    fn test_dismisses_only_scolding_boss() {
        let tuning = Difficulty::Normal.tuning();
        let boss = Boss::new(9, 180.0, 3000, tuning, SlideDirection::Right);
        let pilot = Autopilot::new(AutopilotSettings::default());

        let entering = snapshot(3500, Vec::new(), Some(BossView::new(&boss, 3500)));
        assert!(pilot.plan(&entering).is_empty());

        let scolding = snapshot(5000, Vec::new(), Some(BossView::new(&boss, 5000)));
        assert_eq!(pilot.plan(&scolding), vec![Action::DismissBoss(9)]);

        let patient = Autopilot::new(AutopilotSettings {
            dismiss_boss: false,
            ..AutopilotSettings::default()
        });
        assert!(patient.plan(&scolding).is_empty());
    }

    #[test]
    fn test_disabled_does_nothing() {
        let pilot = Autopilot::new(AutopilotSettings {
            enabled: false,
            ..AutopilotSettings::default()
        });
        let snap = snapshot(5000, vec![enemy_at(1, Vec2::ZERO, 0)], None);
        assert!(pilot.plan(&snap).is_empty());
    }

    fn play_out(seed: u64, difficulty: Difficulty) -> (Session, Autopilot) {
        let mut session = Session::new(seed, Viewport::default());
        let mut pilot = Autopilot::new(AutopilotSettings::default());
        session.begin("Mei", difficulty).unwrap();
        let limit = u64::from(difficulty.tuning().initial_time_secs) * 1000;
        while session.status() == GameStatus::Playing && session.now_ms() <= limit {
            session.advance_by(10);
            pilot.act(&mut session);
        }
        (session, pilot)
    }

    #[test]
    fn test_autopilot_finishes_tender_on_normal() {
        let (session, _) = play_out(7, Difficulty::Normal);
        let state = session.state();
        assert_eq!(state.status, GameStatus::Won);
        assert_eq!(state.progress, 100.0);
        assert!(state.score > 0);
        assert!(state.time_left > 0);
    }

    #[test]
    fn test_same_seed_same_game() {
        let (a, _) = play_out(42, Difficulty::Hard);
        let (b, _) = play_out(42, Difficulty::Hard);
        assert_eq!(a.snapshot(), b.snapshot());
        assert!(a.status().is_terminal());
    }
}
