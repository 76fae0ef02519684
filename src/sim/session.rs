//! Session orchestrator
//!
//! Owns the session state, the logical clock, the RNG and the scheduler.
//! Drivers feed it time with [`Session::advance_to`] and player input with
//! [`Session::swat`] / [`Session::dismiss_boss`]; presentation reads
//! [`Session::snapshot`] and drains [`GameEvent`]s.
//!
//! All periodic work runs only while Playing. Any transition away from
//! Playing clears the scheduler, and every deferred action re-checks that
//! its entity still exists in the expected phase before touching it.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use thiserror::Error;

use super::boss::{Boss, BossPhase};
use super::enemy::{Advance, Enemy};
use super::progress::{self, Suppressors};
use super::schedule::{Deferred, Due, Scheduler, TimerKind};
use super::state::{BossView, GameEvent, GameStatus, SessionState, Snapshot};
use crate::consts::*;
use crate::tuning::{Difficulty, DifficultyTuning};
use crate::{Viewport, name_or_default};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("cannot {action} while {from:?}")]
    InvalidTransition {
        from: GameStatus,
        action: &'static str,
    },
}

/// One play session
#[derive(Debug, Clone)]
pub struct Session<R = Pcg32> {
    state: SessionState,
    now_ms: u64,
    viewport: Viewport,
    scheduler: Scheduler,
    rng: R,
    events: Vec<GameEvent>,
}

impl Session<Pcg32> {
    /// Idle session with a seeded RNG
    pub fn new(seed: u64, viewport: Viewport) -> Self {
        Self::with_rng(Pcg32::seed_from_u64(seed), viewport)
    }
}

impl<R: Rng> Session<R> {
    /// Idle session drawing randomness from `rng`
    pub fn with_rng(rng: R, viewport: Viewport) -> Self {
        Self {
            state: SessionState::default(),
            now_ms: 0,
            viewport,
            scheduler: Scheduler::new(),
            rng,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn status(&self) -> GameStatus {
        self.state.status
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Writer position enemies home toward
    pub fn target(&self) -> Vec2 {
        self.viewport.writer_position()
    }

    pub fn tuning(&self) -> &'static DifficultyTuning {
        self.state.difficulty.tuning()
    }

    /// Presentation reports new screen bounds
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Take all events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Go to the setup screen from the title or a finished session
    pub fn return_to_setup(&mut self) -> Result<(), SessionError> {
        match self.state.status {
            GameStatus::Setup => Ok(()),
            GameStatus::Playing => Err(self.reject("return to setup")),
            GameStatus::Idle | GameStatus::Won | GameStatus::Lost => {
                self.scheduler.clear();
                let difficulty = self.state.difficulty;
                self.state.reset(difficulty);
                self.set_status(GameStatus::Setup);
                Ok(())
            }
        }
    }

    /// Submit the setup form and start playing
    pub fn begin(&mut self, name: &str, difficulty: Difficulty) -> Result<(), SessionError> {
        match self.state.status {
            GameStatus::Idle | GameStatus::Setup => {
                let player_name = name_or_default(name);
                if player_name != name {
                    log::debug!("Player name {:?} normalized to {:?}", name, player_name);
                }
                self.state.player_name = player_name;
                self.start_play(difficulty);
                Ok(())
            }
            _ => Err(self.reject("begin")),
        }
    }

    /// Play again with the same name and difficulty
    pub fn replay(&mut self) -> Result<(), SessionError> {
        if !self.state.status.is_terminal() {
            return Err(self.reject("replay"));
        }
        self.start_play(self.state.difficulty);
        Ok(())
    }

    /// Player clicked an enemy
    pub fn swat(&mut self, enemy_id: u32) -> bool {
        if self.state.status != GameStatus::Playing {
            return false;
        }
        let now_ms = self.now_ms;
        let Some(enemy) = self.state.enemy_mut(enemy_id) else {
            return false;
        };
        if !enemy.swat(now_ms) {
            return false;
        }
        self.state.score += SWAT_POINTS;
        self.scheduler
            .defer(now_ms + SWAT_REMOVAL_DELAY_MS, Deferred::RemoveEnemy(enemy_id));
        self.events.push(GameEvent::EnemySwatted { id: enemy_id });
        log::debug!("Swatted enemy {} (score {})", enemy_id, self.state.score);
        true
    }

    /// Enemy arrived at the writer: remove it and start the bite cooldown
    pub fn reach_target(&mut self, enemy_id: u32) -> bool {
        if self.state.status != GameStatus::Playing {
            return false;
        }
        if !self.state.enemy(enemy_id).is_some_and(Enemy::is_live) {
            return false;
        }
        self.state.remove_enemy(enemy_id);
        let until_ms = self.now_ms + BITE_EFFECT_MS;
        self.state.bite_cooldown_until_ms = until_ms;
        self.events.push(GameEvent::Bitten {
            id: enemy_id,
            until_ms,
        });
        log::debug!("Enemy {} bit the writer, slowed until {}ms", enemy_id, until_ms);
        true
    }

    /// Player clicked the boss
    pub fn dismiss_boss(&mut self, boss_id: u32) -> bool {
        if self.state.status != GameStatus::Playing {
            return false;
        }
        let Some(boss) = self.state.boss_with_id_mut(boss_id) else {
            return false;
        };
        if !boss.dismiss() {
            return false;
        }
        self.state.score += BOSS_DISMISS_POINTS;
        self.scheduler.stop_owned(TimerKind::Taunt, boss_id);
        self.scheduler
            .defer(self.now_ms + BOSS_EXIT_DELAY_MS, Deferred::ClearBoss(boss_id));
        self.events.push(GameEvent::BossDismissed { id: boss_id });
        log::info!("Boss {} dismissed (score {})", boss_id, self.state.score);
        true
    }

    /// Run all timed work due up to `now_ms`
    pub fn advance_to(&mut self, now_ms: u64) {
        if now_ms < self.now_ms {
            log::debug!("Ignoring clock moving backward ({} < {})", now_ms, self.now_ms);
            return;
        }
        while let Some((due_ms, due)) = self.scheduler.pop_due(now_ms) {
            self.now_ms = due_ms;
            match due {
                Due::Timer(kind) => self.on_timer(kind),
                Due::Deadline(action) => self.on_deferred(action),
            }
        }
        self.now_ms = now_ms;
    }

    pub fn advance_by(&mut self, dt_ms: u64) {
        self.advance_to(self.now_ms + dt_ms);
    }

    /// Suppressors active at the current instant
    pub fn suppressors(&self) -> Suppressors {
        Suppressors {
            bitten: self.state.is_bitten(self.now_ms),
            scolded: self
                .state
                .boss
                .as_ref()
                .is_some_and(|b| b.is_scolding(self.now_ms)),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            now_ms: self.now_ms,
            status: self.state.status,
            player_name: self.state.player_name.clone(),
            difficulty: self.state.difficulty,
            progress: self.state.progress,
            time_left: self.state.time_left,
            score: self.state.score,
            bitten: self.state.is_bitten(self.now_ms),
            typing: !progress::is_complete(self.state.progress),
            spawn_interval_ms: self.state.spawn_interval_ms,
            target: self.target(),
            target_radius: WRITER_HITBOX_RADIUS,
            enemies: self.state.enemies.clone(),
            boss: self
                .state
                .boss
                .as_ref()
                .map(|b| BossView::new(b, self.now_ms)),
        }
    }

    fn reject(&self, action: &'static str) -> SessionError {
        let from = self.state.status;
        log::warn!("Rejected {} while {:?}", action, from);
        SessionError::InvalidTransition { from, action }
    }

    fn set_status(&mut self, status: GameStatus) {
        let from = self.state.status;
        self.state.status = status;
        log::info!(
            "Session {:?} -> {:?} at {}ms (score {})",
            from,
            status,
            self.now_ms,
            self.state.score
        );
        self.events.push(GameEvent::StatusChanged {
            status,
            score: self.state.score,
        });
    }

    /// Full reset and start every periodic activity
    fn start_play(&mut self, difficulty: Difficulty) {
        self.scheduler.clear();
        self.state.reset(difficulty);
        let now_ms = self.now_ms;
        let spawn_interval_ms = self.state.spawn_interval_ms;
        self.scheduler.start(TimerKind::Clock, now_ms, CLOCK_TICK_MS);
        self.scheduler.start(TimerKind::Progress, now_ms, PROGRESS_TICK_MS);
        self.scheduler.start(TimerKind::Spawn, now_ms, spawn_interval_ms);
        self.scheduler.start(TimerKind::Movement, now_ms, MOVE_TICK_MS);
        self.scheduler.start(TimerKind::BossCheck, now_ms, BOSS_CHECK_MS);
        log::info!(
            "{} starts on {} with {}s on the clock",
            self.state.player_name,
            difficulty,
            self.state.time_left
        );
        self.set_status(GameStatus::Playing);
    }

    /// Leave Playing for a terminal status
    fn finish(&mut self, status: GameStatus) {
        self.scheduler.clear();
        self.set_status(status);
    }

    fn on_timer(&mut self, kind: TimerKind) {
        // Win/lose already decided: nothing may tick after that
        if self.state.status != GameStatus::Playing {
            self.scheduler.stop(kind);
            return;
        }
        match kind {
            TimerKind::Clock => self.tick_clock(),
            TimerKind::Progress => self.tick_progress(),
            TimerKind::Spawn => self.tick_spawn(),
            TimerKind::Movement => self.tick_movement(),
            TimerKind::BossCheck => self.tick_boss_check(),
            TimerKind::Taunt => self.tick_taunt(),
        }
    }

    fn tick_clock(&mut self) {
        if self.state.time_left == 0 {
            self.finish(GameStatus::Lost);
            return;
        }
        self.state.time_left -= 1;
        if self.state.time_left == 0 {
            self.finish(GameStatus::Lost);
        }
    }

    fn tick_progress(&mut self) {
        if progress::is_complete(self.state.progress) {
            self.finish(GameStatus::Won);
            return;
        }
        let gain = progress::progress_gain_per_tick(self.tuning(), self.suppressors());
        self.state.progress = progress::accrue(self.state.progress, gain);
        if progress::is_complete(self.state.progress) {
            self.finish(GameStatus::Won);
        }
    }

    fn tick_spawn(&mut self) {
        let id = self.state.next_entity_id();
        let enemy = Enemy::spawn(id, &self.viewport, self.now_ms, &mut self.rng);
        log::debug!("Enemy {} spawned from {:?} at {:?}", id, enemy.edge, enemy.pos);
        self.events.push(GameEvent::EnemySpawned {
            id,
            edge: enemy.edge,
        });
        self.state.enemies.push(enemy);

        // Pressure builds: each spawn shortens the next wait
        let tuning = self.tuning();
        let next = self
            .state
            .spawn_interval_ms
            .saturating_sub(SPAWN_INTERVAL_STEP_MS)
            .max(tuning.spawn_interval_min_ms);
        self.state.spawn_interval_ms = next;
        self.scheduler.start(TimerKind::Spawn, self.now_ms, next);
    }

    /// Step every flying enemy once
    ///
    /// Shares an instant with the spawn timer on some ticks; spawn runs
    /// first, so a fresh enemy can take its first step at its spawn
    /// millisecond rather than one movement period later.
    fn tick_movement(&mut self) {
        let target = self.target();
        let speed = self.tuning().enemy_speed;
        let mut arrived = Vec::new();
        for enemy in self.state.enemies.iter_mut() {
            if enemy.advance(target, WRITER_HITBOX_RADIUS, speed, &mut self.rng) == Advance::ReachedTarget {
                arrived.push(enemy.id);
            }
        }
        for id in arrived {
            self.reach_target(id);
        }
    }

    fn tick_boss_check(&mut self) {
        // The slot holds one boss; an occupied slot skips the roll entirely
        if self.state.boss.is_some() {
            return;
        }
        let tuning = self.tuning();
        let roll = self.rng.random::<f32>();
        if roll >= tuning.boss_spawn_chance {
            return;
        }
        let id = self.state.next_entity_id();
        let boss = Boss::arrive(id, self.viewport.boss_y(), self.now_ms, tuning, &mut self.rng);
        self.scheduler
            .defer(boss.scold_start_ms, Deferred::BossScoldBegins(id));
        self.scheduler
            .defer(boss.scold_end_ms, Deferred::BossScoldEnds(id));
        log::info!(
            "Boss {} arrives from the {:?}, scolding {}..{}ms",
            id,
            boss.slide,
            boss.scold_start_ms,
            boss.scold_end_ms
        );
        self.events.push(GameEvent::BossArrived {
            id,
            slide: boss.slide,
        });
        self.state.boss = Some(boss);
    }

    fn tick_taunt(&mut self) {
        let now_ms = self.now_ms;
        let owner = self.scheduler.timer(TimerKind::Taunt).owner();
        let Some(id) = owner else {
            self.scheduler.stop(TimerKind::Taunt);
            return;
        };
        let still_scolding = self
            .state
            .boss_with_id(id)
            .is_some_and(|b| b.is_scolding(now_ms));
        if !still_scolding {
            self.scheduler.stop(TimerKind::Taunt);
            return;
        }
        self.taunt(id);
    }

    /// Pick a fresh taunt for boss `id` and announce it
    fn taunt(&mut self, id: u32) {
        let Some(boss) = self.state.boss.as_mut().filter(|b| b.id == id) else {
            return;
        };
        let message = boss
            .pick_taunt(&self.state.player_name, &mut self.rng)
            .to_string();
        log::debug!("Boss {}: {}", id, message);
        self.events.push(GameEvent::BossTaunt { id, message });
    }

    fn on_deferred(&mut self, action: Deferred) {
        if self.state.status != GameStatus::Playing {
            return;
        }
        let now_ms = self.now_ms;
        match action {
            Deferred::RemoveEnemy(id) => {
                if self.state.enemy(id).is_some_and(|e| e.swatted) {
                    self.state.remove_enemy(id);
                    self.events.push(GameEvent::EnemyRemoved { id });
                }
            }
            Deferred::BossScoldBegins(id) => {
                let scolding = self
                    .state
                    .boss_with_id(id)
                    .is_some_and(|b| b.phase(now_ms) == BossPhase::Scolding);
                if scolding {
                    self.events.push(GameEvent::BossScoldStarted { id });
                    self.taunt(id);
                    self.scheduler
                        .start_owned(TimerKind::Taunt, now_ms, TAUNT_INTERVAL_MS, id);
                }
            }
            Deferred::BossScoldEnds(id) => {
                let left = self
                    .state
                    .boss_with_id_mut(id)
                    .is_some_and(|b| b.leave());
                if left {
                    self.scheduler.stop_owned(TimerKind::Taunt, id);
                    self.scheduler
                        .defer(now_ms + BOSS_EXIT_DELAY_MS, Deferred::ClearBoss(id));
                    self.events.push(GameEvent::BossLeft { id });
                    log::info!("Boss {} leaves on its own", id);
                }
            }
            Deferred::ClearBoss(id) => {
                if self.state.boss_with_id(id).is_some_and(|b| !b.visible) {
                    self.state.boss = None;
                    // Empty slot waits a full check period before the next roll
                    self.scheduler
                        .start(TimerKind::BossCheck, now_ms, BOSS_CHECK_MS);
                }
            }
        }
    }
}
