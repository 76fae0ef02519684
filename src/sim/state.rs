//! Session state and the views handed to presentation
//!
//! `SessionState` is the single source of truth for one play session. Only
//! the session orchestrator mutates it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::boss::{Boss, SlideDirection};
use super::enemy::{Edge, Enemy};
use crate::consts::DEFAULT_PLAYER_NAME;
use crate::tuning::Difficulty;

/// Top-level session status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameStatus {
    /// Title screen
    #[default]
    Idle,
    /// Entering name and difficulty
    Setup,
    /// Active gameplay
    Playing,
    /// Tender finished in time
    Won,
    /// Ran out of time
    Lost,
}

impl GameStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameStatus::Won | GameStatus::Lost)
    }
}

/// Things presentation may want to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Status changed; `score` is final when the status is terminal
    StatusChanged { status: GameStatus, score: u32 },
    EnemySpawned { id: u32, edge: Edge },
    EnemySwatted { id: u32 },
    /// Swatted enemy finished its hit animation
    EnemyRemoved { id: u32 },
    /// Enemy reached the writer
    Bitten { id: u32, until_ms: u64 },
    BossArrived { id: u32, slide: SlideDirection },
    BossScoldStarted { id: u32 },
    BossTaunt { id: u32, message: String },
    /// Scold window closed on its own
    BossLeft { id: u32 },
    BossDismissed { id: u32 },
}

/// Complete session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub status: GameStatus,
    pub player_name: String,
    pub difficulty: Difficulty,
    /// Percent, 0..=100
    pub progress: f64,
    /// Seconds remaining
    pub time_left: u32,
    pub score: u32,
    /// Progress is slowed while the clock is before this
    pub bite_cooldown_until_ms: u64,
    /// Current spawn cadence
    pub spawn_interval_ms: u64,
    /// Live enemies in spawn order
    pub enemies: Vec<Enemy>,
    /// The single boss slot
    pub boss: Option<Boss>,
    /// Next entity ID
    next_id: u32,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(Difficulty::default())
    }
}

impl SessionState {
    /// Idle state with values from `difficulty`
    pub fn new(difficulty: Difficulty) -> Self {
        let tuning = difficulty.tuning();
        Self {
            status: GameStatus::Idle,
            player_name: DEFAULT_PLAYER_NAME.to_string(),
            difficulty,
            progress: 0.0,
            time_left: tuning.initial_time_secs,
            score: 0,
            bite_cooldown_until_ms: 0,
            spawn_interval_ms: tuning.spawn_interval_initial_ms,
            enemies: Vec::new(),
            boss: None,
            next_id: 1,
        }
    }

    /// Reinitialize every per-session value from `difficulty`
    ///
    /// Status and player name are left alone.
    pub fn reset(&mut self, difficulty: Difficulty) {
        let tuning = difficulty.tuning();
        self.difficulty = difficulty;
        self.progress = 0.0;
        self.time_left = tuning.initial_time_secs;
        self.score = 0;
        self.bite_cooldown_until_ms = 0;
        self.spawn_interval_ms = tuning.spawn_interval_initial_ms;
        self.enemies.clear();
        self.boss = None;
        self.next_id = 1;
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn enemy(&self, id: u32) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn enemy_mut(&mut self, id: u32) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| e.id == id)
    }

    /// Remove an enemy, keeping spawn order of the rest
    pub fn remove_enemy(&mut self, id: u32) -> Option<Enemy> {
        let index = self.enemies.iter().position(|e| e.id == id)?;
        Some(self.enemies.remove(index))
    }

    /// The boss, only if it is the instance `id`
    pub fn boss_with_id(&self, id: u32) -> Option<&Boss> {
        self.boss.as_ref().filter(|b| b.id == id)
    }

    pub fn boss_with_id_mut(&mut self, id: u32) -> Option<&mut Boss> {
        self.boss.as_mut().filter(|b| b.id == id)
    }

    pub fn is_bitten(&self, now_ms: u64) -> bool {
        now_ms < self.bite_cooldown_until_ms
    }
}

/// What presentation needs to draw the boss
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossView {
    pub id: u32,
    pub y: f32,
    pub visible: bool,
    pub dismissed: bool,
    pub scolding: bool,
    pub slide: SlideDirection,
    pub message: Option<String>,
}

impl BossView {
    pub fn new(boss: &Boss, now_ms: u64) -> Self {
        Self {
            id: boss.id,
            y: boss.y,
            visible: boss.visible,
            dismissed: boss.dismissed,
            scolding: boss.is_scolding(now_ms),
            slide: boss.slide,
            message: boss.message.clone(),
        }
    }
}

/// Read-only copy of everything presentation renders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub now_ms: u64,
    pub status: GameStatus,
    pub player_name: String,
    pub difficulty: Difficulty,
    pub progress: f64,
    pub time_left: u32,
    pub score: u32,
    /// Writer is recovering from a bite
    pub bitten: bool,
    /// Writer is still typing (progress below target)
    pub typing: bool,
    pub spawn_interval_ms: u64,
    /// Writer position and bite radius
    pub target: Vec2,
    pub target_radius: f32,
    pub enemies: Vec<Enemy>,
    pub boss: Option<BossView>,
}
