//! Mosquito enemies
//!
//! Enemies enter from just outside a screen edge and home toward the writer
//! with a bit of random wiggle. Randomness is always drawn as uniform
//! fractions so the selection functions stay pure.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::Viewport;
use crate::consts::*;

/// Screen edge an enemy enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

    /// Pick an edge from a uniform fraction in [0, 1)
    pub fn from_fraction(r: f32) -> Edge {
        let index = (r.clamp(0.0, 1.0) * Self::ALL.len() as f32) as usize;
        Self::ALL[index.min(Self::ALL.len() - 1)]
    }
}

/// Start point just outside `edge`, `along` in [0, 1) picks the spot on it
pub fn spawn_position(edge: Edge, along: f32, viewport: &Viewport) -> Vec2 {
    let (w, h) = (viewport.width, viewport.height);
    match edge {
        Edge::Top => Vec2::new(along * w, -SPAWN_EDGE_MARGIN),
        Edge::Right => Vec2::new(w + SPAWN_EDGE_MARGIN, along * h),
        Edge::Bottom => Vec2::new(along * w, h + SPAWN_EDGE_MARGIN),
        Edge::Left => Vec2::new(-SPAWN_EDGE_MARGIN, along * h),
    }
}

/// Wiggle offset for one movement tick, `rx`/`ry` uniform in [0, 1)
pub fn wiggle(speed: f32, rx: f32, ry: f32) -> Vec2 {
    let scale = ENEMY_WIGGLE_FACTOR * speed * ENEMY_WIGGLE_SCALE;
    Vec2::new((rx - 0.5) * scale, (ry - 0.5) * scale)
}

/// Outcome of one movement tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moved,
    /// Inside the target radius; caller removes the enemy and applies the bite
    ReachedTarget,
    /// Swatted enemies don't move
    Stopped,
}

/// A mosquito
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub swatted: bool,
    pub edge: Edge,
    pub spawned_at_ms: u64,
    #[serde(default)]
    pub swatted_at_ms: Option<u64>,
}

impl Enemy {
    pub fn new(id: u32, edge: Edge, pos: Vec2, now_ms: u64) -> Self {
        Self {
            id,
            pos,
            swatted: false,
            edge,
            spawned_at_ms: now_ms,
            swatted_at_ms: None,
        }
    }

    /// Spawn at a random point just outside a random edge
    pub fn spawn<R: Rng>(id: u32, viewport: &Viewport, now_ms: u64, rng: &mut R) -> Self {
        let edge = Edge::from_fraction(rng.random::<f32>());
        let pos = spawn_position(edge, rng.random::<f32>(), viewport);
        Self::new(id, edge, pos, now_ms)
    }

    /// Still flying and swattable
    pub fn is_live(&self) -> bool {
        !self.swatted
    }

    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.spawned_at_ms)
    }

    pub fn distance_to(&self, point: Vec2) -> f32 {
        self.pos.distance(point)
    }

    /// One movement tick toward `target` with random wiggle
    pub fn advance<R: Rng>(&mut self, target: Vec2, radius: f32, speed: f32, rng: &mut R) -> Advance {
        if self.swatted {
            return Advance::Stopped;
        }
        if self.distance_to(target) < radius {
            return Advance::ReachedTarget;
        }
        let jitter = wiggle(speed, rng.random::<f32>(), rng.random::<f32>());
        self.step_toward(target, radius, speed, jitter)
    }

    /// Deterministic movement core: check arrival, then step by `speed` plus `jitter`
    pub fn step_toward(&mut self, target: Vec2, radius: f32, speed: f32, jitter: Vec2) -> Advance {
        if self.swatted {
            return Advance::Stopped;
        }
        let delta = target - self.pos;
        let dist = delta.length();
        if dist < radius || dist <= f32::EPSILON {
            return Advance::ReachedTarget;
        }
        self.pos += delta / dist * speed + jitter;
        Advance::Moved
    }

    /// Mark swatted; false if it already was
    pub fn swat(&mut self, now_ms: u64) -> bool {
        if self.swatted {
            return false;
        }
        self.swatted = true;
        self.swatted_at_ms = Some(now_ms);
        true
    }
}
