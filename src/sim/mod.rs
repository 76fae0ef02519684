//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Logical millisecond clock only, advanced by the driver
//! - Injected RNG only
//! - Stable iteration order (enemies in spawn order)
//! - No rendering or platform dependencies

pub mod boss;
pub mod enemy;
pub mod progress;
pub mod schedule;
pub mod session;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;

pub use boss::{Boss, BossPhase, SlideDirection, TAUNTS, taunt};
pub use enemy::{Advance, Edge, Enemy, spawn_position};
pub use progress::{Suppressors, accrue, progress_gain_per_tick, rate_multiplier};
pub use schedule::{Deferred, Scheduler, TimerKind};
pub use session::{Session, SessionError};
pub use state::{BossView, GameEvent, GameStatus, SessionState, Snapshot};
