//! Simulation module
//!
//! All gameplay logic lives here. This module stays free of threads and
//! collaborators:
//! - Time comes in as session milliseconds
//! - Seeded RNG only
//! - Side-effects are queued as events for the driver

pub mod collision;
pub mod entity;
pub mod motion;
pub mod pool;
pub mod spawn;
pub mod state;
pub mod tick;

pub use entity::{Body, Enemy, EntityKind, Explosion, Field, Player, Projectile, Star};
pub use pool::{EntityId, EntityPool};
pub use spawn::{enemy_health, enemy_speed, spawn_interval_ms};
pub use state::{GameEvent, GamePhase, GameState, SessionState, level_for_score};
pub use tick::{TickInput, tick};
