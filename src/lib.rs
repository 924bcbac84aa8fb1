//! Space Defender - A vertical arcade shooter
//!
//! Core modules:
//! - `sim`: Simulation step (entities, spawning, motion, collisions, session state)
//! - `clock`: Fixed-cadence stepping thread
//! - `game`: Session driver and lifecycle hooks
//! - `input`: Lock-free input flags shared with the stepping thread
//! - `feedback` / `presentation`: Collaborator contracts (audio, haptics, drawing)
//! - `persistence`: Top-10 score storage

pub mod clock;
pub mod error;
pub mod feedback;
pub mod game;
pub mod highscores;
pub mod input;
pub mod persistence;
pub mod presentation;
pub mod settings;
pub mod sim;

pub use error::{GameError, PersistError};
pub use game::{Collaborators, Game, SessionEvent};
pub use highscores::HighScores;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Target tick budget (~30 Hz)
    pub const TICK_MS: u64 = 33;

    /// Minimum time between two projectiles
    pub const FIRE_COOLDOWN_MS: u64 = 300;

    /// Spawn interval bounds (ms); shrinks by `SPAWN_INTERVAL_STEP_MS` per level
    pub const SPAWN_INTERVAL_BASE_MS: u64 = 1500;
    pub const SPAWN_INTERVAL_STEP_MS: u64 = 50;
    pub const SPAWN_INTERVAL_MIN_MS: u64 = 500;

    /// Score needed per level
    pub const POINTS_PER_LEVEL: u64 = 500;
    /// Base points per kill (multiplied by level)
    pub const POINTS_PER_KILL: u64 = 10;

    pub const STARTING_LIVES: u32 = 3;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 60.0;
    pub const PLAYER_SPEED: f32 = 10.0;
    /// Distance of the player's centre above the bottom edge
    pub const PLAYER_BOTTOM_OFFSET: f32 = 100.0;

    /// Projectile defaults
    pub const PROJECTILE_WIDTH: f32 = 6.0;
    pub const PROJECTILE_HEIGHT: f32 = 16.0;
    pub const PROJECTILE_SPEED: f32 = 15.0;
    /// Shots leave from the ship's right edge, not its centre
    pub const PROJECTILE_OFFSET_X: f32 = PLAYER_WIDTH / 2.0;

    /// Enemy defaults
    pub const ENEMY_WIDTH: f32 = 40.0;
    pub const ENEMY_HEIGHT: f32 = 40.0;
    pub const ENEMY_SPAWN_Y: f32 = -50.0;
    /// Horizontal margin kept free at both edges when spawning
    pub const ENEMY_EDGE_MARGIN: f32 = 25.0;
    pub const ENEMY_BASE_SPEED: u32 = 2;
    pub const ENEMY_MAX_SPEED: u32 = 6;

    /// Background stars
    pub const STAR_COUNT: usize = 20;
    pub const STAR_SIZE: f32 = 1.0;

    /// Explosion effect
    pub const EXPLOSION_START_RADIUS: f32 = 5.0;
    pub const EXPLOSION_MAX_RADIUS: f32 = 20.0;
    pub const EXPLOSION_GROWTH: f32 = 2.0;
    pub const EXPLOSION_FADE: u8 = 15;

    /// Feedback tuning
    pub const LASER_VOLUME: f32 = 0.2;
    pub const EXPLOSION_VOLUME: f32 = 0.5;
    pub const KILL_VIBRATE_MS: u32 = 20;
    pub const HIT_VIBRATE_MS: u32 = 30;
}
