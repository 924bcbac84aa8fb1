//! Session state and the entity populations it owns
//!
//! A [`GameState`] is created fresh at session start and mutated only by
//! [`super::tick`]. Collaborator side-effects are queued as [`GameEvent`]s
//! and drained by whoever drives the tick.

use std::ops::ControlFlow;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::entity::{Enemy, Explosion, Field, Player, Projectile, Star};
use super::pool::EntityPool;
use crate::consts::*;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    /// No active session, or paused from the menu
    #[default]
    Idle,
    /// Active gameplay
    Playing,
    /// Lives exhausted
    GameOver,
}

/// Difficulty tier for a score: `1 + floor(score / 500)`
#[inline]
pub fn level_for_score(score: u64) -> u32 {
    let tier = score / POINTS_PER_LEVEL;
    u32::try_from(tier).unwrap_or(u32::MAX).saturating_add(1)
}

/// Score, lives and timers for one session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub score: u64,
    pub lives: u32,
    /// Session time (ms) of the last enemy introduction
    pub last_spawn_ms: Option<u64>,
    /// Session time (ms) of the last projectile emission
    pub last_fire_ms: Option<u64>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            score: 0,
            lives: STARTING_LIVES,
            last_spawn_ms: None,
            last_fire_ms: None,
        }
    }
}

impl SessionState {
    pub fn level(&self) -> u32 {
        level_for_score(self.score)
    }

    /// Credit one kill at the current level. Returns the points awarded.
    pub fn award_kill(&mut self) -> u64 {
        let points = POINTS_PER_KILL * u64::from(self.level());
        self.score = self.score.saturating_add(points);
        points
    }
}

/// Things that happened during a tick that collaborators may react to
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A projectile left the player's ship
    ShotFired,
    /// An enemy absorbed a hit and survived
    EnemyDamaged { health_left: u32 },
    /// An enemy was shot down
    EnemyDestroyed { pos: Vec2, points: u64 },
    /// An enemy rammed the player
    PlayerHit { pos: Vec2 },
    /// An enemy slipped past the bottom edge
    Breach { lives_left: u32 },
    /// Lives exhausted; emitted exactly once per session
    GameOver { score: u64 },
}

/// Complete simulation state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Play-field bounds; ticks do nothing until these are known
    pub field: Option<Field>,
    pub phase: GamePhase,
    pub session: SessionState,
    pub player: Player,
    pub projectiles: EntityPool<Projectile>,
    pub enemies: EntityPool<Enemy>,
    pub stars: EntityPool<Star>,
    pub explosions: EntityPool<Explosion>,
    /// Pending side-effects, drained by the driver after each tick
    pub events: Vec<GameEvent>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Seed this session's RNG was created from
    pub seed: u64,
    star_count: usize,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Create an idle state with no field yet
    pub fn new(seed: u64, star_count: usize) -> Self {
        Self {
            field: None,
            phase: GamePhase::Idle,
            session: SessionState::default(),
            player: Player::default(),
            projectiles: EntityPool::new(),
            enemies: EntityPool::new(),
            stars: EntityPool::new(),
            explosions: EntityPool::new(),
            events: Vec::new(),
            time_ticks: 0,
            seed,
            star_count,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Create an idle state laid out for `field`
    pub fn with_field(field: Field, seed: u64, star_count: usize) -> Self {
        let mut state = Self::new(seed, star_count);
        state.reset(Some(field));
        state
    }

    /// Reinitialize score, lives and every pool. Field-relative positions
    /// (player, stars) are recomputed for `field`.
    pub fn reset(&mut self, field: Option<Field>) {
        self.field = field;
        self.phase = GamePhase::Idle;
        self.session = SessionState::default();
        self.projectiles.clear();
        self.enemies.clear();
        self.stars.clear();
        self.explosions.clear();
        self.events.clear();
        self.time_ticks = 0;

        match field {
            Some(field) => {
                self.player = Player::spawn(field);
                for _ in 0..self.star_count {
                    let star = Star::random(field, &mut self.rng);
                    self.stars.insert(star);
                }
            }
            None => self.player = Player::default(),
        }
    }

    pub fn level(&self) -> u32 {
        self.session.level()
    }

    /// Take one life. Breaks when the session has ended.
    pub fn lose_life(&mut self) -> ControlFlow<()> {
        if self.session.lives == 0 {
            // Already out; never drive the count below zero
            return ControlFlow::Break(());
        }
        self.session.lives -= 1;
        if self.session.lives == 0 {
            self.finish();
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    }

    /// Playing -> GameOver, at most once
    fn finish(&mut self) {
        if self.phase == GamePhase::Playing {
            self.phase = GamePhase::GameOver;
            self.events.push(GameEvent::GameOver {
                score: self.session.score,
            });
            log::info!(
                "Game over: score {} at level {}",
                self.session.score,
                self.level()
            );
        }
    }

    /// Compact all pools after a tick
    pub fn flush_pools(&mut self) {
        self.projectiles.flush();
        self.enemies.flush();
        self.stars.flush();
        self.explosions.flush();
    }

    /// Take queued events, leaving the queue empty
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
