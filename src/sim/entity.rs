//! Entity types for the play-field
//!
//! Every simulated object carries a [`Body`]: a centre position plus an
//! axis-aligned box used only for collision tests.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::GameError;

/// Play-field bounds. The origin is the top-left corner, `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub width: f32,
    pub height: f32,
}

impl Field {
    pub fn new(width: f32, height: f32) -> Result<Self, GameError> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(GameError::InvalidField { width, height });
        }
        Ok(Self { width, height })
    }

    /// Random horizontal position at least `margin` away from both edges
    pub fn random_x(&self, margin: f32, rng: &mut impl Rng) -> f32 {
        let (lo, hi) = (margin, self.width - margin);
        if hi > lo {
            rng.random_range(lo..hi)
        } else {
            self.width / 2.0
        }
    }
}

/// Entity discriminant, used by frame snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Projectile,
    Enemy,
    Star,
    Explosion,
}

/// Axis-aligned box centred on an entity position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        self.size * 0.5
    }

    /// Centre-distance overlap test. Touching edges do not count.
    #[inline]
    pub fn intersects(&self, other: &Body) -> bool {
        let dist = (self.pos - other.pos).abs();
        let reach = self.half_extents() + other.half_extents();
        dist.x < reach.x && dist.y < reach.y
    }
}

/// The player's ship
#[derive(Debug, Clone)]
pub struct Player {
    pub body: Body,
    pub speed: f32,
    pub move_left: bool,
    pub move_right: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            body: Body::new(Vec2::ZERO, Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT)),
            speed: PLAYER_SPEED,
            move_left: false,
            move_right: false,
        }
    }
}

impl Player {
    /// Place the player centred near the bottom of the field
    pub fn spawn(field: Field) -> Self {
        let mut player = Self::default();
        let y = (field.height - PLAYER_BOTTOM_OFFSET).max(field.height / 2.0);
        player.body.pos = Vec2::new(field.width / 2.0, y);
        player
    }

    pub fn set_intent(&mut self, left: bool, right: bool) {
        self.move_left = left;
        self.move_right = right;
    }

    /// Apply held directions, keeping the ship inside `[halfW, width - halfW]`
    pub fn advance(&mut self, field: Field) {
        let half = self.body.half_extents().x;
        let max_x = (field.width - half).max(half);
        let x = &mut self.body.pos.x;

        if self.move_left && *x > half {
            *x -= self.speed;
        }
        if self.move_right && *x < max_x {
            *x += self.speed;
        }
        *x = x.clamp(half, max_x);
    }
}

/// A player shot travelling straight up
#[derive(Debug, Clone)]
pub struct Projectile {
    pub body: Body,
    pub speed: f32,
}

impl Projectile {
    pub fn new(pos: Vec2) -> Self {
        Self {
            body: Body::new(pos, Vec2::new(PROJECTILE_WIDTH, PROJECTILE_HEIGHT)),
            speed: PROJECTILE_SPEED,
        }
    }

    pub fn advance(&mut self) {
        self.body.pos.y -= self.speed;
    }

    /// Left through the top edge
    pub fn exited(&self) -> bool {
        self.body.pos.y < 0.0
    }
}

/// A descending enemy
#[derive(Debug, Clone)]
pub struct Enemy {
    pub body: Body,
    pub speed: f32,
    pub health: u32,
}

impl Enemy {
    pub fn new(pos: Vec2, speed: u32, health: u32) -> Self {
        Self {
            body: Body::new(pos, Vec2::new(ENEMY_WIDTH, ENEMY_HEIGHT)),
            speed: speed as f32,
            health,
        }
    }

    pub fn advance(&mut self) {
        self.body.pos.y += self.speed;
    }

    /// Crossed the bottom edge
    pub fn breached(&self, field: Field) -> bool {
        self.body.pos.y > field.height
    }

    /// Apply one hit. Returns true once health is exhausted.
    pub fn hit(&mut self) -> bool {
        self.health = self.health.saturating_sub(1);
        self.health == 0
    }
}

/// Background star, recycled to the top when it falls off the bottom
#[derive(Debug, Clone)]
pub struct Star {
    pub body: Body,
    pub speed: f32,
}

impl Star {
    pub fn random(field: Field, rng: &mut impl Rng) -> Self {
        let pos = Vec2::new(
            field.random_x(0.0, rng),
            rng.random_range(0.0..field.height),
        );
        Self {
            body: Body::new(pos, Vec2::splat(STAR_SIZE)),
            speed: rng.random_range(1u8..=2) as f32,
        }
    }

    pub fn advance(&mut self, field: Field, rng: &mut impl Rng) {
        self.body.pos.y += self.speed;
        if self.body.pos.y > field.height {
            self.body.pos.y = 0.0;
            self.body.pos.x = field.random_x(0.0, rng);
        }
    }
}

/// Expanding, fading explosion ring
#[derive(Debug, Clone)]
pub struct Explosion {
    pub body: Body,
    pub radius: f32,
    pub max_radius: f32,
    pub alpha: u8,
}

impl Explosion {
    pub fn new(pos: Vec2) -> Self {
        Self {
            body: Body::new(pos, Vec2::splat(EXPLOSION_START_RADIUS * 2.0)),
            radius: EXPLOSION_START_RADIUS,
            max_radius: EXPLOSION_MAX_RADIUS,
            alpha: u8::MAX,
        }
    }

    pub fn advance(&mut self) {
        self.radius += EXPLOSION_GROWTH;
        self.alpha = self.alpha.saturating_sub(EXPLOSION_FADE);
        self.body.size = Vec2::splat(self.radius * 2.0);
    }

    pub fn is_finished(&self) -> bool {
        self.radius >= self.max_radius
    }
}
