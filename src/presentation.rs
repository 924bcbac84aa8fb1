//! Read-only frame snapshots for whatever draws the game
//!
//! The stepping thread captures a [`Frame`] after each tick and hands it to
//! the [`Presenter`]. Sprites are listed back to front: stars, enemies,
//! projectiles, explosions, then the player.

use glam::Vec2;
use serde::Serialize;

use crate::sim::{Body, EntityKind, GameState};

/// One drawable entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sprite {
    pub kind: EntityKind,
    /// Centre position
    pub pos: Vec2,
    pub size: Vec2,
    /// Opacity, 255 is fully opaque
    pub alpha: u8,
}

impl Sprite {
    fn opaque(kind: EntityKind, body: &Body) -> Self {
        Self {
            kind,
            pos: body.pos,
            size: body.size,
            alpha: u8::MAX,
        }
    }
}

/// Everything needed to draw one tick
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Frame {
    pub sprites: Vec<Sprite>,
    pub score: u64,
    pub level: u32,
    pub lives: u32,
}

impl Frame {
    pub fn capture(state: &GameState) -> Self {
        let count = state.stars.len()
            + state.enemies.len()
            + state.projectiles.len()
            + state.explosions.len()
            + 1;
        let mut sprites = Vec::with_capacity(count);

        sprites.extend(
            state
                .stars
                .iter()
                .map(|(_, s)| Sprite::opaque(EntityKind::Star, &s.body)),
        );
        sprites.extend(
            state
                .enemies
                .iter()
                .map(|(_, e)| Sprite::opaque(EntityKind::Enemy, &e.body)),
        );
        sprites.extend(
            state
                .projectiles
                .iter()
                .map(|(_, p)| Sprite::opaque(EntityKind::Projectile, &p.body)),
        );
        sprites.extend(state.explosions.iter().map(|(_, x)| Sprite {
            alpha: x.alpha,
            ..Sprite::opaque(EntityKind::Explosion, &x.body)
        }));
        if state.field.is_some() {
            sprites.push(Sprite::opaque(EntityKind::Player, &state.player.body));
        }

        Self {
            sprites,
            score: state.session.score,
            level: state.level(),
            lives: state.session.lives,
        }
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.sprites.iter().filter(|s| s.kind == kind).count()
    }
}

/// Drawing collaborator. Called from the stepping thread; must not block.
pub trait Presenter: Send {
    /// False while the drawing surface is unavailable; frames are skipped
    fn is_ready(&self) -> bool {
        true
    }

    fn present(&mut self, frame: &Frame);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Enemy, Explosion, Field, Projectile};

    #[test]
    fn test_capture_lists_every_live_entity() {
        let field = Field::new(480.0, 800.0).unwrap();
        let mut state = GameState::with_field(field, 5, 4);
        state.enemies.insert(Enemy::new(Vec2::new(100.0, 50.0), 2, 1));
        state.projectiles.insert(Projectile::new(Vec2::new(240.0, 600.0)));
        let mut boom = Explosion::new(Vec2::new(10.0, 10.0));
        boom.advance();
        state.explosions.insert(boom);
        state.session.score = 520;

        let frame = Frame::capture(&state);
        assert_eq!(frame.count(EntityKind::Star), 4);
        assert_eq!(frame.count(EntityKind::Enemy), 1);
        assert_eq!(frame.count(EntityKind::Projectile), 1);
        assert_eq!(frame.count(EntityKind::Player), 1);
        assert_eq!(frame.sprites.last().map(|s| s.kind), Some(EntityKind::Player));
        assert_eq!(frame.level, 2);
        assert_eq!(frame.lives, 3);

        let explosion = frame
            .sprites
            .iter()
            .find(|s| s.kind == EntityKind::Explosion)
            .unwrap();
        assert_eq!(explosion.alpha, 240);
        assert_eq!(explosion.size, Vec2::splat(14.0));
    }

    #[test]
    fn test_removed_entities_are_not_drawn() {
        let field = Field::new(480.0, 800.0).unwrap();
        let mut state = GameState::with_field(field, 5, 0);
        let id = state.enemies.insert(Enemy::new(Vec2::ZERO, 2, 1));
        state.enemies.remove(id);
        assert_eq!(Frame::capture(&state).count(EntityKind::Enemy), 0);
    }

    #[test]
    fn test_frame_serializes_to_json() {
        let frame = Frame::capture(&GameState::new(1, 0));
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["score"], 0);
        assert_eq!(json["lives"], 3);
        assert!(json["sprites"].as_array().unwrap().is_empty());
    }
}
