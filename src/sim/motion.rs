//! Per-tick displacement and removal-on-exit rules

use std::ops::ControlFlow;

use super::entity::Field;
use super::state::{GameEvent, GameState};

/// Advance every live entity by one tick.
///
/// Projectiles leaving the top and finished explosions are discarded. An
/// enemy crossing the bottom edge is discarded and costs a life; if that was
/// the last life the pass stops immediately.
pub fn advance(state: &mut GameState, field: Field) -> ControlFlow<()> {
    state.player.advance(field);

    for id in state.projectiles.ids() {
        let Some(shot) = state.projectiles.get_mut(id) else {
            continue;
        };
        shot.advance();
        if shot.exited() {
            state.projectiles.remove(id);
        }
    }

    for id in state.enemies.ids() {
        let Some(enemy) = state.enemies.get_mut(id) else {
            continue;
        };
        enemy.advance();
        if enemy.breached(field) {
            state.enemies.remove(id);
            let lives_left = state.session.lives.saturating_sub(1);
            state.events.push(GameEvent::Breach { lives_left });
            log::debug!("Enemy {} breached, {} lives left", id, lives_left);
            if state.lose_life().is_break() {
                return ControlFlow::Break(());
            }
        }
    }

    for (_, star) in state.stars.iter_mut() {
        star.advance(field, &mut state.rng);
    }

    for id in state.explosions.ids() {
        let Some(explosion) = state.explosions.get_mut(id) else {
            continue;
        };
        explosion.advance();
        if explosion.is_finished() {
            state.explosions.remove(id);
        }
    }

    ControlFlow::Continue(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Enemy, Explosion, Projectile};
    use crate::sim::state::GamePhase;
    use glam::Vec2;

    fn playing(field: Field) -> GameState {
        let mut state = GameState::with_field(field, 5, 4);
        state.phase = GamePhase::Playing;
        state
    }

    #[test]
    fn test_projectile_discarded_past_top() {
        let field = Field::new(200.0, 400.0).unwrap();
        let mut state = playing(field);
        let high = state.projectiles.insert(Projectile::new(Vec2::new(50.0, 10.0)));
        let low = state.projectiles.insert(Projectile::new(Vec2::new(50.0, 300.0)));

        assert!(advance(&mut state, field).is_continue());
        assert!(state.projectiles.get(high).is_none());
        assert_eq!(state.projectiles.get(low).unwrap().body.pos.y, 285.0);
    }

    #[test]
    fn test_breach_costs_one_life() {
        let field = Field::new(200.0, 400.0).unwrap();
        let mut state = playing(field);
        let id = state.enemies.insert(Enemy::new(Vec2::new(30.0, 399.0), 2, 1));
        state.enemies.insert(Enemy::new(Vec2::new(30.0, 100.0), 2, 1));

        assert!(advance(&mut state, field).is_continue());
        assert!(state.enemies.get(id).is_none());
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.session.lives, 2);
        assert_eq!(state.events, vec![GameEvent::Breach { lives_left: 2 }]);
    }

    #[test]
    fn test_last_breach_stops_the_pass() {
        let field = Field::new(200.0, 400.0).unwrap();
        let mut state = playing(field);
        state.session.lives = 1;
        state.enemies.insert(Enemy::new(Vec2::new(30.0, 399.0), 2, 1));
        state.enemies.insert(Enemy::new(Vec2::new(90.0, 399.0), 2, 1));
        let explosion = state.explosions.insert(Explosion::new(Vec2::ZERO));

        assert!(advance(&mut state, field).is_break());
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.session.lives, 0);
        // Remaining work in the tick was skipped
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.explosions.get(explosion).unwrap().radius, 5.0);
    }

    #[test]
    fn test_explosion_removed_when_grown() {
        let field = Field::new(200.0, 400.0).unwrap();
        let mut state = playing(field);
        let id = state.explosions.insert(Explosion::new(Vec2::new(10.0, 10.0)));
        for _ in 0..7 {
            let _ = advance(&mut state, field);
        }
        assert!(state.explosions.get(id).is_some());
        let _ = advance(&mut state, field);
        assert!(state.explosions.get(id).is_none());
    }

    #[test]
    fn test_stars_stay_in_field() {
        let field = Field::new(200.0, 400.0).unwrap();
        let mut state = playing(field);
        for _ in 0..1000 {
            let _ = advance(&mut state, field);
        }
        for (_, star) in state.stars.iter() {
            assert!(star.body.pos.y >= 0.0 && star.body.pos.y <= field.height);
            assert!(star.body.pos.x >= 0.0 && star.body.pos.x < field.width);
        }
    }
}
