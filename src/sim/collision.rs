//! Collision resolution
//!
//! Two passes per tick, after motion:
//! 1. projectile x enemy: first overlapping enemy in pool order takes the
//!    hit (not the nearest), and the projectile is spent.
//! 2. enemy x player: the enemy is destroyed and a life is lost.
//!
//! Both passes work on point-in-time handle snapshots, so entities removed
//! earlier in the tick (including by motion) are never examined.

use std::ops::ControlFlow;

use super::entity::Explosion;
use super::state::{GameEvent, GameState};

/// Run both passes. Breaks as soon as the session ends.
pub fn resolve(state: &mut GameState) -> ControlFlow<()> {
    if resolve_projectile_hits(state).is_break() {
        return ControlFlow::Break(());
    }
    resolve_player_contacts(state)
}

/// Projectiles against enemies
pub fn resolve_projectile_hits(state: &mut GameState) -> ControlFlow<()> {
    let enemy_ids = state.enemies.ids();

    for shot_id in state.projectiles.ids() {
        let Some(shot) = state.projectiles.get(shot_id).map(|p| p.body) else {
            continue;
        };

        for &enemy_id in &enemy_ids {
            let Some(enemy) = state.enemies.get_mut(enemy_id) else {
                continue;
            };
            if !shot.intersects(&enemy.body) {
                continue;
            }

            let destroyed = enemy.hit();
            let (pos, health_left) = (enemy.body.pos, enemy.health);
            state.projectiles.remove(shot_id);

            if destroyed {
                state.enemies.remove(enemy_id);
                state.explosions.insert(Explosion::new(pos));
                let points = state.session.award_kill();
                state.events.push(GameEvent::EnemyDestroyed { pos, points });
            } else {
                state.events.push(GameEvent::EnemyDamaged { health_left });
            }
            break;
        }
    }

    ControlFlow::Continue(())
}

/// Enemies against the player's ship
pub fn resolve_player_contacts(state: &mut GameState) -> ControlFlow<()> {
    let ship = state.player.body;

    for enemy_id in state.enemies.ids() {
        let Some(enemy) = state.enemies.get(enemy_id) else {
            continue;
        };
        if !ship.intersects(&enemy.body) {
            continue;
        }

        let pos = enemy.body.pos;
        state.enemies.remove(enemy_id);
        state.explosions.insert(Explosion::new(pos));
        state.events.push(GameEvent::PlayerHit { pos });
        log::debug!("Player rammed by enemy {}", enemy_id);

        if state.lose_life().is_break() {
            return ControlFlow::Break(());
        }
    }

    ControlFlow::Continue(())
}
