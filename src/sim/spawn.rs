//! Time-gated enemy introduction and rate-limited firing

use glam::Vec2;

use super::entity::{Enemy, Projectile};
use super::pool::EntityId;
use super::state::{GameEvent, GameState};
use crate::consts::*;

/// Milliseconds between enemy introductions: `max(1500 - 50 * level, 500)`
pub fn spawn_interval_ms(level: u32) -> u64 {
    SPAWN_INTERVAL_BASE_MS
        .saturating_sub(u64::from(level) * SPAWN_INTERVAL_STEP_MS)
        .max(SPAWN_INTERVAL_MIN_MS)
}

/// Fall speed for new enemies: `min(2 + level / 4, 6)`
pub fn enemy_speed(level: u32) -> u32 {
    (ENEMY_BASE_SPEED + level / 4).min(ENEMY_MAX_SPEED)
}

/// Hit points for new enemies: `1 + level / 5`
pub fn enemy_health(level: u32) -> u32 {
    1 + level / 5
}

/// True once strictly more than `interval` ms have passed since `last`.
/// The first request of a session is never gated.
fn gate_open(last: Option<u64>, now_ms: u64, interval: u64) -> bool {
    match last {
        Some(t) => now_ms.saturating_sub(t) > interval,
        None => true,
    }
}

/// Introduce an enemy above the field if the level-scaled interval elapsed
pub fn maybe_spawn_enemy(state: &mut GameState, now_ms: u64) -> Option<EntityId> {
    let field = state.field?;
    let level = state.level();
    if !gate_open(state.session.last_spawn_ms, now_ms, spawn_interval_ms(level)) {
        return None;
    }

    let x = field.random_x(ENEMY_EDGE_MARGIN, &mut state.rng);
    let enemy = Enemy::new(
        Vec2::new(x, ENEMY_SPAWN_Y),
        enemy_speed(level),
        enemy_health(level),
    );
    state.session.last_spawn_ms = Some(now_ms);
    let id = state.enemies.insert(enemy);
    log::trace!("Spawned enemy {} at x={:.0} (level {})", id, x, level);
    Some(id)
}

/// Emit a projectile from the player unless the cooldown is still running
pub fn try_fire(state: &mut GameState, now_ms: u64) -> Option<EntityId> {
    state.field?;
    if !gate_open(state.session.last_fire_ms, now_ms, FIRE_COOLDOWN_MS) {
        return None;
    }

    state.session.last_fire_ms = Some(now_ms);
    let muzzle = state.player.body.pos + Vec2::new(PROJECTILE_OFFSET_X, 0.0);
    let id = state.projectiles.insert(Projectile::new(muzzle));
    state.events.push(GameEvent::ShotFired);
    Some(id)
}
