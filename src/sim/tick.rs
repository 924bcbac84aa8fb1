//! Fixed-cadence simulation tick
//!
//! Order within one tick: input, motion, spawning, collisions. Any stage
//! that ends the session stops the rest of the tick.

use super::state::{GamePhase, GameState};
use super::{collision, motion, spawn};

/// Input sampled at the start of a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    /// Fire attempt (subject to the cooldown)
    pub fire: bool,
}

/// Advance the game state by one step at session time `now_ms`
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: u64) {
    if state.phase != GamePhase::Playing {
        return;
    }
    let Some(field) = state.field else {
        log::warn!("Tick skipped: play-field bounds not set");
        return;
    };

    state.time_ticks += 1;

    state.player.set_intent(input.move_left, input.move_right);
    if input.fire {
        spawn::try_fire(state, now_ms);
    }

    let level_before = state.level();

    if motion::advance(state, field).is_continue() {
        spawn::maybe_spawn_enemy(state, now_ms);
        let _ = collision::resolve(state);
    }

    let level = state.level();
    if level != level_before {
        log::info!("Level up: {} (score {})", level, state.session.score);
    }

    state.flush_pools();
}
