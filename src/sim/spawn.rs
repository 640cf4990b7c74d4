//! Enemy spawning
//!
//! Enemies enter on the arena perimeter at a pace that tightens over the run.

use glam::Vec2;
use rand::Rng;

use super::state::{EntityId, GameEvent, GameState};
use crate::perimeter_point;

/// Attempts at finding a spawn point away from the player before giving up
const MAX_SPAWN_ATTEMPTS: u32 = 8;

/// Run the spawn timer for one step; may add one enemy.
///
/// Returns the id of the spawned enemy, if any.
pub fn update(state: &mut GameState, dt: f32) -> Option<EntityId> {
    if !state.is_playing() {
        return None;
    }

    state.spawn_timer -= dt;
    if state.spawn_timer > 0.0 {
        return None;
    }

    // Tighten the pace whether or not the spawn lands
    let s = &state.settings;
    state.spawn_interval = (state.spawn_interval * s.spawn_interval_decay).max(s.spawn_interval_min);
    state.spawn_timer += state.spawn_interval;
    // A long frame must not queue a burst of spawns
    if state.spawn_timer <= 0.0 {
        state.spawn_timer = state.spawn_interval;
    }

    if state.enemies.len() >= state.settings.enemy_cap {
        log::debug!("Spawn skipped: enemy cap {} reached", state.settings.enemy_cap);
        return None;
    }

    let Some(pos) = pick_spawn_point(state) else {
        log::debug!("Spawn skipped: no point clear of the player");
        return None;
    };
    let speed = pick_speed(state);
    let id = state.add_enemy(pos, speed);
    state.events.push(GameEvent::EnemySpawned { id, pos });
    log::debug!("Enemy {} spawned at ({:.0}, {:.0}) speed {:.1}", id, pos.x, pos.y, speed);
    Some(id)
}

/// Uniform point on the perimeter that isn't on top of the player
fn pick_spawn_point(state: &mut GameState) -> Option<Vec2> {
    let (w, h) = (state.settings.arena_width, state.settings.arena_height);
    let perimeter = 2.0 * (w + h);
    let min_dist = state.settings.contact_radius;

    for _ in 0..MAX_SPAWN_ATTEMPTS {
        let t = state.rng.random_range(0.0..perimeter);
        let pos = perimeter_point(t, w, h);
        if pos.distance(state.player.pos) > min_dist {
            return Some(pos);
        }
    }
    None
}

fn pick_speed(state: &mut GameState) -> f32 {
    let (lo, hi) = (state.settings.enemy_min_speed, state.settings.enemy_max_speed);
    if lo >= hi {
        return lo;
    }
    state.rng.random_range(lo..=hi)
}
