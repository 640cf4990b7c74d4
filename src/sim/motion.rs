//! Entity movement
//!
//! Moves enemies and arrows by one step and drops whatever leaves the arena.
//! An arrow whose final step still crosses an enemy is left for the resolver.
//! Score and lives are never touched here.

use glam::Vec2;

use super::collision::swept_hit;
use super::state::{EntityId, GameEvent, GameState};
use crate::{clamp_to_arena, in_arena};

/// What a movement step removed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MotionReport {
    pub expired_arrows: Vec<EntityId>,
    pub escaped_enemies: Vec<EntityId>,
}

/// Advance every entity by `dt` seconds. `dt == 0` moves nothing.
pub fn advance(state: &mut GameState, dt: f32) -> MotionReport {
    let mut report = MotionReport::default();
    if !state.is_playing() {
        return report;
    }

    state.player.cooldown = (state.player.cooldown - dt).max(0.0);

    move_enemies(state, dt, &mut report);
    move_arrows(state, dt, &mut report);

    for &id in &report.escaped_enemies {
        state.events.push(GameEvent::EnemyEscaped { id });
    }
    for &id in &report.expired_arrows {
        state.events.push(GameEvent::ArrowExpired { id });
    }
    report
}

/// Straight-line homing toward the player, never overshooting
fn move_enemies(state: &mut GameState, dt: f32, report: &mut MotionReport) {
    let target = state.player.pos;
    let (w, h) = (state.settings.arena_width, state.settings.arena_height);

    for enemy in &mut state.enemies {
        enemy.pos = step_toward(enemy.pos, target, enemy.speed * dt);
        if !in_arena(enemy.pos, w, h, enemy.radius) {
            report.escaped_enemies.push(enemy.id);
        }
    }

    if !report.escaped_enemies.is_empty() {
        let escaped = &report.escaped_enemies;
        state.enemies.retain(|e| !escaped.contains(&e.id));
    }
}

fn move_arrows(state: &mut GameState, dt: f32, report: &mut MotionReport) {
    let (w, h) = (state.settings.arena_width, state.settings.arena_height);
    let max_travel = state.settings.arrow_max_travel;
    let hit_radius = state.settings.arrow_hit_radius;

    for arrow in &mut state.arrows {
        let step = arrow.speed * dt;
        arrow.prev = arrow.pos;
        arrow.pos += arrow.dir * step;
        arrow.traveled += step.abs();

        if in_arena(arrow.pos, w, h, 0.0) && arrow.traveled <= max_travel {
            continue;
        }
        let hit_pending = state
            .enemies
            .iter()
            .any(|e| swept_hit(arrow.prev, arrow.pos, e.pos, hit_radius).is_some());
        if !hit_pending {
            report.expired_arrows.push(arrow.id);
        }
    }

    if !report.expired_arrows.is_empty() {
        let expired = &report.expired_arrows;
        state.arrows.retain(|a| !expired.contains(&a.id));
    }
}

/// Move `from` toward `to` by `distance` (negative moves away), stopping at `to`
pub fn step_toward(from: Vec2, to: Vec2, distance: f32) -> Vec2 {
    let delta = to - from;
    let len = delta.length();
    if len <= f32::EPSILON || distance == 0.0 {
        return from;
    }
    if distance >= len {
        return to;
    }
    from + delta / len * distance
}

/// Shift the player by `delta`, staying inside the arena. Non-finite deltas are ignored.
pub fn move_player(state: &mut GameState, delta: Vec2) {
    if !delta.is_finite() {
        log::debug!("Ignoring non-finite player move {:?}", delta);
        return;
    }
    let (w, h) = (state.settings.arena_width, state.settings.arena_height);
    state.player.pos = clamp_to_arena(state.player.pos + delta, w, h);
}
