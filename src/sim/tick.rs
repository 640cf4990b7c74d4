//! Fixed timestep simulation tick
//!
//! Runs the per-step pipeline: input, spawner, movement, collisions.

use glam::Vec2;

use super::collision::{CollisionReport, handle_collisions};
use super::motion::{self, MotionReport};
use super::spawn;
use super::state::{EntityId, GameEvent, GameState};

/// Input held or pressed during a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Point the pointer is over (arena coordinates)
    pub aim_target: Option<Vec2>,
    /// Held movement keys, each axis in [-1, 1]
    pub move_axis: Vec2,
    /// Fire (click/space)
    pub fire: bool,
}

/// Everything that changed during one tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub fired: Option<EntityId>,
    pub spawned: Option<EntityId>,
    pub motion: MotionReport,
    pub collisions: CollisionReport,
}

/// Loose an arrow along the player's aim.
///
/// With `aim_active == false` nothing is fired. Also a no-op outside the
/// playing phase, while the bow is cooling down, or at the arrow cap.
pub fn shoot_arrow(state: &mut GameState, aim_active: bool) -> Option<EntityId> {
    if !state.is_playing() {
        log::debug!("Shot ignored: not playing");
        return None;
    }
    if !aim_active {
        return None;
    }
    if state.player.cooldown > 0.0 || state.arrows.len() >= state.settings.max_arrows {
        return None;
    }

    let dir = state.player.shot_direction();
    let id = state.add_arrow(state.player.pos, dir);
    state.player.cooldown = state.settings.arrow_cooldown;
    state.events.push(GameEvent::ArrowFired { id, dir });
    log::debug!("Arrow {} fired toward ({:.2}, {:.2})", id, dir.x, dir.y);
    Some(id)
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> TickReport {
    let mut report = TickReport::default();

    // Idle and game over are frozen
    if !state.is_playing() {
        return report;
    }

    state.time_ticks += 1;

    if let Some(target) = input.aim_target {
        let dir = target - state.player.pos;
        state.player.set_aim(dir);
    }

    let axis = input.move_axis.clamp_length_max(1.0);
    if axis.is_finite() && axis != Vec2::ZERO {
        let delta = axis * state.settings.player_speed * dt;
        motion::move_player(state, delta);
    }

    if input.fire {
        report.fired = shoot_arrow(state, true);
    }

    report.spawned = spawn::update(state, dt);
    report.motion = motion::advance(state, dt);
    report.collisions = handle_collisions(state);

    // Ensure deterministic ordering
    state.normalize_order();
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::state::GamePhase;

    #[test]
    fn test_idle_does_not_tick() {
        let mut state = GameState::new(12345);
        let input = TickInput {
            fire: true,
            ..Default::default()
        };
        for _ in 0..600 {
            tick(&mut state, &input, SIM_DT);
        }
        assert_eq!(state.time_ticks, 0);
        assert!(state.enemies.is_empty());
        assert!(state.arrows.is_empty());
    }

    #[test]
    fn test_shoot_without_aim_fires_nothing() {
        let mut state = GameState::new(12345);
        state.start();
        assert!(shoot_arrow(&mut state, false).is_none());
        assert!(state.arrows.is_empty());
    }

    #[test]
    fn test_shoot_uses_aim_then_cools_down() {
        let mut state = GameState::new(12345);
        state.start();
        state.player.set_aim(Vec2::new(0.0, -3.0));
        let id = shoot_arrow(&mut state, true).unwrap();
        assert_eq!(state.arrows[0].id, id);
        assert_eq!(state.arrows[0].dir, Vec2::NEG_Y);
        // Still cooling down
        assert!(shoot_arrow(&mut state, true).is_none());
        assert_eq!(state.arrows.len(), 1);
    }

    #[test]
    fn test_arrow_cap() {
        let mut state = GameState::new(12345);
        state.settings.arrow_cooldown = 0.0;
        state.settings.max_arrows = 2;
        state.start();
        assert!(shoot_arrow(&mut state, true).is_some());
        assert!(shoot_arrow(&mut state, true).is_some());
        assert!(shoot_arrow(&mut state, true).is_none());
    }

    #[test]
    fn test_aim_input_turns_player() {
        let mut state = GameState::new(12345);
        state.start();
        let target = state.player.pos + Vec2::new(0.0, 50.0);
        let input = TickInput {
            aim_target: Some(target),
            fire: true,
            ..Default::default()
        };
        let report = tick(&mut state, &input, SIM_DT);
        assert!(report.fired.is_some());
        assert_eq!(state.player.aim, Some(Vec2::Y));
        assert!(state.arrows[0].pos.y > state.player.pos.y);
    }

    #[test]
    fn test_held_movement() {
        let mut state = GameState::new(12345);
        state.start();
        let start = state.player.pos;
        let input = TickInput {
            move_axis: Vec2::new(1.0, 0.0),
            ..Default::default()
        };
        tick(&mut state, &input, 1.0);
        assert!((state.player.pos.x - (start.x + state.settings.player_speed)).abs() < 1e-3);
    }

    #[test]
    fn test_long_step_hits_enemy_on_the_way_out() {
        let mut state = GameState::new(12345);
        state.start();
        let enemy = state.add_enemy(Vec2::new(625.0, 180.0), 0.0);
        let arrow = state.add_arrow(Vec2::new(600.0, 180.0), Vec2::X);

        let report = tick(&mut state, &TickInput::default(), 0.1);
        assert_eq!(report.collisions.kills, vec![(arrow, enemy)]);
        assert!(report.motion.expired_arrows.is_empty());
        assert!(state.enemies.is_empty());
        assert!(state.arrows.is_empty());
    }

    #[test]
    fn test_nan_move_axis_is_ignored() {
        let mut state = GameState::new(12345);
        state.start();
        let start = state.player.pos;
        let input = TickInput {
            move_axis: Vec2::new(f32::NAN, 1.0),
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.player.pos, start);
    }

    #[test]
    fn test_enemies_eventually_end_the_game() {
        let mut state = GameState::new(2024);
        state.start();
        let input = TickInput::default();
        let mut lives_seen = state.lives;
        for _ in 0..60 * 120 {
            tick(&mut state, &input, SIM_DT);
            assert!(state.lives <= lives_seen);
            lives_seen = state.lives;
            if state.phase == GamePhase::GameOver {
                break;
            }
        }
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.lives, 0);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);
        state1.start();
        state2.start();

        let inputs = [
            TickInput {
                aim_target: Some(Vec2::new(600.0, 20.0)),
                fire: true,
                ..Default::default()
            },
            TickInput {
                move_axis: Vec2::new(0.0, 1.0),
                ..Default::default()
            },
            TickInput::default(),
        ];

        for _ in 0..200 {
            for input in &inputs {
                tick(&mut state1, input, SIM_DT);
                tick(&mut state2, input, SIM_DT);
            }
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.enemies, state2.enemies);
        assert_eq!(state1.arrows, state2.arrows);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.lives, state2.lives);
    }
}
