//! Command/query surface for frontends
//!
//! Renderers read [`Game::get_state`] once per frame; input handlers call the
//! commands. Everything mutates through here or through the sim pipeline.

use anyhow::{Context, Result, bail, ensure};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{MAX_FRAME_TIME, MAX_SUBSTEPS, SIM_DT};
use crate::in_arena;
use crate::settings::Settings;
use crate::sim::{
    self, Arrow, CollisionReport, Enemy, EntityId, GameEvent, GamePhase, GameState, TickInput,
    TickReport,
};

/// Enemy description for seeding a game from tests or scripted setups
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EnemySpec {
    pub x: Option<f32>,
    pub y: Option<f32>,
    /// Speed toward the player (pixels/s). Defaults to standing still.
    #[serde(default)]
    pub speed: Option<f32>,
}

impl EnemySpec {
    pub fn at(x: f32, y: f32, speed: f32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            speed: Some(speed),
        }
    }

    /// Parse a spec from JSON, e.g. `{"x": 50, "y": 50, "speed": 0}`
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("invalid enemy spec JSON")
    }
}

/// Player view for renderers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub x: f32,
    pub y: f32,
    pub facing: Vec2,
    pub aiming: bool,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u32,
    pub tick: u64,
    pub player: PlayerView,
    pub enemies: Vec<Enemy>,
    pub arrows: Vec<Arrow>,
}

/// Game instance: simulation state plus frame pacing and held input
#[derive(Debug, Clone)]
pub struct Game {
    state: GameState,
    input: TickInput,
    accumulator: f32,
}

impl Game {
    /// New idle game with default settings
    pub fn new(seed: u64) -> Self {
        Self::from_state(GameState::new(seed))
    }

    /// New idle game with custom settings
    pub fn with_settings(seed: u64, settings: Settings) -> Result<Self> {
        settings.validate()?;
        Ok(Self::from_state(GameState::with_settings(seed, settings)))
    }

    fn from_state(state: GameState) -> Self {
        Self {
            state,
            input: TickInput::default(),
            accumulator: 0.0,
        }
    }

    // === Commands ===

    /// Back to idle with empty arena, initial score and lives
    pub fn reset_game(&mut self) {
        self.state.reset();
        self.input = TickInput::default();
        self.accumulator = 0.0;
    }

    /// Begin a fresh run (from idle or game over)
    pub fn start(&mut self) {
        if self.state.phase != GamePhase::Playing {
            self.input = TickInput::default();
            self.accumulator = 0.0;
        }
        self.state.start();
    }

    /// `true` starts a run unless one is going; `false` resets to idle
    pub fn set_playing(&mut self, playing: bool) {
        if playing {
            self.start();
        } else {
            self.reset_game();
        }
    }

    /// Fire along the current aim. Returns the new arrow's id.
    pub fn shoot_arrow(&mut self, aim_active: bool) -> Option<EntityId> {
        sim::shoot_arrow(&mut self.state, aim_active)
    }

    pub fn clear_arrows(&mut self) {
        self.state.clear_arrows();
    }

    /// Seed an enemy. Fails on a spec without a usable position.
    pub fn add_enemy(&mut self, spec: EnemySpec) -> Result<EntityId> {
        let (Some(x), Some(y)) = (spec.x, spec.y) else {
            bail!("enemy spec is missing a position: {spec:?}");
        };
        let speed = spec.speed.unwrap_or(0.0);
        ensure!(
            x.is_finite() && y.is_finite() && speed.is_finite(),
            "enemy spec has non-finite values: {spec:?}"
        );
        let arena = self.state.arena();
        ensure!(
            in_arena(Vec2::new(x, y), arena.x, arena.y, 0.0),
            "enemy spec position ({x}, {y}) is outside the {}x{} arena",
            arena.x,
            arena.y
        );
        Ok(self.state.add_enemy(Vec2::new(x, y), speed))
    }

    /// Aim at a point in arena coordinates. Aiming at the archer clears the aim.
    pub fn aim_at(&mut self, target: Vec2) {
        let dir = target - self.state.player.pos;
        self.state.player.set_aim(dir);
    }

    pub fn set_aim_direction(&mut self, dir: Vec2) {
        self.state.player.set_aim(dir);
    }

    /// Pointer left the arena
    pub fn clear_aim(&mut self) {
        self.state.player.aim = None;
    }

    /// Nudge the archer (ignored outside play)
    pub fn move_player(&mut self, delta: Vec2) {
        if self.state.is_playing() {
            sim::move_player(&mut self.state, delta);
        }
    }

    /// Held movement keys, applied every step. Non-finite axes are ignored.
    pub fn set_move_axis(&mut self, axis: Vec2) {
        if !axis.is_finite() {
            log::debug!("Ignoring non-finite move axis {:?}", axis);
            return;
        }
        self.input.move_axis = axis;
    }

    // === Queries ===

    pub fn get_state(&self) -> GameSnapshot {
        let player = &self.state.player;
        GameSnapshot {
            phase: self.state.phase,
            score: self.state.score,
            lives: self.state.lives,
            tick: self.state.time_ticks,
            player: PlayerView {
                x: player.pos.x,
                y: player.pos.y,
                facing: player.facing,
                aiming: player.aim.is_some(),
            },
            enemies: self.state.enemies.clone(),
            arrows: self.state.arrows.clone(),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn lives(&self) -> u32 {
        self.state.lives
    }

    /// Read-only access to the full simulation state
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Events since the last drain (for effects and HUD)
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    // === Stepping ===

    /// Resolve collisions without moving anything
    pub fn handle_collisions(&mut self) -> CollisionReport {
        sim::handle_collisions(&mut self.state)
    }

    /// Run the whole pipeline once with the held input
    pub fn tick(&mut self, dt: f32) -> TickReport {
        let input = self.input.clone();
        sim::tick(&mut self.state, &input, dt)
    }

    /// Feed wall-clock frame time; runs as many fixed steps as have accrued.
    ///
    /// Returns the number of steps run.
    pub fn advance_frame(&mut self, elapsed: f32) -> u32 {
        if !self.state.is_playing() {
            self.accumulator = 0.0;
            return 0;
        }

        self.accumulator += elapsed.clamp(0.0, MAX_FRAME_TIME);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.tick(SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        // Drop time we couldn't catch up on
        if substeps == MAX_SUBSTEPS {
            self.accumulator = 0.0;
        }
        substeps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_enemy_requires_position() {
        let mut game = Game::new(1);
        let err = game
            .add_enemy(EnemySpec {
                x: Some(10.0),
                ..Default::default()
            })
            .unwrap_err();
        assert!(err.to_string().contains("missing a position"));
        assert!(game.get_state().enemies.is_empty());
    }

    #[test]
    fn test_add_enemy_rejects_outside_arena_and_nan() {
        let mut game = Game::new(1);
        assert!(game.add_enemy(EnemySpec::at(-50.0, 10.0, 0.0)).is_err());
        assert!(game.add_enemy(EnemySpec::at(f32::NAN, 10.0, 0.0)).is_err());
        assert!(game.add_enemy(EnemySpec::at(10.0, 10.0, f32::INFINITY)).is_err());
    }

    #[test]
    fn test_enemy_spec_json() {
        let spec = EnemySpec::from_json_str(r#"{ "x": 50, "y": 60 }"#).unwrap();
        assert_eq!(spec, EnemySpec { x: Some(50.0), y: Some(60.0), speed: None });
        let mut game = Game::new(1);
        let id = game.add_enemy(spec).unwrap();
        let snapshot = game.get_state();
        assert_eq!(snapshot.enemies[0].id, id);
        assert_eq!(snapshot.enemies[0].speed, 0.0);
    }

    #[test]
    fn test_aim_at_self_clears_aim() {
        let mut game = Game::new(1);
        let p = game.get_state().player;
        game.aim_at(Vec2::new(p.x + 10.0, p.y));
        assert!(game.get_state().player.aiming);
        game.aim_at(Vec2::new(p.x, p.y));
        assert!(!game.get_state().player.aiming);
    }

    #[test]
    fn test_advance_frame_runs_fixed_steps() {
        let mut game = Game::new(1);
        assert_eq!(game.advance_frame(0.05), 0, "idle games don't step");
        game.start();
        assert_eq!(game.advance_frame(SIM_DT * 2.5), 2);
        // Leftover half step carries over
        assert_eq!(game.advance_frame(SIM_DT * 0.6), 1);
        assert_eq!(game.get_state().tick, 3);
    }

    #[test]
    fn test_advance_frame_caps_substeps() {
        let mut game = Game::new(1);
        game.start();
        assert_eq!(game.advance_frame(10.0), MAX_SUBSTEPS);
        assert_eq!(game.advance_frame(0.0), 0);
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut game = Game::new(1);
        game.start();
        game.add_enemy(EnemySpec::at(50.0, 50.0, 0.0)).unwrap();
        let json = serde_json::to_string(&game.get_state()).unwrap();
        assert!(json.contains("\"phase\":\"Playing\""));
        assert!(json.contains("\"enemies\""));
    }

    #[test]
    fn test_nan_move_axis_keeps_archer_in_place() {
        let mut game = Game::new(1);
        game.start();
        game.set_move_axis(Vec2::new(1.0, 0.0));
        game.set_move_axis(Vec2::new(f32::NAN, 0.0));
        let start = game.get_state().player;
        game.tick(1.0);
        let moved = game.get_state().player;
        // The last valid axis is still held
        assert!((moved.x - (start.x + game.state().settings.player_speed)).abs() < 1e-3);
        assert_eq!(moved.y, start.y);

        game.set_move_axis(Vec2::ZERO);
        game.move_player(Vec2::new(f32::NAN, f32::NAN));
        game.tick(0.0);
        assert_eq!(game.get_state().player.x, moved.x);
    }

    #[test]
    fn test_with_settings_validates() {
        let bad = Settings {
            arrow_speed: 0.0,
            ..Default::default()
        };
        assert!(Game::with_settings(1, bad).is_err());
    }
}
