//! Game state and core simulation types
//!
//! Everything a session needs lives in [`GameState`]; stages receive it
//! explicitly and nothing is stored globally.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::clamp_to_arena;
use crate::settings::Settings;

/// Stable identity for enemies and arrows
pub type EntityId = u32;

/// Current phase of the session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the start command; nothing simulates
    #[default]
    Idle,
    /// Active gameplay
    Playing,
    /// Lives ran out; frozen until reset or start
    GameOver,
}

/// Something that happened during a step, for HUD text and effects
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    EnemySpawned { id: EntityId, pos: Vec2 },
    ArrowFired { id: EntityId, dir: Vec2 },
    EnemyKilled { enemy: EntityId, arrow: EntityId, pos: Vec2 },
    PlayerHit { enemy: EntityId, lives_left: u32 },
    ArrowExpired { id: EntityId },
    EnemyEscaped { id: EntityId },
    GameOver { score: u64 },
}

/// The archer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Last direction the archer looked in (unit vector)
    pub facing: Vec2,
    /// Active aim direction, if the pointer is over the arena
    pub aim: Option<Vec2>,
    /// Seconds until the bow can fire again
    pub cooldown: f32,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            facing: Vec2::X,
            aim: None,
            cooldown: 0.0,
        }
    }

    /// Point the bow along `dir`. A zero vector clears the aim.
    pub fn set_aim(&mut self, dir: Vec2) {
        match dir.try_normalize() {
            Some(dir) => {
                self.aim = Some(dir);
                self.facing = dir;
            }
            None => self.aim = None,
        }
    }

    /// Direction the next arrow leaves in
    pub fn shot_direction(&self) -> Vec2 {
        self.aim.unwrap_or(self.facing)
    }
}

/// An enemy marching on the castle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EntityId,
    pub pos: Vec2,
    /// Signed speed toward the player (pixels/s); negative retreats
    pub speed: f32,
    pub radius: f32,
}

/// An arrow in flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arrow {
    pub id: EntityId,
    pub origin: Vec2,
    /// Position at the start of the last step (swept hit tests)
    pub prev: Vec2,
    pub pos: Vec2,
    /// Unit direction of travel
    pub dir: Vec2,
    pub speed: f32,
    pub traveled: f32,
}

impl Arrow {
    pub fn new(id: EntityId, origin: Vec2, dir: Vec2, speed: f32) -> Self {
        Self {
            id,
            origin,
            prev: origin,
            pos: origin,
            dir: dir.normalize_or_zero(),
            speed,
            traveled: 0.0,
        }
    }
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub settings: Settings,
    pub phase: GamePhase,
    pub score: u64,
    /// Mirrors the player's remaining lives
    pub lives: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Player,
    /// Active enemies (sorted by id for determinism)
    pub enemies: Vec<Enemy>,
    /// Active arrows (sorted by id for determinism)
    pub arrows: Vec<Arrow>,
    /// Seconds until the next spawn attempt
    pub spawn_timer: f32,
    /// Current spawn interval (decays toward the minimum)
    pub spawn_interval: f32,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: EntityId,
}

impl GameState {
    /// Create an idle game with default settings
    pub fn new(seed: u64) -> Self {
        Self::with_settings(seed, Settings::default())
    }

    /// Create an idle game with the given settings
    pub fn with_settings(seed: u64, settings: Settings) -> Self {
        let player = Player::new(Self::player_start(&settings));
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Idle,
            score: 0,
            lives: settings.starting_lives,
            time_ticks: 0,
            player,
            enemies: Vec::new(),
            arrows: Vec::new(),
            spawn_timer: settings.spawn_interval_start,
            spawn_interval: settings.spawn_interval_start,
            events: Vec::new(),
            next_id: 1,
            settings,
        }
    }

    fn player_start(settings: &Settings) -> Vec2 {
        clamp_to_arena(
            Vec2::new(settings.player_start_x, settings.player_start_y),
            settings.arena_width,
            settings.arena_height,
        )
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Arena size as a vector
    pub fn arena(&self) -> Vec2 {
        Vec2::new(self.settings.arena_width, self.settings.arena_height)
    }

    // === Entity store primitives ===

    /// Add an enemy at `pos` and return its id
    pub fn add_enemy(&mut self, pos: Vec2, speed: f32) -> EntityId {
        let id = self.next_entity_id();
        self.enemies.push(Enemy {
            id,
            pos,
            speed,
            radius: self.settings.enemy_radius,
        });
        id
    }

    /// Remove an enemy by id. Returns whether it existed.
    pub fn remove_enemy(&mut self, id: EntityId) -> bool {
        let before = self.enemies.len();
        self.enemies.retain(|e| e.id != id);
        self.enemies.len() != before
    }

    /// Add an arrow leaving `origin` along `dir` and return its id
    pub fn add_arrow(&mut self, origin: Vec2, dir: Vec2) -> EntityId {
        let id = self.next_entity_id();
        self.arrows
            .push(Arrow::new(id, origin, dir, self.settings.arrow_speed));
        id
    }

    /// Remove an arrow by id. Returns whether it existed.
    pub fn remove_arrow(&mut self, id: EntityId) -> bool {
        let before = self.arrows.len();
        self.arrows.retain(|a| a.id != id);
        self.arrows.len() != before
    }

    pub fn clear_arrows(&mut self) {
        self.arrows.clear();
    }

    pub fn clear_enemies(&mut self) {
        self.enemies.clear();
    }

    /// Take all events queued since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Lifecycle ===

    /// Put every session value back to its initial state, keeping the phase
    fn reset_session(&mut self) {
        self.clear_enemies();
        self.clear_arrows();
        self.score = 0;
        self.lives = self.settings.starting_lives;
        self.time_ticks = 0;
        self.player = Player::new(Self::player_start(&self.settings));
        self.spawn_interval = self.settings.spawn_interval_start;
        self.spawn_timer = self.spawn_interval;
        self.events.clear();
    }

    /// Any phase -> Idle, with a clean session
    pub fn reset(&mut self) {
        self.reset_session();
        self.phase = GamePhase::Idle;
        log::info!("Game reset (seed {})", self.seed);
    }

    /// Idle/GameOver -> Playing, with a clean session. No-op while playing.
    pub fn start(&mut self) {
        if self.phase == GamePhase::Playing {
            log::debug!("Start ignored: already playing");
            return;
        }
        self.reset_session();
        self.phase = GamePhase::Playing;
        log::info!("Game started with {} lives", self.lives);
    }

    /// Take one life. Playing -> GameOver when none are left.
    ///
    /// Returns true if this loss ended the game.
    pub fn lose_life(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 && self.phase == GamePhase::Playing {
            self.phase = GamePhase::GameOver;
            self.events.push(GameEvent::GameOver { score: self.score });
            log::info!("Game over: score {}", self.score);
            return true;
        }
        false
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.enemies.sort_by_key(|e| e.id);
        self.arrows.sort_by_key(|a| a.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_idle_and_empty() {
        let state = GameState::new(7);
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.lives, crate::consts::STARTING_LIVES);
        assert!(state.enemies.is_empty());
        assert!(state.arrows.is_empty());
        assert_eq!(state.player.pos, Vec2::new(320.0, 180.0));
    }

    #[test]
    fn test_entity_ids_are_unique_across_kinds() {
        let mut state = GameState::new(7);
        let a = state.add_enemy(Vec2::new(10.0, 10.0), 0.0);
        let b = state.add_arrow(Vec2::ZERO, Vec2::X);
        let c = state.add_enemy(Vec2::new(20.0, 10.0), 0.0);
        assert!(a < b && b < c);
    }

    #[test]
    fn test_remove_by_id() {
        let mut state = GameState::new(7);
        let a = state.add_enemy(Vec2::new(10.0, 10.0), 0.0);
        let b = state.add_enemy(Vec2::new(20.0, 10.0), 0.0);
        assert!(state.remove_enemy(a));
        assert!(!state.remove_enemy(a));
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.enemies[0].id, b);

        let arrow = state.add_arrow(Vec2::ZERO, Vec2::Y);
        assert!(state.remove_arrow(arrow));
        assert!(state.arrows.is_empty());
    }

    #[test]
    fn test_lose_life_never_underflows() {
        let mut state = GameState::new(7);
        state.start();
        for _ in 0..10 {
            state.lose_life();
        }
        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        // Exactly one game-over event
        let overs = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(overs, 1);
    }

    #[test]
    fn test_start_is_noop_while_playing() {
        let mut state = GameState::new(7);
        state.start();
        state.score = 5;
        state.start();
        assert_eq!(state.score, 5);
    }

    #[test]
    fn test_reset_clears_session() {
        let mut state = GameState::new(7);
        state.start();
        state.add_enemy(Vec2::new(10.0, 10.0), 30.0);
        state.add_arrow(Vec2::ZERO, Vec2::X);
        state.score = 9;
        state.lose_life();
        state.reset();
        assert_eq!(state.phase, GamePhase::Idle);
        assert!(state.enemies.is_empty() && state.arrows.is_empty());
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, state.settings.starting_lives);
    }

    #[test]
    fn test_aim_zero_clears() {
        let mut player = Player::new(Vec2::ZERO);
        player.set_aim(Vec2::new(0.0, 4.0));
        assert_eq!(player.aim, Some(Vec2::Y));
        assert_eq!(player.facing, Vec2::Y);
        player.set_aim(Vec2::ZERO);
        assert_eq!(player.aim, None);
        // Facing sticks to the last real aim
        assert_eq!(player.shot_direction(), Vec2::Y);
    }
}
