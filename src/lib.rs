//! Castle Arrows - a castle-defense archery arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, movement, collisions, game state)
//! - `game`: Command/query surface used by rendering and input frontends
//! - `settings`: Data-driven game balance

pub mod game;
pub mod settings;
pub mod sim;

pub use game::{Game, GameSnapshot};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one step per display frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the accumulator will accept (seconds)
    pub const MAX_FRAME_TIME: f32 = 0.25;

    /// Arena dimensions (logical pixels, origin top-left)
    pub const ARENA_WIDTH: f32 = 640.0;
    pub const ARENA_HEIGHT: f32 = 360.0;

    /// Player defaults - the archer stands in the middle of the courtyard
    pub const PLAYER_START_X: f32 = ARENA_WIDTH / 2.0;
    pub const PLAYER_START_Y: f32 = ARENA_HEIGHT / 2.0;
    pub const PLAYER_RADIUS: f32 = 16.0;
    /// Strafe speed for held movement keys (pixels/s)
    pub const PLAYER_SPEED: f32 = 90.0;
    pub const STARTING_LIVES: u32 = 3;

    /// Enemy defaults
    pub const ENEMY_RADIUS: f32 = 12.0;
    pub const ENEMY_MIN_SPEED: f32 = 28.0;
    pub const ENEMY_MAX_SPEED: f32 = 64.0;
    /// Upper bound on live enemies
    pub const ENEMY_CAP: usize = 48;

    /// Spawn pacing (seconds between spawns)
    pub const SPAWN_INTERVAL_START: f32 = 1.6;
    pub const SPAWN_INTERVAL_MIN: f32 = 0.45;
    /// Multiplicative interval decay applied after each spawn
    pub const SPAWN_INTERVAL_DECAY: f32 = 0.97;

    /// Arrow defaults
    pub const ARROW_SPEED: f32 = 420.0;
    pub const ARROW_MAX_TRAVEL: f32 = 600.0;
    /// Minimum time between two shots (seconds)
    pub const ARROW_COOLDOWN: f32 = 0.2;
    pub const MAX_ARROWS: usize = 24;

    /// Arrow tip to enemy centre
    pub const ARROW_HIT_RADIUS: f32 = ENEMY_RADIUS + 2.0;
    /// Enemy centre to player centre
    pub const CONTACT_RADIUS: f32 = PLAYER_RADIUS + ENEMY_RADIUS;
}

/// Whether a point lies inside `[-margin, width + margin] x [-margin, height + margin]`
#[inline]
pub fn in_arena(pos: Vec2, width: f32, height: f32, margin: f32) -> bool {
    pos.x >= -margin && pos.x <= width + margin && pos.y >= -margin && pos.y <= height + margin
}

/// Clamp a point into the arena rectangle
#[inline]
pub fn clamp_to_arena(pos: Vec2, width: f32, height: f32) -> Vec2 {
    pos.clamp(Vec2::ZERO, Vec2::new(width, height))
}

/// Map a distance along the arena perimeter (clockwise from the top-left
/// corner) to a point on the edge
pub fn perimeter_point(t: f32, width: f32, height: f32) -> Vec2 {
    let perimeter = 2.0 * (width + height);
    let t = t.rem_euclid(perimeter);
    if t < width {
        Vec2::new(t, 0.0)
    } else if t < width + height {
        Vec2::new(width, t - width)
    } else if t < 2.0 * width + height {
        Vec2::new(width - (t - width - height), height)
    } else {
        Vec2::new(0.0, height - (t - 2.0 * width - height))
    }
}
