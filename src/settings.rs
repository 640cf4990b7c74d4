//! Game balance settings
//!
//! Every gameplay tunable lives here so frontends and tests can swap them
//! without touching the simulation. Defaults come from [`crate::consts`].

use std::path::Path;

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Tunable gameplay parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,

    // === Player ===
    pub player_start_x: f32,
    pub player_start_y: f32,
    pub player_speed: f32,
    pub starting_lives: u32,

    // === Enemies ===
    pub enemy_radius: f32,
    pub enemy_min_speed: f32,
    pub enemy_max_speed: f32,
    pub enemy_cap: usize,

    // === Spawning ===
    pub spawn_interval_start: f32,
    pub spawn_interval_min: f32,
    pub spawn_interval_decay: f32,

    // === Arrows ===
    pub arrow_speed: f32,
    pub arrow_max_travel: f32,
    pub arrow_cooldown: f32,
    pub max_arrows: usize,

    // === Collision ===
    pub arrow_hit_radius: f32,
    pub contact_radius: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,

            player_start_x: PLAYER_START_X,
            player_start_y: PLAYER_START_Y,
            player_speed: PLAYER_SPEED,
            starting_lives: STARTING_LIVES,

            enemy_radius: ENEMY_RADIUS,
            enemy_min_speed: ENEMY_MIN_SPEED,
            enemy_max_speed: ENEMY_MAX_SPEED,
            enemy_cap: ENEMY_CAP,

            spawn_interval_start: SPAWN_INTERVAL_START,
            spawn_interval_min: SPAWN_INTERVAL_MIN,
            spawn_interval_decay: SPAWN_INTERVAL_DECAY,

            arrow_speed: ARROW_SPEED,
            arrow_max_travel: ARROW_MAX_TRAVEL,
            arrow_cooldown: ARROW_COOLDOWN,
            max_arrows: MAX_ARROWS,

            arrow_hit_radius: ARROW_HIT_RADIUS,
            contact_radius: CONTACT_RADIUS,
        }
    }
}

impl Settings {
    /// Parse settings from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json).context("invalid settings JSON")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file on disk
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read settings {}", path.display()))?;
        let settings = Self::from_json_str(&json)
            .with_context(|| format!("load settings {}", path.display()))?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Reject values the simulation can't run with
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.arena_width > 0.0 && self.arena_height > 0.0,
            "arena must be non-empty (got {}x{})",
            self.arena_width,
            self.arena_height
        );
        ensure!(
            (0.0..=self.arena_width).contains(&self.player_start_x)
                && (0.0..=self.arena_height).contains(&self.player_start_y),
            "player start ({}, {}) is outside the arena",
            self.player_start_x,
            self.player_start_y
        );
        ensure!(self.starting_lives > 0, "starting_lives must be at least 1");
        ensure!(self.player_speed >= 0.0, "player_speed must not be negative");
        ensure!(self.enemy_radius > 0.0, "enemy_radius must be positive");
        ensure!(
            self.enemy_min_speed > 0.0 && self.enemy_min_speed <= self.enemy_max_speed,
            "enemy speed range [{}, {}] is invalid",
            self.enemy_min_speed,
            self.enemy_max_speed
        );
        ensure!(
            self.spawn_interval_min > 0.0 && self.spawn_interval_min <= self.spawn_interval_start,
            "spawn interval range [{}, {}] is invalid",
            self.spawn_interval_min,
            self.spawn_interval_start
        );
        ensure!(
            self.spawn_interval_decay > 0.0 && self.spawn_interval_decay <= 1.0,
            "spawn_interval_decay must be in (0, 1] (got {})",
            self.spawn_interval_decay
        );
        ensure!(self.arrow_speed > 0.0, "arrow_speed must be positive");
        ensure!(self.arrow_max_travel > 0.0, "arrow_max_travel must be positive");
        ensure!(self.arrow_cooldown >= 0.0, "arrow_cooldown must not be negative");
        ensure!(self.max_arrows > 0, "max_arrows must be at least 1");
        ensure!(
            self.arrow_hit_radius > 0.0 && self.contact_radius > 0.0,
            "collision radii must be positive"
        );
        Ok(())
    }
}
