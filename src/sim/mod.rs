//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod motion;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{CollisionReport, enemy_player_contact, handle_collisions, swept_hit};
pub use motion::{MotionReport, advance, move_player};
pub use state::{Arrow, Enemy, EntityId, GameEvent, GamePhase, GameState, Player};
pub use tick::{TickInput, TickReport, shoot_arrow, tick};
