//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One step per delivered clock tick
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod clock;
pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use clock::{SimClock, TickToken};
pub use collision::{Aabb, Resolution, resolve};
pub use spawn::{SpawnPolicy, SpawnRequest};
pub use state::{GamePhase, GameState, Obstacle, ObstacleKind, Player, Viewport};
pub use tick::{Command, Direction, GameEvent, tick};
