//! Turtle Dodge - a falling-obstacle arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, movement, collisions, game state)
//! - `snapshot`: Read-only view of the simulation handed to the renderer
//! - `renderer`: Canvas 2D drawing (wasm only)
//! - `platform`: Browser key mapping
//! - `tuning`: Data-driven game balance

pub mod platform;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
pub mod sim;
pub mod snapshot;
pub mod tuning;

pub use snapshot::Snapshot;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
///
/// Sizes and speeds marked "of viewport height" are fractions, scaled to
/// pixels by the current viewport each time they are used.
pub mod consts {
    /// Milliseconds between obstacle spawns
    pub const SPAWN_INTERVAL_MS: f64 = 700.0;

    /// Player box side (of viewport height)
    pub const PLAYER_SIZE: f32 = 0.16;
    /// Player start row (of viewport height)
    pub const PLAYER_Y: f32 = 0.75;
    /// Pixels moved per directional key press
    pub const MOVE_STEP: f32 = 40.0;

    /// Obstacle box side bounds (of viewport height)
    pub const MIN_OBSTACLE_SIZE: f32 = 0.07;
    pub const MAX_OBSTACLE_SIZE: f32 = 0.12;

    /// Obstacle fall speed bounds (of viewport height per step)
    pub const MIN_FALL_SPEED: f32 = 0.004;
    pub const MAX_FALL_SPEED: f32 = 0.010;

    /// How far above the player the autopilot looks for threats (of viewport height)
    pub const AUTOPILOT_LOOKAHEAD: f32 = 0.5;
}

/// Clamp the near edge of a box of `size` so the box stays inside `[0, extent]`.
///
/// Collapses to 0 when the box is larger than the extent, so this never
/// panics the way `f32::clamp` does on an inverted range.
#[inline]
pub fn clamp_to_extent(value: f32, size: f32, extent: f32) -> f32 {
    let max = (extent - size).max(0.0);
    value.max(0.0).min(max)
}
