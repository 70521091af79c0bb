//! Data-driven game balance
//!
//! Every balance constant the simulation reads lives in [`Tuning`]. The
//! browser build can override any subset of it with a JSON object; missing
//! fields keep their defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Rejected tuning values
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("spawn interval must be positive, got {0} ms")]
    SpawnInterval(f64),
    #[error("{name} must be in (0, 1], got {value}")]
    Fraction { name: &'static str, value: f32 },
    #[error("{name} range is inverted: min {min} > max {max}")]
    InvertedRange {
        name: &'static str,
        min: f32,
        max: f32,
    },
    #[error("move step must be positive, got {0}")]
    MoveStep(f32),
}

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Milliseconds between spawns
    pub spawn_interval_ms: f64,
    /// Player box side, fraction of viewport height
    pub player_size: f32,
    /// Player start row, fraction of viewport height
    pub player_y: f32,
    /// Pixels per directional command
    pub move_step: f32,
    /// Whether Up/Down commands move the player
    pub vertical_movement: bool,
    /// Obstacle side bounds, fraction of viewport height
    pub min_obstacle_size: f32,
    pub max_obstacle_size: f32,
    /// Obstacle fall speed bounds, fraction of viewport height per step
    pub min_fall_speed: f32,
    pub max_fall_speed: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            spawn_interval_ms: SPAWN_INTERVAL_MS,
            player_size: PLAYER_SIZE,
            player_y: PLAYER_Y,
            move_step: MOVE_STEP,
            vertical_movement: true,
            min_obstacle_size: MIN_OBSTACLE_SIZE,
            max_obstacle_size: MAX_OBSTACLE_SIZE,
            min_fall_speed: MIN_FALL_SPEED,
            max_fall_speed: MAX_FALL_SPEED,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override and validate the result
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check every value is usable by the simulation
    pub fn validate(&self) -> Result<(), TuningError> {
        if !(self.spawn_interval_ms.is_finite() && self.spawn_interval_ms > 0.0) {
            return Err(TuningError::SpawnInterval(self.spawn_interval_ms));
        }
        if !(self.move_step.is_finite() && self.move_step > 0.0) {
            return Err(TuningError::MoveStep(self.move_step));
        }

        let fractions = [
            ("player_size", self.player_size),
            ("player_y", self.player_y),
            ("min_obstacle_size", self.min_obstacle_size),
            ("max_obstacle_size", self.max_obstacle_size),
            ("min_fall_speed", self.min_fall_speed),
            ("max_fall_speed", self.max_fall_speed),
        ];
        for (name, value) in fractions {
            if !(value > 0.0 && value <= 1.0) {
                return Err(TuningError::Fraction { name, value });
            }
        }

        if self.min_obstacle_size > self.max_obstacle_size {
            return Err(TuningError::InvertedRange {
                name: "obstacle_size",
                min: self.min_obstacle_size,
                max: self.max_obstacle_size,
            });
        }
        if self.min_fall_speed > self.max_fall_speed {
            return Err(TuningError::InvertedRange {
                name: "fall_speed",
                min: self.min_fall_speed,
                max: self.max_fall_speed,
            });
        }

        Ok(())
    }
}
