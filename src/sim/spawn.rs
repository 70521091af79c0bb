//! Obstacle spawn policy
//!
//! Spawns on a fixed wall-clock interval, anchored at the first step after
//! the policy is (re)armed.

use glam::Vec2;
use rand::Rng;

use super::state::{ObstacleKind, Viewport};
use crate::tuning::Tuning;

/// Everything needed to build an obstacle except its ID
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRequest {
    /// Top-left corner in pixels (above the viewport)
    pub pos: Vec2,
    /// Fraction of viewport height
    pub size: f32,
    /// Fraction of viewport height per step
    pub fall_speed: f32,
    pub kind: ObstacleKind,
}

/// Decides when and where obstacles appear
#[derive(Debug, Clone)]
pub struct SpawnPolicy {
    armed: bool,
    /// Timestamp of the next spawn; `None` until the first armed step
    next_due_ms: Option<f64>,
}

impl Default for SpawnPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl SpawnPolicy {
    pub fn new() -> Self {
        Self {
            armed: true,
            next_due_ms: None,
        }
    }

    /// Resume spawning; the interval restarts from the next step
    pub fn rearm(&mut self) {
        self.armed = true;
        self.next_due_ms = None;
    }

    /// Stop spawning until `rearm`
    pub fn disarm(&mut self) {
        self.armed = false;
        self.next_due_ms = None;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn next_due_ms(&self) -> Option<f64> {
        self.next_due_ms
    }

    /// Produce at most one obstacle for the step at `now_ms`
    pub fn maybe_spawn<R: Rng>(
        &mut self,
        now_ms: f64,
        viewport: Viewport,
        tuning: &Tuning,
        rng: &mut R,
    ) -> Option<SpawnRequest> {
        if !self.armed {
            return None;
        }

        let interval = tuning.spawn_interval_ms;
        let Some(due) = self.next_due_ms else {
            self.next_due_ms = Some(now_ms + interval);
            return None;
        };
        if now_ms < due {
            return None;
        }
        // Keep the deadline so the spawn lands on the first usable step
        if !viewport.is_valid() {
            return None;
        }

        // No catch-up bursts after a stall
        let next = due + interval;
        self.next_due_ms = Some(if next <= now_ms { now_ms + interval } else { next });

        let size = roll(rng, tuning.min_obstacle_size, tuning.max_obstacle_size);
        let size_px = viewport.scale(size);
        let max_x = viewport.width - size_px;
        if !(size_px.is_finite() && max_x >= 0.0) {
            return None;
        }

        let x = roll(rng, 0.0, max_x);
        let fall_speed = roll(rng, tuning.min_fall_speed, tuning.max_fall_speed);
        let kind = ObstacleKind::ALL[rng.random_range(0..ObstacleKind::ALL.len())];

        Some(SpawnRequest {
            pos: Vec2::new(x, -size_px),
            size,
            fall_speed,
            kind,
        })
    }
}

/// Uniform in `[min, max]`, collapsing to `min` for an empty range
fn roll<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    if min < max {
        rng.random_range(min..=max)
    } else {
        min
    }
}
