//! Collision detection and scoring
//!
//! Obstacles are tested at their post-advance positions. A collision
//! outranks scoring for the obstacle that hit; other obstacles leaving
//! through the bottom in the same step still score.

use glam::Vec2;

use super::state::{Obstacle, Viewport};

/// Axis-aligned box, `min` is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn square(min: Vec2, side: f32) -> Self {
        Self::new(min, Vec2::splat(side))
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Strict overlap; boxes that only touch do not collide
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.min.x + other.size.x
            && self.min.x + self.size.x > other.min.x
            && self.min.y < other.min.y + other.size.y
            && self.min.y + self.size.y > other.min.y
    }
}

/// Outcome of resolving one step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// Obstacle that hit the player
    pub collided_with: Option<u32>,
    /// Obstacles that left through the bottom, in store order
    pub scored_ids: Vec<u32>,
}

impl Resolution {
    pub fn collided(&self) -> bool {
        self.collided_with.is_some()
    }

    pub fn scored(&self) -> u32 {
        self.scored_ids.len() as u32
    }
}

/// Resolve collisions and exits for the current obstacle positions.
///
/// The first obstacle overlapping the player is marked consumed and kept for
/// the terminal frame; it never scores, even if it is also past the bottom.
/// Every other obstacle whose top edge is below the viewport is consumed,
/// removed and scored, whether or not the step collided.
pub fn resolve(player: Aabb, obstacles: &mut Vec<Obstacle>, viewport: Viewport) -> Resolution {
    let collided_with = obstacles
        .iter_mut()
        .filter(|o| !o.consumed)
        .find(|o| player.overlaps(&Aabb::square(o.pos, viewport.scale(o.size))))
        .map(|o| {
            o.consumed = true;
            o.id
        });

    let mut scored_ids = Vec::new();
    obstacles.retain_mut(|o| {
        if Some(o.id) == collided_with || o.pos.y <= viewport.height {
            return true;
        }
        o.consumed = true;
        scored_ids.push(o.id);
        false
    });

    Resolution {
        collided_with,
        scored_ids,
    }
}
