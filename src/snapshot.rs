//! Read-only view of the simulation for renderers
//!
//! Everything is in pixels for the viewport the snapshot was taken at.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::{GamePhase, GameState, ObstacleKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub size: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleView {
    pub id: u32,
    pub pos: Vec2,
    pub size: f32,
    pub kind: ObstacleKind,
}

/// One frame's worth of drawable state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub player: PlayerView,
    pub obstacles: Vec<ObstacleView>,
    pub score: u32,
    pub phase: GamePhase,
}

impl GameState {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            player: PlayerView {
                pos: self.player.pos,
                size: self.player_size(),
            },
            obstacles: self
                .obstacles
                .iter()
                .map(|o| ObstacleView {
                    id: o.id,
                    pos: o.pos,
                    size: self.viewport.scale(o.size),
                    kind: o.kind,
                })
                .collect(),
            score: self.score,
            phase: self.phase,
        }
    }
}
