//! Game state and core simulation types
//!
//! The entity store: viewport, player, live obstacles and score. Only the
//! step function and the input handler mutate it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::SimClock;
use super::collision::Aabb;
use super::spawn::{SpawnPolicy, SpawnRequest};
use super::tick::{Command, Direction};
use crate::clamp_to_extent;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Run ended, waiting for a restart
    GameOver,
}

/// Visible drawing area in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Both dimensions finite and positive
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Convert a fraction of viewport height to pixels
    #[inline]
    pub fn scale(&self, fraction: f32) -> f32 {
        fraction * self.height
    }
}

/// The player-controlled turtle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner in pixels
    pub pos: Vec2,
}

impl Player {
    /// Horizontally centered, on the configured start row
    pub fn centered(viewport: Viewport, tuning: &Tuning) -> Self {
        let size = viewport.scale(tuning.player_size);
        let mut player = Self {
            pos: Vec2::new(
                (viewport.width - size) / 2.0,
                viewport.scale(tuning.player_y),
            ),
        };
        player.clamp(viewport, size);
        player
    }

    /// Keep the whole box on screen
    pub fn clamp(&mut self, viewport: Viewport, size: f32) {
        self.pos.x = clamp_to_extent(self.pos.x, size, viewport.width);
        self.pos.y = clamp_to_extent(self.pos.y, size, viewport.height);
    }
}

/// Falling sprite types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    Laptop,
    Phone,
    Battery,
    Printer,
    Monitor,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 5] = [
        ObstacleKind::Laptop,
        ObstacleKind::Phone,
        ObstacleKind::Battery,
        ObstacleKind::Printer,
        ObstacleKind::Monitor,
    ];

    /// Emoji drawn for this kind
    pub fn glyph(&self) -> &'static str {
        match self {
            ObstacleKind::Laptop => "\u{1F4BB}",
            ObstacleKind::Phone => "\u{1F4F1}",
            ObstacleKind::Battery => "\u{1F50B}",
            ObstacleKind::Printer => "\u{1F5A8}\u{FE0F}",
            ObstacleKind::Monitor => "\u{1F5A5}\u{FE0F}",
        }
    }
}

/// A falling obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Top-left corner in pixels
    pub pos: Vec2,
    /// Box side, fraction of viewport height
    pub size: f32,
    /// Fall per step, fraction of viewport height
    pub fall_speed: f32,
    pub kind: ObstacleKind,
    /// Already scored or collided
    pub consumed: bool,
}

impl Obstacle {
    pub fn from_request(id: u32, request: SpawnRequest) -> Self {
        Self {
            id,
            pos: request.pos,
            size: request.size,
            fall_speed: request.fall_speed,
            kind: request.kind,
            consumed: false,
        }
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was created from
    seed: u64,
    pub tuning: Tuning,
    pub viewport: Viewport,
    pub phase: GamePhase,
    pub score: u32,
    pub player: Player,
    /// Live obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    pub spawner: SpawnPolicy,
    pub clock: SimClock,
    pub(crate) rng: Pcg32,
    /// Steps executed since creation (not reset on restart)
    steps: u64,
    /// Next entity ID, never rewound
    next_id: u32,
}

impl GameState {
    /// Create a new game in the `Playing` phase with a running clock
    pub fn new(seed: u64, viewport: Viewport, tuning: Tuning) -> Self {
        let mut clock = SimClock::default();
        clock.start();
        Self {
            seed,
            player: Player::centered(viewport, &tuning),
            tuning,
            viewport,
            phase: GamePhase::Playing,
            score: 0,
            obstacles: Vec::new(),
            spawner: SpawnPolicy::new(),
            clock,
            rng: Pcg32::seed_from_u64(seed),
            steps: 0,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub(crate) fn count_step(&mut self) {
        self.steps += 1;
    }

    /// Player box side in pixels
    pub fn player_size(&self) -> f32 {
        self.viewport.scale(self.tuning.player_size)
    }

    pub fn player_box(&self) -> Aabb {
        Aabb::square(self.player.pos, self.player_size())
    }

    pub fn obstacle_box(&self, obstacle: &Obstacle) -> Aabb {
        Aabb::square(obstacle.pos, self.viewport.scale(obstacle.size))
    }

    /// Pull the player and obstacle columns back inside the viewport.
    ///
    /// Obstacles are only clamped horizontally; they legitimately sit above
    /// the top edge after spawning and below the bottom edge before pruning.
    pub fn clamp_to_viewport(&mut self) {
        let size = self.player_size();
        self.player.clamp(self.viewport, size);

        let viewport = self.viewport;
        for obstacle in &mut self.obstacles {
            let size = viewport.scale(obstacle.size);
            obstacle.pos.x = clamp_to_extent(obstacle.pos.x, size, viewport.width);
        }
    }

    /// Record a new viewport size. Positions are re-clamped on the next step.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height);
        log::debug!("Viewport resized to {}x{}", width, height);
    }

    /// Handle a discrete input command
    pub fn apply_command(&mut self, command: Command) {
        let direction = match command {
            Command::Restart => {
                self.reset();
                return;
            }
            Command::Move(direction) => direction,
        };

        if self.phase != GamePhase::Playing {
            return;
        }

        let step = self.tuning.move_step;
        let delta = match direction {
            Direction::Left => Vec2::new(-step, 0.0),
            Direction::Right => Vec2::new(step, 0.0),
            Direction::Up if self.tuning.vertical_movement => Vec2::new(0.0, -step),
            Direction::Down if self.tuning.vertical_movement => Vec2::new(0.0, step),
            Direction::Up | Direction::Down => return,
        };

        self.player.pos += delta;
        let size = self.player_size();
        self.player.clamp(self.viewport, size);
    }

    /// Start a fresh run: clear obstacles, zero the score, re-center the
    /// player and restart the clock so no pre-reset tick can fire.
    pub fn reset(&mut self) {
        self.obstacles.clear();
        self.score = 0;
        self.player = Player::centered(self.viewport, &self.tuning);
        self.phase = GamePhase::Playing;
        self.clock.stop();
        self.clock.start();
        self.spawner.rearm();
        log::debug!("Game reset");
    }

    /// Collision ended the run
    pub(crate) fn enter_game_over(&mut self) {
        self.phase = GamePhase::GameOver;
        self.clock.stop();
        self.spawner.disarm();
        log::debug!("Game over with score {}", self.score);
    }
}
