//! Frame-driven simulation step
//!
//! One step per display refresh: clamp → spawn → advance → resolve → prune.
//! Positions are advanced before collision testing, so a fast obstacle is
//! judged at where it lands this step.

use super::collision::resolve;
use super::clock::TickToken;
use super::state::{GamePhase, GameState, Obstacle, ObstacleKind};

/// Directional input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// Discrete input commands, applied between steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Restart,
}

/// Things that happened during a step, for drivers to log or react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Spawned { id: u32, kind: ObstacleKind },
    Scored { id: u32, score: u32 },
    Collided { id: u32, score: u32 },
}

/// Run one simulation step if `token` is still live.
///
/// A stale or cancelled token (queued before a game over or reset) is a
/// no-op that returns no events.
pub fn tick(state: &mut GameState, token: TickToken, now_ms: f64) -> Vec<GameEvent> {
    if !state.clock.fire(token) || state.phase != GamePhase::Playing {
        return Vec::new();
    }
    state.count_step();

    state.clamp_to_viewport();
    // Nothing can move or collide sensibly in a degenerate viewport
    if !state.viewport.is_valid() {
        return Vec::new();
    }

    let mut events = Vec::new();

    if let Some(request) =
        state
            .spawner
            .maybe_spawn(now_ms, state.viewport, &state.tuning, &mut state.rng)
    {
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle::from_request(id, request));
        events.push(GameEvent::Spawned {
            id,
            kind: request.kind,
        });
    }

    let height = state.viewport.height;
    for obstacle in &mut state.obstacles {
        obstacle.pos.y += obstacle.fall_speed * height;
    }

    let player = state.player_box();
    let resolution = resolve(player, &mut state.obstacles, state.viewport);

    for id in resolution.scored_ids {
        state.score = state.score.saturating_add(1);
        events.push(GameEvent::Scored {
            id,
            score: state.score,
        });
    }

    if let Some(id) = resolution.collided_with {
        state.enter_game_over();
        events.push(GameEvent::Collided {
            id,
            score: state.score,
        });
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SPAWN_INTERVAL_MS;
    use crate::sim::state::Viewport;
    use crate::tuning::Tuning;
    use glam::Vec2;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn new_state() -> GameState {
        GameState::new(12345, Viewport::new(800.0, 600.0), Tuning::default())
    }

    fn step(state: &mut GameState, now: f64) -> Vec<GameEvent> {
        let token = state.clock.schedule().expect("clock should be running");
        tick(state, token, now)
    }

    /// Place an obstacle directly, bypassing the spawn policy
    fn place(state: &mut GameState, x: f32, y: f32, size_px: f32, speed_px: f32) -> u32 {
        let id = state.next_entity_id();
        let height = state.viewport.height;
        state.obstacles.push(Obstacle {
            id,
            pos: Vec2::new(x, y),
            size: size_px / height,
            fall_speed: speed_px / height,
            kind: ObstacleKind::Laptop,
            consumed: false,
        });
        id
    }

    #[test]
    fn test_spawns_on_interval() {
        let mut state = new_state();
        // First step anchors the interval
        assert!(step(&mut state, 0.0).is_empty());
        assert!(step(&mut state, SPAWN_INTERVAL_MS - 1.0).is_empty());

        let events = step(&mut state, SPAWN_INTERVAL_MS);
        assert!(matches!(events.as_slice(), [GameEvent::Spawned { .. }]));
        assert_eq!(state.obstacles.len(), 1);
        // Spawned above the viewport, then advanced once
        let obstacle = &state.obstacles[0];
        let size_px = state.viewport.scale(obstacle.size);
        let fall_px = state.viewport.scale(obstacle.fall_speed);
        assert!((obstacle.pos.y - (fall_px - size_px)).abs() < 1e-3);
    }

    #[test]
    fn test_obstacle_dodged_scores_once() {
        // 800x600, player 96x96 at (352, 450); obstacle at x=400 falling 5px/step.
        // The player steps out of its column first.
        let mut state = new_state();
        for _ in 0..9 {
            state.apply_command(Command::Move(Direction::Left));
        }
        assert_eq!(state.player.pos.x, 0.0);

        let id = place(&mut state, 400.0, -80.0, 80.0, 5.0);
        for _ in 0..130 {
            step(&mut state, 0.0);
        }
        assert_eq!(state.score, 0);
        assert_eq!(state.obstacles.len(), 1);

        let mut scored = Vec::new();
        for _ in 0..20 {
            for event in step(&mut state, 0.0) {
                if let GameEvent::Scored { id, .. } = event {
                    scored.push(id);
                }
            }
        }
        assert_eq!(scored, vec![id]);
        assert_eq!(state.score, 1);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_collision_ends_game_on_exact_step() {
        let mut state = new_state();
        // Exits early on the far left for a non-zero score
        place(&mut state, 0.0, 590.0, 80.0, 7.0);
        // Same column as the player: bottom edge crosses y=450 on step 65
        let hit_id = place(&mut state, 400.0, -80.0, 80.0, 7.0);

        let mut collided_on = None;
        for n in 1..=100 {
            let score_before = state.score;
            let events = step(&mut state, 0.0);
            if state.phase == GamePhase::GameOver {
                assert_eq!(
                    events.last(),
                    Some(&GameEvent::Collided {
                        id: hit_id,
                        score: score_before
                    })
                );
                assert_eq!(state.score, score_before);
                collided_on = Some(n);
                break;
            }
        }

        assert_eq!(collided_on, Some(65));
        assert_eq!(state.score, 1);
        // Terminal frame keeps the obstacle that hit
        assert_eq!(state.obstacles.len(), 1);
        assert!(state.obstacles[0].consumed);
        assert!(!state.clock.is_running());
    }

    #[test]
    fn test_exit_and_hit_in_same_step() {
        let mut state = new_state();
        // Top edge crosses the bottom on the same step the other one lands on the player
        let exit_id = place(&mut state, 0.0, 595.0, 80.0, 10.0);
        let hit_id = place(&mut state, 380.0, 420.0, 60.0, 10.0);

        let events = step(&mut state, 0.0);
        assert_eq!(
            events,
            vec![
                GameEvent::Scored {
                    id: exit_id,
                    score: 1
                },
                GameEvent::Collided {
                    id: hit_id,
                    score: 1
                },
            ]
        );
        assert_eq!(state.score, 1);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.obstacles[0].id, hit_id);
        assert!(state.obstacles[0].consumed);
    }

    #[test]
    fn test_exit_needs_top_edge_past_bottom() {
        let mut state = new_state();
        // Parked with its top edge exactly on the bottom edge
        let id = place(&mut state, 0.0, 600.0, 80.0, 0.0);
        assert!(step(&mut state, 0.0).is_empty());
        assert_eq!(state.score, 0);
        assert_eq!(state.obstacles.len(), 1);

        state.obstacles[0].pos.y = 600.5;
        let events = step(&mut state, 0.0);
        assert_eq!(events, vec![GameEvent::Scored { id, score: 1 }]);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_resize_clamps_on_next_step() {
        let mut state = new_state();
        state.player.pos.x = 750.0;
        state.resize(400.0, 300.0);
        step(&mut state, 0.0);
        assert!(state.player.pos.x <= 400.0 - state.player_size());
        assert!(state.player.pos.y <= 300.0 - state.player_size());
    }

    #[test]
    fn test_resize_clamps_obstacle_columns() {
        let mut state = new_state();
        place(&mut state, 780.0, 0.0, 60.0, 1.0);
        state.resize(400.0, 600.0);
        step(&mut state, 0.0);
        let obstacle = &state.obstacles[0];
        assert!(obstacle.pos.x + state.viewport.scale(obstacle.size) <= 400.0 + 1e-3);
    }

    #[test]
    fn test_game_over_freezes_state() {
        let mut state = new_state();
        place(&mut state, 352.0, 400.0, 96.0, 1.0);
        step(&mut state, 0.0);
        assert_eq!(state.phase, GamePhase::GameOver);

        // The clock refuses to issue new ticks and input no longer moves anything
        assert!(state.clock.schedule().is_none());
        assert!(!state.spawner.is_armed());
        let frozen = state.snapshot();
        state.apply_command(Command::Move(Direction::Right));
        assert_eq!(state.snapshot(), frozen);
    }

    #[test]
    fn test_stale_tick_after_reset_is_ignored() {
        let mut state = new_state();
        let stale = state.clock.schedule().unwrap();
        place(&mut state, 0.0, 0.0, 60.0, 5.0);

        state.reset();
        let steps = state.steps();
        assert!(tick(&mut state, stale, 10_000.0).is_empty());
        assert_eq!(state.steps(), steps);
        assert!(state.obstacles.is_empty());

        // The fresh clock still works
        step(&mut state, 10_000.0);
        assert_eq!(state.steps(), steps + 1);
    }

    #[test]
    fn test_reset_after_game_over() {
        let mut state = new_state();
        place(&mut state, 0.0, 590.0, 80.0, 20.0);
        step(&mut state, 0.0);
        assert_eq!(state.score, 1);
        place(&mut state, 352.0, 400.0, 96.0, 1.0);
        step(&mut state, 0.0);
        assert_eq!(state.phase, GamePhase::GameOver);

        state.apply_command(Command::Move(Direction::Left));
        state.apply_command(Command::Restart);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert!(state.obstacles.is_empty());
        assert!((state.player.pos.x - 352.0).abs() < 1e-3);
        assert!(state.clock.is_running());

        // Spawn interval restarts from the first post-reset step
        assert!(step(&mut state, 50_000.0).is_empty());
        assert_eq!(
            state.spawner.next_due_ms(),
            Some(50_000.0 + SPAWN_INTERVAL_MS)
        );
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut state = new_state();
        state.reset();
        let first = state.snapshot();
        state.reset();
        assert_eq!(state.snapshot(), first);
        assert_eq!(state.score, 0);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_zero_viewport_step_is_inert() {
        let mut state = GameState::new(1, Viewport::new(0.0, 0.0), Tuning::default());
        for n in 0..100 {
            assert!(step(&mut state, n as f64 * 100.0).is_empty());
        }
        assert!(state.obstacles.is_empty());
        assert_eq!(state.phase, GamePhase::Playing);

        // Becomes playable once a real size arrives
        state.resize(800.0, 600.0);
        step(&mut state, 20_000.0);
        step(&mut state, 20_000.0 + SPAWN_INTERVAL_MS);
        assert_eq!(state.obstacles.len(), 1);
        assert!(state.obstacles[0].pos.x.is_finite());
    }

    #[test]
    fn test_determinism() {
        let run = || {
            let mut state = GameState::new(99999, Viewport::new(800.0, 600.0), Tuning::default());
            let mut now = 0.0;
            for n in 0..600 {
                if n % 7 == 0 {
                    state.apply_command(Command::Move(Direction::Right));
                }
                if n % 11 == 0 {
                    state.apply_command(Command::Move(Direction::Left));
                }
                let Some(token) = state.clock.schedule() else { break };
                tick(&mut state, token, now);
                now += 1000.0 / 60.0;
            }
            state.snapshot()
        };
        assert_eq!(run(), run());
    }

    proptest! {
        #[test]
        fn prop_score_monotonic_and_ids_unique(
            seed in any::<u64>(),
            moves in proptest::collection::vec(0u8..5, 50..400),
        ) {
            let mut state = GameState::new(seed, Viewport::new(800.0, 600.0), Tuning::default());
            let mut removed: HashSet<u32> = HashSet::new();
            let mut now = 0.0;

            for m in moves {
                let command = match m {
                    0 => Command::Move(Direction::Left),
                    1 => Command::Move(Direction::Right),
                    2 => Command::Move(Direction::Up),
                    3 => Command::Move(Direction::Down),
                    _ => Command::Move(Direction::Left),
                };
                state.apply_command(command);

                let before_ids: HashSet<u32> = state.obstacles.iter().map(|o| o.id).collect();
                let score_before = state.score;
                let Some(token) = state.clock.schedule() else { break };
                tick(&mut state, token, now);
                now += 1000.0 / 60.0;

                prop_assert!(state.score >= score_before);

                let after_ids: HashSet<u32> = state.obstacles.iter().map(|o| o.id).collect();
                prop_assert_eq!(after_ids.len(), state.obstacles.len());
                for id in &after_ids {
                    prop_assert!(!removed.contains(id));
                }
                removed.extend(before_ids.difference(&after_ids));

                // Game over exactly when something overlaps the player
                let player = state.player_box();
                let overlapping = state
                    .obstacles
                    .iter()
                    .any(|o| player.overlaps(&state.obstacle_box(o)));
                prop_assert_eq!(state.phase == GamePhase::GameOver, overlapping);
            }

            if state.phase == GamePhase::GameOver {
                let score = state.score;
                prop_assert!(state.clock.schedule().is_none());
                state.apply_command(Command::Move(Direction::Left));
                prop_assert_eq!(state.score, score);
            }
        }
    }
}
