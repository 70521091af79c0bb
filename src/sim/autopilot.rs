//! Idle/demo mode: steer the player away from the nearest threat
//!
//! Produces ordinary [`Command`]s, so a driver feeds them in exactly like
//! keyboard input between steps.

use super::state::{GamePhase, GameState};
use super::tick::{Command, Direction};
use crate::consts::AUTOPILOT_LOOKAHEAD;

/// Pick a move for this frame, or `None` if nothing threatens the player
pub fn steer(state: &GameState) -> Option<Command> {
    if state.phase != GamePhase::Playing || !state.viewport.is_valid() {
        return None;
    }

    let player = state.player_box();
    let margin = state.tuning.move_step;
    let lookahead = state.viewport.scale(AUTOPILOT_LOOKAHEAD);

    // Lowest obstacle still above the player's bottom edge whose column,
    // widened by one move, covers the player
    let threat = state
        .obstacles
        .iter()
        .map(|o| state.obstacle_box(o))
        .filter(|b| b.min.y < player.max().y && player.min.y - b.max().y <= lookahead)
        .filter(|b| b.min.x < player.max().x + margin && b.max().x > player.min.x - margin)
        .max_by(|a, b| a.max().y.total_cmp(&b.max().y))?;

    let room_left = player.min.x;
    let room_right = state.viewport.width - player.max().x;
    let flee_left = threat.center().x >= player.center().x;

    let direction = match (flee_left, room_left > 0.0, room_right > 0.0) {
        (true, true, _) => Direction::Left,
        (true, false, _) => Direction::Right,
        (false, _, true) => Direction::Right,
        (false, _, false) => Direction::Left,
    };
    Some(Command::Move(direction))
}
