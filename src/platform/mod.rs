//! Platform abstraction layer
//!
//! Maps browser `KeyboardEvent.key` values to simulation commands. Kept free
//! of `web_sys` so the mapping is testable on native builds.

use crate::sim::{Command, Direction};

/// What a key press asks the driver to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Forward to the simulation
    Sim(Command),
    /// Toggle the demo autopilot
    ToggleAutopilot,
}

/// Look up the action bound to a key, if any
pub fn action_for_key(key: &str) -> Option<KeyAction> {
    let command = match key {
        "ArrowLeft" => Command::Move(Direction::Left),
        "ArrowRight" => Command::Move(Direction::Right),
        "ArrowUp" => Command::Move(Direction::Up),
        "ArrowDown" => Command::Move(Direction::Down),
        "Enter" => Command::Restart,
        _ => match key.to_ascii_lowercase().as_str() {
            "a" => Command::Move(Direction::Left),
            "d" => Command::Move(Direction::Right),
            "w" => Command::Move(Direction::Up),
            "s" => Command::Move(Direction::Down),
            "r" => Command::Restart,
            "i" => return Some(KeyAction::ToggleAutopilot),
            _ => return None,
        },
    };
    Some(KeyAction::Sim(command))
}
