//! Maps typed player input onto frame input.

use tile_rush_core::Direction;
use tile_rush_rendering::FrameInput;

/// Action requested by a single line of player input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum InputAction {
    /// Feed the frame to the simulation.
    Frame(FrameInput),
    /// Leave the game.
    Quit,
}

/// Interprets one line typed by the player. Unknown input yields an empty frame.
pub(crate) fn parse_line(line: &str) -> InputAction {
    let token = line.trim().to_ascii_lowercase();
    let mut frame = FrameInput::default();

    match token.as_str() {
        "q" | "quit" | "exit" => return InputAction::Quit,
        "p" | "pause" | "resume" => frame.pause_toggle = true,
        "n" | "next" | "r" | "reset" | "c" | "continue" => frame.acknowledge = true,
        other => frame.direction = parse_direction(other),
    }

    InputAction::Frame(frame)
}

fn parse_direction(token: &str) -> Option<Direction> {
    match token {
        "w" | "k" | "up" | "\u{1b}[a" => Some(Direction::Up),
        "s" | "j" | "down" | "\u{1b}[b" => Some(Direction::Down),
        "a" | "h" | "left" | "\u{1b}[d" => Some(Direction::Left),
        "d" | "l" | "right" | "\u{1b}[c" => Some(Direction::Right),
        _ => None,
    }
}
