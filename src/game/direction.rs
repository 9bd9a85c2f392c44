//! Direction enum for snake movement

use serde::{Deserialize, Serialize};

/// Direction carried by a game command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
    /// Keep the current heading. Only the voting scheduler produces this.
    Continue,
}

impl Direction {
    /// Parse a chat direction token (case-insensitive).
    ///
    /// `continue` is deliberately not accepted from chat.
    pub fn from_chat_token(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            _ => None,
        }
    }

    /// Lowercase name, matching the serialized form
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Continue => "continue",
        }
    }

    /// Grid offset of one step. `Continue` has none of its own.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Continue => (0, 0),
        }
    }
}
