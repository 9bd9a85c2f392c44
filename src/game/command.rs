//! Game commands and voting signals exchanged between the voting side and the engine

use serde::{Deserialize, Serialize};

use super::direction::Direction;

/// One movement order: turn to `direction`, then advance `distance` cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameCommand {
    pub direction: Direction,
    pub distance: u32,
}

impl GameCommand {
    pub fn new(direction: Direction, distance: u32) -> Self {
        Self { direction, distance }
    }

    /// Grouping key for vote counting, e.g. `right5`
    pub fn popularity_key(&self) -> String {
        format!("{}{}", self.direction.as_str(), self.distance).to_lowercase()
    }
}

/// Emitted when a voting window opens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VotingSignal {
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_popularity_key() {
        assert_eq!(GameCommand::new(Direction::Right, 5).popularity_key(), "right5");
        assert_eq!(GameCommand::new(Direction::Continue, 1).popularity_key(), "continue1");
    }

    #[test]
    fn test_wire_field_names() {
        let json = serde_json::to_string(&GameCommand::new(Direction::Up, 3)).unwrap();
        assert_eq!(json, r#"{"direction":"up","distance":3}"#);

        let json = serde_json::to_string(&VotingSignal { duration_ms: 5000 }).unwrap();
        assert_eq!(json, r#"{"durationMs":5000}"#);
    }
}
