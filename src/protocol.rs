//! Wire messages for the chat bridge and the observer feed

use serde::{Deserialize, Serialize};

use crate::game::command::{GameCommand, VotingSignal};
use crate::game::direction::Direction;
use crate::game::location::Coordinates;

/// A chat line delivered by the transport bridge
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatLine {
    /// Raw message text
    pub text: String,
    /// Sender is the broadcaster or a moderator
    #[serde(default)]
    pub can_update_game_state: bool,
    /// Provider message id, echoed back in moderation requests
    #[serde(default)]
    pub id: Option<String>,
}

impl ChatLine {
    /// Parse a bridge frame. Frames that are not a JSON chat line are taken
    /// as a raw line from an unprivileged sender.
    pub fn parse(frame: &str) -> Self {
        serde_json::from_str(frame).unwrap_or_else(|_| ChatLine {
            text: frame.trim_end_matches(['\r', '\n']).to_string(),
            can_update_game_state: false,
            id: None,
        })
    }
}

/// Stage state for observers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageSnapshot {
    pub width_cells: i32,
    pub height_cells: i32,
    pub cell_size: u32,
    /// Head first
    pub snake: Vec<Coordinates>,
    pub food: Coordinates,
    pub score: u32,
    pub direction: Direction,
}

/// Messages sent to observers and chat bridges
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerMessage {
    /// Voting window opened
    Vote(VotingSignal),
    /// Winning command of a window
    Command(GameCommand),
    /// Stage after one simulation step
    Stage {
        #[serde(flatten)]
        stage: StageSnapshot,
        #[serde(rename = "highScore")]
        high_score: u32,
    },
    /// Ask the chat bridge to delete a consumed game message
    Moderate { id: String },
}

impl ServerMessage {
    /// Serialize message to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
