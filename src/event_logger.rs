//! Gameplay event journal (JSON lines) for replay and moderation review

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use tracing::{error, info, warn};

use crate::config::GameMode;
use crate::game::collision::Collision;
use crate::game::command::GameCommand;
use crate::game::location::Coordinates;

/// Types of game events that can be logged
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// A voting window closed with a winner
    VoteResolved {
        direction: String,
        distance: u32,
        /// Commands received in the window
        ballots: usize,
        /// Synthesized because the window was empty
        synthesized: bool,
    },
    /// A privileged chatter switched the game mode
    ModeChanged { mode: GameMode },
    /// Snake ate food
    FoodEaten { score: u32, location: LocationData },
    /// Snake collided and the stage was reset
    SnakeReset { cause: String, final_score: u32 },
    /// A new high score was persisted
    HighScore { score: u32 },
}

/// Location data for serialization
#[derive(Debug, Clone, Serialize)]
pub struct LocationData {
    pub x: i32,
    pub y: i32,
}

impl From<Coordinates> for LocationData {
    fn from(loc: Coordinates) -> Self {
        Self { x: loc.x, y: loc.y }
    }
}

/// Logged event with timestamp
#[derive(Debug, Serialize)]
struct LogEntry {
    /// Unix timestamp in milliseconds
    timestamp_ms: u128,
    /// The event data
    #[serde(flatten)]
    event: GameEvent,
}

/// Game event logger
pub struct EventLogger {
    /// File writer (None if logging disabled)
    writer: Option<Mutex<BufWriter<File>>>,
}

impl EventLogger {
    /// Open the journal at `path`, or a disabled logger when `path` is `None`
    pub fn new(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            info!("Event logging is disabled");
            return Self::disabled();
        };

        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                info!("Event logging enabled, writing to {}", path.display());
                Self {
                    writer: Some(Mutex::new(BufWriter::new(file))),
                }
            }
            Err(e) => {
                error!("Failed to open event log file {}: {}", path.display(), e);
                Self::disabled()
            }
        }
    }

    /// Logger that drops every event
    pub fn disabled() -> Self {
        Self { writer: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.writer.is_some()
    }

    /// Log a game event
    pub fn log(&self, event: GameEvent) {
        let Some(ref writer) = self.writer else {
            return;
        };

        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);

        let line = match serde_json::to_string(&LogEntry { timestamp_ms, event }) {
            Ok(line) => line,
            Err(e) => {
                warn!("Failed to encode journal entry: {}", e);
                return;
            }
        };

        let mut w = writer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = writeln!(w, "{}", line).and_then(|()| w.flush()) {
            warn!("Failed to write journal entry: {}", e);
        }
    }

    pub fn log_vote(&self, command: GameCommand, ballots: usize) {
        self.log(GameEvent::VoteResolved {
            direction: command.direction.as_str().to_string(),
            distance: command.distance,
            ballots,
            synthesized: ballots == 0,
        });
    }

    pub fn log_mode_change(&self, mode: GameMode) {
        self.log(GameEvent::ModeChanged { mode });
    }

    pub fn log_food_eaten(&self, score: u32, location: Coordinates) {
        self.log(GameEvent::FoodEaten {
            score,
            location: location.into(),
        });
    }

    pub fn log_reset(&self, cause: Collision, final_score: u32) {
        self.log(GameEvent::SnakeReset {
            cause: cause.as_str().to_string(),
            final_score,
        });
    }

    pub fn log_high_score(&self, score: u32) {
        self.log(GameEvent::HighScore { score });
    }
}

impl Default for EventLogger {
    fn default() -> Self {
        Self::disabled()
    }
}
