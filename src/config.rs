//! Game configuration constants and the live voting configuration

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// HTTP server port
pub const SERVER_PORT: u16 = 8080;

/// Playfield width in pixels
pub const PLAYFIELD_WIDTH: u32 = 360;

/// Playfield height in pixels
pub const PLAYFIELD_HEIGHT: u32 = 360;

/// Cell size in pixels
pub const CELL_SIZE: u32 = 20;

/// Snake length after a reset
pub const DEFAULT_SNAKE_SIZE: usize = 2;

/// Broadcast channel capacity
pub const BROADCAST_CAPACITY: usize = 100;

/// Pending winning commands waiting for the engine
pub const COMMAND_CHANNEL_CAPACITY: usize = 16;

/// Settings file used when `CHAT_SNAKE_CONFIG` is unset
pub const DEFAULT_SETTINGS_FILE: &str = "chat-snake.toml";

/// Key-value store file
pub const DEFAULT_STORE_FILE: &str = "chat-snake-store.json";

// =============================================================================
// Voting defaults
// =============================================================================

/// Length of one voting window in milliseconds
pub const VOTE_DURATION_MS: u64 = 5000;

/// Smallest distance a chat command may request
pub const MIN_GAME_CHAT_DISTANCE: u32 = 1;

/// Largest distance a chat command may request
pub const MAX_GAME_CHAT_DISTANCE: u32 = 10;

/// Highest value `maxGameChatDistance` may be configured to
pub const DISTANCE_CEILING: u32 = 1000;

/// What happens when a voting window closes without votes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Snake holds still
    Static,
    /// Snake keeps its heading
    #[default]
    Continuous,
}

impl GameMode {
    /// Match a chat token against the literal mode names (case-sensitive)
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "static" => Some(GameMode::Static),
            "continuous" => Some(GameMode::Continuous),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Static => "static",
            GameMode::Continuous => "continuous",
        }
    }
}

/// Voting configuration, persisted under [`crate::store::CONFIGURATION_KEY`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Configuration {
    /// Chat channel the transport joins
    pub channel_name: String,
    /// Voting window length
    pub vote_duration_ms: u64,
    /// Lower clamp bound for command distances
    pub min_game_chat_distance: u32,
    /// Upper clamp bound for command distances
    pub max_game_chat_distance: u32,
    /// Empty-window policy
    pub game_mode: GameMode,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            channel_name: String::new(),
            vote_duration_ms: VOTE_DURATION_MS,
            min_game_chat_distance: MIN_GAME_CHAT_DISTANCE,
            max_game_chat_distance: MAX_GAME_CHAT_DISTANCE,
            game_mode: GameMode::default(),
        }
    }
}

impl Configuration {
    /// Voting window length as a [`Duration`]
    pub fn vote_duration(&self) -> Duration {
        Duration::from_millis(self.vote_duration_ms)
    }

    /// Clamp a requested distance into `[min, max]`.
    ///
    /// The upper bound is applied first, so a misconfigured `min > max`
    /// yields `min` rather than panicking.
    pub fn clamp_distance(&self, requested: i64) -> u32 {
        let clamped = requested
            .min(i64::from(self.max_game_chat_distance))
            .max(i64::from(self.min_game_chat_distance));
        // Non-negative and at most max(u32 bounds) after the clamp
        clamped as u32
    }

    /// Check the record before it is swapped in
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.vote_duration_ms == 0 {
            return Err(ConfigError::Validation(
                "voteDurationMs must be greater than zero".to_string(),
            ));
        }

        if self.min_game_chat_distance == 0 {
            return Err(ConfigError::Validation(
                "minGameChatDistance must be at least 1".to_string(),
            ));
        }

        if self.min_game_chat_distance > self.max_game_chat_distance {
            return Err(ConfigError::Validation(format!(
                "minGameChatDistance ({}) exceeds maxGameChatDistance ({})",
                self.min_game_chat_distance, self.max_game_chat_distance
            )));
        }

        if self.max_game_chat_distance > DISTANCE_CEILING {
            return Err(ConfigError::Validation(format!(
                "maxGameChatDistance ({}) exceeds {}",
                self.max_game_chat_distance, DISTANCE_CEILING
            )));
        }

        Ok(())
    }
}

/// Board geometry in pixels plus the initial snake length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub width_px: u32,
    pub height_px: u32,
    pub cell_size: u32,
    pub snake_size: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width_px: PLAYFIELD_WIDTH,
            height_px: PLAYFIELD_HEIGHT,
            cell_size: CELL_SIZE,
            snake_size: DEFAULT_SNAKE_SIZE,
        }
    }
}

impl BoardConfig {
    /// Number of whole cells across
    pub fn width_cells(&self) -> i32 {
        (self.width_px / self.cell_size.max(1)) as i32
    }

    /// Number of whole cells down
    pub fn height_cells(&self) -> i32 {
        (self.height_px / self.cell_size.max(1)) as i32
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cell_size == 0 {
            return Err(ConfigError::Validation("cell_size must be non-zero".to_string()));
        }

        if self.width_cells() < 1 || self.height_cells() < 1 {
            return Err(ConfigError::Validation(format!(
                "board {}x{} px holds no {} px cell",
                self.width_px, self.height_px, self.cell_size
            )));
        }

        if self.snake_size == 0 || self.snake_size > self.width_cells() as usize {
            return Err(ConfigError::Validation(format!(
                "snake_size {} does not fit in a row of {} cells",
                self.snake_size,
                self.width_cells()
            )));
        }

        Ok(())
    }
}

/// Live configuration shared by the parser and the scheduler.
///
/// Readers never block; writers swap in a whole new record.
pub struct SharedConfig {
    current: ArcSwap<Configuration>,
}

impl SharedConfig {
    pub fn new(configuration: Configuration) -> Self {
        Self {
            current: ArcSwap::from_pointee(configuration),
        }
    }

    /// Current configuration (lock-free)
    #[inline]
    pub fn get(&self) -> Arc<Configuration> {
        self.current.load_full()
    }

    /// Validate and replace the whole record
    pub fn replace(&self, configuration: Configuration) -> Result<(), ConfigError> {
        configuration.validate()?;
        self.current.store(Arc::new(configuration));
        Ok(())
    }

    /// Change only the game mode, keeping concurrent edits to other fields
    pub fn set_game_mode(&self, mode: GameMode) {
        self.current.rcu(|current| {
            let mut next = Configuration::clone(current);
            next.game_mode = mode;
            next
        });
    }
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self::new(Configuration::default())
    }
}
