//! Process settings loaded from an optional TOML file

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{BoardConfig, DEFAULT_STORE_FILE, SERVER_PORT};
use crate::error::ConfigError;

/// Environment variable naming the settings file
pub const SETTINGS_ENV: &str = "CHAT_SNAKE_CONFIG";

/// Root settings structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Listen address
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,

    /// Key-value store file
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,

    /// Event journal file (disabled when absent)
    #[serde(default)]
    pub event_log: Option<PathBuf>,

    /// Board geometry
    #[serde(default)]
    pub board: BoardConfig,
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], SERVER_PORT))
}

fn default_store_path() -> PathBuf {
    PathBuf::from(DEFAULT_STORE_FILE)
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
            store_path: default_store_path(),
            event_log: None,
            board: BoardConfig::default(),
        }
    }
}

impl Settings {
    /// Load settings from file, using defaults if the file does not exist
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            info!("No settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let settings = Self::load_str(&content)?;
        info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings from a string
    pub fn load_str(content: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(content)?;
        settings.board.validate()?;
        Ok(settings)
    }
}
