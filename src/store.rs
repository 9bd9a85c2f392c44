//! Key-value persistence for the high score and the voting configuration
//!
//! The in-memory store serves tests and ephemeral runs; the JSON file store
//! keeps one object on disk and rewrites it on every `set`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::Configuration;
use crate::error::StoreError;

/// Key holding the best score ever reached
pub const HIGH_SCORE_KEY: &str = "high_score";

/// Key holding the voting configuration record
pub const CONFIGURATION_KEY: &str = "configuration";

/// Logical key -> value persistence
#[async_trait]
pub trait Store: Send + Sync {
    /// Value under `key`, `None` if never set
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Replace the value under `key`
    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;
}

/// Store that lives only as long as the process
#[derive(Default)]
pub struct MemoryStore {
    entries: DashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// Store backed by a single JSON object file
pub struct JsonFileStore {
    path: PathBuf,
    entries: DashMap<String, Value>,
    /// Serializes file rewrites in issue order
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open the store, reading existing contents. A missing file is empty.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let entries = DashMap::new();

        match tokio::fs::read_to_string(&path).await {
            Ok(content) => {
                let object: Map<String, Value> = serde_json::from_str(&content)?;
                for (key, value) in object {
                    entries.insert(key, value);
                }
                info!("Opened store {} ({} keys)", path.display(), entries.len());
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("Store {} does not exist yet, starting empty", path.display());
            }
            Err(e) => return Err(e.into()),
        }

        Ok(Self {
            path,
            entries,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn flush(&self) -> Result<(), StoreError> {
        let object: Map<String, Value> = self
            .entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        let json = serde_json::to_string_pretty(&object)?;

        // Write then rename so a crash never leaves a truncated file
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        debug!("Flushed store to {}", self.path.display());
        Ok(())
    }
}

#[async_trait]
impl Store for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        self.entries.insert(key.to_string(), value);
        self.flush().await
    }
}

/// Persisted high score, 0 when absent
pub async fn load_high_score(store: &dyn Store) -> Result<u32, StoreError> {
    let score = store
        .get(HIGH_SCORE_KEY)
        .await?
        .and_then(|value| value.as_u64())
        .and_then(|value| u32::try_from(value).ok())
        .unwrap_or(0);
    Ok(score)
}

pub async fn save_high_score(store: &dyn Store, score: u32) -> Result<(), StoreError> {
    store.set(HIGH_SCORE_KEY, Value::from(score)).await
}

pub async fn clear_high_score(store: &dyn Store) -> Result<(), StoreError> {
    save_high_score(store, 0).await
}

/// Persisted configuration. Absent, malformed or invalid records yield the seed.
pub async fn load_configuration(store: &dyn Store) -> Result<Configuration, StoreError> {
    let Some(value) = store.get(CONFIGURATION_KEY).await? else {
        return Ok(Configuration::default());
    };

    match serde_json::from_value::<Configuration>(value) {
        Ok(configuration) => match configuration.validate() {
            Ok(()) => Ok(configuration),
            Err(e) => {
                warn!("Stored configuration rejected ({}), using defaults", e);
                Ok(Configuration::default())
            }
        },
        Err(e) => {
            warn!("Stored configuration is malformed ({}), using defaults", e);
            Ok(Configuration::default())
        }
    }
}

pub async fn save_configuration(
    store: &dyn Store,
    configuration: &Configuration,
) -> Result<(), StoreError> {
    store
        .set(CONFIGURATION_KEY, serde_json::to_value(configuration)?)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameMode;

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.get("missing").await.unwrap().is_none());

        store.set("k", Value::from(3)).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(Value::from(3)));
    }

    #[tokio::test]
    async fn test_high_score_defaults_to_zero() {
        let store = MemoryStore::new();
        assert_eq!(load_high_score(&store).await.unwrap(), 0);

        save_high_score(&store, 12).await.unwrap();
        assert_eq!(load_high_score(&store).await.unwrap(), 12);

        clear_high_score(&store).await.unwrap();
        assert_eq!(load_high_score(&store).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_configuration_defaults_and_fallback() {
        let store = MemoryStore::new();
        assert_eq!(load_configuration(&store).await.unwrap(), Configuration::default());

        store
            .set(CONFIGURATION_KEY, Value::from("not a record"))
            .await
            .unwrap();
        assert_eq!(load_configuration(&store).await.unwrap(), Configuration::default());

        let custom = Configuration {
            channel_name: "chan".to_string(),
            game_mode: GameMode::Static,
            ..Configuration::default()
        };
        save_configuration(&store, &custom).await.unwrap();
        assert_eq!(load_configuration(&store).await.unwrap(), custom);
    }

    #[tokio::test]
    async fn test_json_file_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        {
            let store = JsonFileStore::open(&path).await.unwrap();
            save_high_score(&store, 7).await.unwrap();
        }

        let reopened = JsonFileStore::open(&path).await.unwrap();
        assert_eq!(load_high_score(&reopened).await.unwrap(), 7);
        assert_eq!(reopened.path(), path.as_path());
    }

    #[tokio::test]
    async fn test_json_file_store_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        tokio::fs::write(&path, "{ nope").await.unwrap();

        assert!(matches!(
            JsonFileStore::open(&path).await,
            Err(StoreError::Serde(_))
        ));
    }
}
