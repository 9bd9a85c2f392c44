//! High score bookkeeping against the persistence store

use std::sync::Arc;

use tracing::{error, warn};

use crate::store::{load_high_score, save_high_score, Store};

/// Compares scores with the persisted high score after every step
pub struct HighScoreTracker {
    store: Arc<dyn Store>,
    /// Last known high score, used when the store cannot be read
    best: u32,
}

impl HighScoreTracker {
    /// Create a tracker primed with the persisted value
    pub async fn load(store: Arc<dyn Store>) -> Self {
        let best = match load_high_score(store.as_ref()).await {
            Ok(score) => score,
            Err(e) => {
                warn!("Failed to read high score, starting from 0: {}", e);
                0
            }
        };

        Self { store, best }
    }

    /// High score to display
    pub fn best(&self) -> u32 {
        self.best
    }

    /// Record a score. Returns true when it beat the persisted high score.
    ///
    /// Store failures are logged and never propagate.
    pub async fn record(&mut self, score: u32) -> bool {
        let persisted = match load_high_score(self.store.as_ref()).await {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to read high score: {}", e);
                self.best
            }
        };
        self.best = persisted;

        if score <= persisted {
            return false;
        }

        if let Err(e) = save_high_score(self.store.as_ref(), score).await {
            error!("Failed to persist high score {}: {}", score, e);
        }
        self.best = score;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::store::{clear_high_score, MemoryStore};
    use async_trait::async_trait;
    use serde_json::Value;

    /// Store whose every call fails
    struct BrokenStore;

    #[async_trait]
    impl Store for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<Value>, StoreError> {
            Err(StoreError::Io(std::io::Error::other("disk gone")))
        }

        async fn set(&self, _key: &str, _value: Value) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::other("disk gone")))
        }
    }

    #[tokio::test]
    async fn test_record_writes_only_improvements() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        save_high_score(store.as_ref(), 3).await.unwrap();

        let mut tracker = HighScoreTracker::load(store.clone()).await;
        assert_eq!(tracker.best(), 3);

        assert!(!tracker.record(2).await);
        assert!(!tracker.record(3).await);
        assert_eq!(load_high_score(store.as_ref()).await.unwrap(), 3);

        assert!(tracker.record(4).await);
        assert_eq!(tracker.best(), 4);
        assert_eq!(load_high_score(store.as_ref()).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_cleared_score_is_picked_up() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let mut tracker = HighScoreTracker::load(store.clone()).await;
        assert!(tracker.record(5).await);

        clear_high_score(store.as_ref()).await.unwrap();
        assert!(tracker.record(1).await);
        assert_eq!(tracker.best(), 1);
    }

    #[tokio::test]
    async fn test_store_failures_are_not_fatal() {
        let mut tracker = HighScoreTracker::load(Arc::new(BrokenStore)).await;
        assert_eq!(tracker.best(), 0);

        assert!(tracker.record(2).await);
        assert_eq!(tracker.best(), 2);
        assert!(!tracker.record(1).await);
        assert_eq!(tracker.best(), 2);
    }
}
