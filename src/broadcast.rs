//! Observer feed
//!
//! Fans server messages out to every connected observer and keeps the latest
//! voting signal and stage so a late joiner can draw the game immediately.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::debug;

use crate::config::BROADCAST_CAPACITY;
use crate::protocol::ServerMessage;

/// Live stream of feed messages
pub type FeedReceiver = broadcast::Receiver<Arc<ServerMessage>>;

/// Render collaborator: anything that can deliver messages to observers
#[async_trait]
pub trait Broadcaster: Send + Sync {
    /// Subscribe to messages sent from now on
    fn subscribe(&self) -> FeedReceiver;

    /// Deliver a message to all subscribers
    async fn send(&self, msg: ServerMessage);

    fn subscriber_count(&self) -> usize;

    /// Messages a new observer needs before the live stream, oldest first
    fn replay(&self) -> Vec<Arc<ServerMessage>>;
}

/// In-process feed on a tokio broadcast channel
pub struct ObserverFeed {
    tx: broadcast::Sender<Arc<ServerMessage>>,
    last_vote: ArcSwapOption<ServerMessage>,
    last_stage: ArcSwapOption<ServerMessage>,
}

impl ObserverFeed {
    pub fn new() -> Self {
        Self::with_capacity(BROADCAST_CAPACITY)
    }

    /// Slow observers lose messages beyond `capacity`
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            last_vote: ArcSwapOption::empty(),
            last_stage: ArcSwapOption::empty(),
        }
    }
}

impl Default for ObserverFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Broadcaster for ObserverFeed {
    fn subscribe(&self) -> FeedReceiver {
        self.tx.subscribe()
    }

    async fn send(&self, msg: ServerMessage) {
        let msg = Arc::new(msg);

        match msg.as_ref() {
            ServerMessage::Vote(_) => self.last_vote.store(Some(msg.clone())),
            ServerMessage::Stage { .. } => self.last_stage.store(Some(msg.clone())),
            ServerMessage::Command(_) | ServerMessage::Moderate { .. } => {}
        }

        if self.tx.send(msg).is_err() {
            debug!("No observers connected");
        }
    }

    fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    fn replay(&self) -> Vec<Arc<ServerMessage>> {
        [self.last_vote.load_full(), self.last_stage.load_full()]
            .into_iter()
            .flatten()
            .collect()
    }
}
