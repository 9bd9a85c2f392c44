//! Application state shared by the chat bridge, the scheduler and the game loop

use std::sync::Arc;

use tracing::{error, info};

use crate::broadcast::{Broadcaster, ObserverFeed};
use crate::config::{Configuration, SharedConfig};
use crate::error::ConfigError;
use crate::event_logger::EventLogger;
use crate::protocol::{ChatLine, ServerMessage};
use crate::store::{save_configuration, Store};
use crate::voting::buffer::InputBuffer;
use crate::voting::parser::{parse, ParseResult};

/// Shared application state
pub struct AppState {
    /// Live voting configuration
    pub config: SharedConfig,
    /// Commands of the open voting window
    pub buffer: InputBuffer,
    /// Broadcaster for sending messages to all observers
    pub broadcaster: Arc<dyn Broadcaster>,
    /// Persistence collaborator
    pub store: Arc<dyn Store>,
    /// Event logger for replay/analysis
    pub event_logger: Arc<EventLogger>,
}

impl AppState {
    /// Create a state with default configuration and in-memory broadcasting
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            config: SharedConfig::default(),
            buffer: InputBuffer::new(),
            broadcaster: Arc::new(ObserverFeed::new()),
            store,
            event_logger: Arc::new(EventLogger::disabled()),
        }
    }

    /// Start from an already validated configuration
    pub fn with_configuration(mut self, configuration: Configuration) -> Self {
        self.config = SharedConfig::new(configuration);
        self
    }

    pub fn with_event_logger(mut self, event_logger: EventLogger) -> Self {
        self.event_logger = Arc::new(event_logger);
        self
    }

    /// Feed one chat line through the command parser.
    ///
    /// A mode change is journaled here; persisting it is left to
    /// [`AppState::persist_configuration`] since parsing never blocks.
    pub fn ingest_chat(&self, line: &ChatLine) -> ParseResult {
        let result = parse(
            &line.text,
            line.can_update_game_state,
            &self.config,
            &self.buffer,
        );

        if let ParseResult::ModeChanged(mode) = result {
            info!("Game mode changed to {} from chat", mode.as_str());
            self.event_logger.log_mode_change(mode);
        }

        result
    }

    /// Write the live configuration to the store. Failures are logged only.
    pub async fn persist_configuration(&self) {
        let configuration = self.config.get();
        if let Err(e) = save_configuration(self.store.as_ref(), &configuration).await {
            error!("Failed to persist configuration: {}", e);
        }
    }

    /// Validate, swap in and persist a whole configuration record
    pub async fn update_configuration(&self, configuration: Configuration) -> Result<(), ConfigError> {
        self.config.replace(configuration)?;
        info!("Configuration updated");
        self.persist_configuration().await;
        Ok(())
    }

    /// Send a message to every observer
    pub async fn publish(&self, msg: ServerMessage) {
        self.broadcaster.send(msg).await;
    }

    /// Messages a newly connected observer needs to draw the current state
    pub fn replay_messages(&self) -> Vec<Arc<ServerMessage>> {
        self.broadcaster.replay()
    }
}
