//! WebSocket handlers for chat bridges and observers

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::protocol::{ChatLine, ServerMessage};
use crate::state::AppState;
use crate::voting::parser::ParseResult;

/// Chat bridge upgrade handler
pub async fn chat_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_chat_socket(socket, state))
}

/// Observer upgrade handler
pub async fn game_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_game_socket(socket, state))
}

/// Process one chat frame. Returns the moderation reply for a consumed
/// game message that carried a provider id.
pub async fn handle_chat_frame(state: &AppState, frame: &str) -> Option<ServerMessage> {
    let line = ChatLine::parse(frame);
    let result = state.ingest_chat(&line);

    if matches!(result, ParseResult::ModeChanged(_)) {
        state.persist_configuration().await;
    }

    if !result.is_game_message() {
        return None;
    }
    line.id.map(|id| ServerMessage::Moderate { id })
}

/// Handle a chat bridge connection: each text frame is one chat line
async fn handle_chat_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = Uuid::new_v4();
    info!("Chat bridge {} connected", connection_id);

    let (mut sender, mut receiver) = socket.split();

    while let Some(result) = receiver.next().await {
        match result {
            Ok(Message::Text(text)) => {
                let Some(reply) = handle_chat_frame(&state, &text).await else {
                    continue;
                };
                if sender
                    .send(Message::Text(reply.to_json().into()))
                    .await
                    .is_err()
                {
                    warn!("Chat bridge {} stopped accepting replies", connection_id);
                    break;
                }
            }
            Ok(Message::Close(_)) => {
                info!("Chat bridge {} sent close frame", connection_id);
                break;
            }
            Ok(_) => {
                // Ignore binary, ping, pong frames
            }
            Err(e) => {
                error!("WebSocket error for chat bridge {}: {}", connection_id, e);
                break;
            }
        }
    }

    info!("Chat bridge {} disconnected", connection_id);
}

/// Handle an observer connection: replay the current state, then stream the feed
async fn handle_game_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = Uuid::new_v4();
    let (mut sender, mut receiver) = socket.split();

    // Subscribe before replaying so nothing published in between is lost
    let mut broadcast_rx = state.broadcaster.subscribe();
    info!(
        "Observer {} connected ({} watching)",
        connection_id,
        state.broadcaster.subscriber_count()
    );

    for msg in state.replay_messages() {
        if sender.send(Message::Text(msg.to_json().into())).await.is_err() {
            error!("Failed to send initial state to observer {}", connection_id);
            return;
        }
    }

    // Task to send broadcast messages to this observer
    let send_task = tokio::spawn(async move {
        loop {
            match broadcast_rx.recv().await {
                Ok(msg) => {
                    let json = msg.to_json();
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(n)) => {
                    warn!("Observer {} lagged by {} messages", connection_id, n);
                }
                Err(RecvError::Closed) => {
                    break;
                }
            }
        }
    });

    // Observers are read-only; just wait for them to go away
    let recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(Message::Close(_)) => break,
                Ok(_) => debug!("Ignoring frame from observer {}", connection_id),
                Err(e) => {
                    error!("WebSocket error for observer {}: {}", connection_id, e);
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = send_task => {}
        _ = recv_task => {}
    }

    info!("Observer {} disconnected", connection_id);
}
