//! HTTP and WebSocket surface

pub mod api;
pub mod handler;

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::state::AppState;

pub use handler::{chat_handler, game_handler};

/// Routes for chat bridges, observers and the config/score API
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws/chat", get(chat_handler))
        .route("/ws/game", get(game_handler))
        .route("/api/config", get(api::get_config).put(api::put_config))
        .route(
            "/api/high-score",
            get(api::get_high_score).delete(api::delete_high_score),
        )
        .route("/health", get(api::health_handler))
        .with_state(state)
}
