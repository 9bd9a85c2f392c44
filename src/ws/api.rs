//! HTTP handlers for the live configuration and the high score

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use tracing::error;

use crate::config::Configuration;
use crate::state::AppState;
use crate::store::{clear_high_score, load_high_score};

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
        })
    }

    pub fn error(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: false,
            data: None,
            error: Some(message.into()),
        })
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HighScore {
    pub high_score: u32,
}

/// Health check endpoint
pub async fn health_handler() -> &'static str {
    "OK"
}

/// Current voting configuration
pub async fn get_config(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ApiResponse::success(Configuration::clone(&state.config.get()))
}

/// Replace the voting configuration; invalid records are rejected untouched
pub async fn put_config(
    State(state): State<Arc<AppState>>,
    Json(configuration): Json<Configuration>,
) -> impl IntoResponse {
    match state.update_configuration(configuration).await {
        Ok(()) => (
            StatusCode::OK,
            ApiResponse::success(Configuration::clone(&state.config.get())),
        ),
        Err(e) => (StatusCode::UNPROCESSABLE_ENTITY, ApiResponse::error(e.to_string())),
    }
}

/// Persisted high score
pub async fn get_high_score(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match load_high_score(state.store.as_ref()).await {
        Ok(high_score) => (StatusCode::OK, ApiResponse::success(HighScore { high_score })),
        Err(e) => {
            error!("Failed to read high score: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, ApiResponse::error(e.to_string()))
        }
    }
}

/// Reset the persisted high score to zero
pub async fn delete_high_score(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match clear_high_score(state.store.as_ref()).await {
        Ok(()) => (
            StatusCode::OK,
            ApiResponse::success(HighScore { high_score: 0 }),
        ),
        Err(e) => {
            error!("Failed to clear high score: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, ApiResponse::error(e.to_string()))
        }
    }
}
