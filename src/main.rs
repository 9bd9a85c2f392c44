//! Chat Snake server
//!
//! Chat bridges feed viewer messages in over WebSocket; observers watch the
//! voting signals, winning commands and stage updates on the game feed.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chat_snake::config::{COMMAND_CHANNEL_CAPACITY, DEFAULT_SETTINGS_FILE};
use chat_snake::event_logger::EventLogger;
use chat_snake::game::game_loop::spawn_game_loop;
use chat_snake::game::Engine;
use chat_snake::settings::{Settings, SETTINGS_ENV};
use chat_snake::state::AppState;
use chat_snake::store::{load_configuration, JsonFileStore, Store};
use chat_snake::voting::VotingScheduler;
use chat_snake::ws;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chat_snake=debug,tower_http=debug".into()),
        )
        .init();

    let settings_path = std::env::var_os(SETTINGS_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE));
    let settings = Settings::load(&settings_path)?;

    let store: Arc<dyn Store> = Arc::new(JsonFileStore::open(&settings.store_path).await?);
    let configuration = load_configuration(store.as_ref()).await?;
    info!(
        "Voting every {}ms, distance {}..={}, mode {}",
        configuration.vote_duration_ms,
        configuration.min_game_chat_distance,
        configuration.max_game_chat_distance,
        configuration.game_mode.as_str()
    );

    // Create shared state
    let state = Arc::new(
        AppState::new(store)
            .with_configuration(configuration)
            .with_event_logger(EventLogger::new(settings.event_log.as_deref())),
    );

    // Engine task first so the scheduler always has a receiver
    let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
    spawn_game_loop(state.clone(), Engine::new(settings.board), command_rx);
    info!(
        "Game loop started ({}x{} cells)",
        settings.board.width_cells(),
        settings.board.height_cells()
    );

    VotingScheduler::new(state.clone(), command_tx).spawn();

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = ws::router(state).layer(cors);

    let listener = tokio::net::TcpListener::bind(settings.listen).await?;

    info!("Chat Snake server running on http://{}", settings.listen);
    info!("   Chat bridge endpoint: ws://{}/ws/chat", settings.listen);
    info!("   Observer endpoint:    ws://{}/ws/game", settings.listen);

    axum::serve(listener, app).await?;
    Ok(())
}
