//! Chat-steered Snake
//!
//! Chat viewers vote on the snake's next move. Every voting window the most
//! popular command wins and the engine plays it out one cell at a time.

pub mod broadcast;
pub mod config;
pub mod error;
pub mod event_logger;
pub mod game;
pub mod high_score;
pub mod protocol;
pub mod settings;
pub mod state;
pub mod store;
pub mod voting;
pub mod ws;
