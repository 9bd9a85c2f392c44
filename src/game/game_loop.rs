//! Game loop - executes winning commands and publishes every step

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::command::GameCommand;
use super::engine::{Engine, StepOutcome};
use crate::high_score::HighScoreTracker;
use crate::protocol::ServerMessage;
use crate::state::AppState;

/// Spawn the game loop task. It ends when every command sender is dropped.
pub fn spawn_game_loop(
    state: Arc<AppState>,
    mut engine: Engine,
    mut commands: mpsc::Receiver<GameCommand>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut tracker = HighScoreTracker::load(state.store.clone()).await;

        // Initial render
        state
            .publish(ServerMessage::Stage {
                stage: engine.initial_render(),
                high_score: tracker.best(),
            })
            .await;

        // Commands run to completion one at a time, in arrival order
        while let Some(command) = commands.recv().await {
            run_command(&state, &mut engine, &mut tracker, command).await;
        }

        info!("Command channel closed, game loop stopped");
    })
}

/// Execute one command and publish the stage after each of its steps
async fn run_command(
    state: &AppState,
    engine: &mut Engine,
    tracker: &mut HighScoreTracker,
    command: GameCommand,
) {
    debug!("Executing {}", command.popularity_key());
    let mut score_before = engine.stage().score();

    for report in engine.execute(command) {
        match report.outcome {
            StepOutcome::Ate => {
                state
                    .event_logger
                    .log_food_eaten(report.snapshot.score, report.snapshot.snake[0]);
            }
            StepOutcome::Collided(cause) => {
                info!("Snake reset after {} with score {}", cause.as_str(), score_before);
                state.event_logger.log_reset(cause, score_before);
            }
            StepOutcome::Moved => {}
        }

        if tracker.record(report.snapshot.score).await {
            info!("New high score: {}", report.snapshot.score);
            state.event_logger.log_high_score(report.snapshot.score);
        }
        score_before = report.snapshot.score;

        state
            .publish(ServerMessage::Stage {
                stage: report.snapshot,
                high_score: tracker.best(),
            })
            .await;
    }
}
