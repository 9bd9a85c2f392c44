//! Voting scheduler: opens a window every `voteDurationMs` and closes the
//! previous one by draining the buffer and emitting the winner

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::buffer::InputBuffer;
use super::resolver::resolve;
use crate::config::{Configuration, GameMode};
use crate::game::command::{GameCommand, VotingSignal};
use crate::game::direction::Direction;
use crate::protocol::ServerMessage;
use crate::state::AppState;

/// What closing a voting window produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowOutcome {
    /// Most popular command among `ballots` votes
    Resolved { command: GameCommand, ballots: usize },
    /// No votes in continuous mode: keep moving
    Continued(GameCommand),
    /// No votes in static mode: nothing happens
    Idle,
}

impl WindowOutcome {
    /// Command to hand to the engine, if any
    pub fn command(&self) -> Option<GameCommand> {
        match self {
            WindowOutcome::Resolved { command, .. } | WindowOutcome::Continued(command) => {
                Some(*command)
            }
            WindowOutcome::Idle => None,
        }
    }
}

/// Drain the buffer and decide the window's command under `configuration`
pub fn close_window(configuration: &Configuration, buffer: &InputBuffer) -> WindowOutcome {
    let batch = buffer.drain();

    if let Some(command) = resolve(&batch) {
        return WindowOutcome::Resolved {
            command,
            ballots: batch.len(),
        };
    }

    match configuration.game_mode {
        GameMode::Continuous => WindowOutcome::Continued(GameCommand::new(
            Direction::Continue,
            configuration.min_game_chat_distance,
        )),
        GameMode::Static => WindowOutcome::Idle,
    }
}

/// Periodic controller feeding winning commands to the game loop
pub struct VotingScheduler {
    state: Arc<AppState>,
    commands: mpsc::Sender<GameCommand>,
}

impl VotingScheduler {
    pub fn new(state: Arc<AppState>, commands: mpsc::Sender<GameCommand>) -> Self {
        Self { state, commands }
    }

    /// Spawn the scheduler task
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(self) {
        // Initial signal so observers have a duration before the first tick
        let configuration = self.state.config.get();
        self.open_window(&configuration).await;
        info!(
            "Voting scheduler started ({}ms windows)",
            configuration.vote_duration_ms
        );

        loop {
            // Period is re-read every cycle; changes apply from the next window
            let period = self.state.config.get().vote_duration();
            sleep(period).await;
            self.tick().await;
        }
    }

    /// Emit the voting signal for a window that is opening now
    async fn open_window(&self, configuration: &Configuration) -> VotingSignal {
        let signal = VotingSignal {
            duration_ms: configuration.vote_duration_ms,
        };
        self.state.publish(ServerMessage::Vote(signal)).await;
        signal
    }

    /// One cycle: open the next window, close the previous one, emit its result
    pub async fn tick(&self) -> WindowOutcome {
        let configuration = self.state.config.get();
        self.open_window(&configuration).await;

        let outcome = close_window(&configuration, &self.state.buffer);
        let Some(command) = outcome.command() else {
            debug!("Voting window closed empty, static mode: no command");
            return outcome;
        };

        let ballots = match outcome {
            WindowOutcome::Resolved { ballots, .. } => ballots,
            _ => 0,
        };
        debug!(
            "Voting window closed: {} ({} ballots)",
            command.popularity_key(),
            ballots
        );
        self.state.event_logger.log_vote(command, ballots);

        self.state.publish(ServerMessage::Command(command)).await;
        if self.commands.send(command).await.is_err() {
            warn!("Game loop is gone, dropping command {}", command.popularity_key());
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ChatLine;
    use crate::store::MemoryStore;
    use std::time::Duration;

    fn line(text: &str) -> ChatLine {
        ChatLine {
            text: text.to_string(),
            can_update_game_state: false,
            id: None,
        }
    }

    fn scheduler(mode: GameMode) -> (Arc<AppState>, VotingScheduler, mpsc::Receiver<GameCommand>) {
        let state = Arc::new(
            AppState::new(Arc::new(MemoryStore::new())).with_configuration(Configuration {
                game_mode: mode,
                min_game_chat_distance: 2,
                ..Configuration::default()
            }),
        );
        let (tx, rx) = mpsc::channel(8);
        let scheduler = VotingScheduler::new(state.clone(), tx);
        (state, scheduler, rx)
    }

    #[test]
    fn test_close_window_empty_batches() {
        let buffer = InputBuffer::new();
        let continuous = Configuration::default();
        assert_eq!(
            close_window(&continuous, &buffer),
            WindowOutcome::Continued(GameCommand::new(Direction::Continue, 1))
        );

        let fixed = Configuration {
            game_mode: GameMode::Static,
            ..Configuration::default()
        };
        assert_eq!(close_window(&fixed, &buffer), WindowOutcome::Idle);
    }

    #[test]
    fn test_close_window_resolves_and_drains() {
        let buffer = InputBuffer::new();
        buffer.push(GameCommand::new(Direction::Left, 1));
        buffer.push(GameCommand::new(Direction::Up, 1));
        buffer.push(GameCommand::new(Direction::Up, 1));

        let outcome = close_window(&Configuration::default(), &buffer);
        assert_eq!(
            outcome,
            WindowOutcome::Resolved {
                command: GameCommand::new(Direction::Up, 1),
                ballots: 3
            }
        );
        assert!(buffer.is_empty());
    }

    #[tokio::test]
    async fn test_tick_emits_signal_then_command() {
        let (state, scheduler, mut rx) = scheduler(GameMode::Static);
        let mut feed = state.broadcaster.subscribe();

        state.ingest_chat(&line("sg:right3"));
        state.ingest_chat(&line("sg:down"));
        state.ingest_chat(&line("sg:right3"));

        let outcome = scheduler.tick().await;
        assert_eq!(outcome.command(), Some(GameCommand::new(Direction::Right, 3)));
        assert_eq!(rx.recv().await, Some(GameCommand::new(Direction::Right, 3)));

        let first = feed.recv().await.unwrap();
        assert!(matches!(
            first.as_ref(),
            ServerMessage::Vote(VotingSignal { duration_ms: 5000 })
        ));
        let second = feed.recv().await.unwrap();
        assert!(matches!(second.as_ref(), ServerMessage::Command(_)));
    }

    #[tokio::test]
    async fn test_static_empty_window_emits_nothing() {
        let (state, scheduler, mut rx) = scheduler(GameMode::Static);
        let mut feed = state.broadcaster.subscribe();

        assert_eq!(scheduler.tick().await, WindowOutcome::Idle);
        assert!(rx.try_recv().is_err());

        // Only the voting signal went out
        assert!(matches!(feed.recv().await.unwrap().as_ref(), ServerMessage::Vote(_)));
        assert!(feed.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_continuous_empty_window_synthesizes_continue() {
        let (_state, scheduler, mut rx) = scheduler(GameMode::Continuous);

        scheduler.tick().await;
        assert_eq!(
            rx.recv().await,
            Some(GameCommand::new(Direction::Continue, 2))
        );
    }

    #[tokio::test]
    async fn test_votes_never_leak_into_next_window() {
        let (state, scheduler, mut rx) = scheduler(GameMode::Static);

        state.ingest_chat(&line("sg:left"));
        scheduler.tick().await;
        assert_eq!(rx.recv().await, Some(GameCommand::new(Direction::Left, 2)));

        state.ingest_chat(&line("sg:up4"));
        scheduler.tick().await;
        assert_eq!(rx.recv().await, Some(GameCommand::new(Direction::Up, 4)));
    }

    #[tokio::test]
    async fn test_signal_uses_current_duration() {
        let (state, scheduler, _rx) = scheduler(GameMode::Static);
        let mut feed = state.broadcaster.subscribe();

        let mut updated = Configuration::clone(&state.config.get());
        updated.vote_duration_ms = 1234;
        state.config.replace(updated).unwrap();

        scheduler.tick().await;
        assert!(matches!(
            feed.recv().await.unwrap().as_ref(),
            ServerMessage::Vote(VotingSignal { duration_ms: 1234 })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawned_scheduler_runs_on_period() {
        let (state, scheduler, mut rx) = scheduler(GameMode::Continuous);
        let mut feed = state.broadcaster.subscribe();
        let handle = scheduler.spawn();

        // Initial signal right away
        assert!(matches!(feed.recv().await.unwrap().as_ref(), ServerMessage::Vote(_)));

        tokio::time::advance(Duration::from_millis(5001)).await;
        let command = rx.recv().await.unwrap();
        assert_eq!(command.direction, Direction::Continue);

        handle.abort();
    }
}
