//! Simulation engine: applies winning commands to the stage one cell at a time

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use super::collision::{check_collision, Collision};
use super::command::GameCommand;
use super::direction::Direction;
use super::stage::Stage;
use crate::config::BoardConfig;
use crate::protocol::StageSnapshot;

/// Result of a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Head moved, length unchanged
    Moved,
    /// Head landed on food; snake grew and scored
    Ate,
    /// Collision: the stage was reset. Remaining steps of the command are dropped.
    Collided(Collision),
}

impl StepOutcome {
    pub fn is_terminal(&self) -> bool {
        matches!(self, StepOutcome::Collided(_))
    }
}

/// One executed step and the stage right after it
#[derive(Debug, Clone)]
pub struct StepReport {
    pub outcome: StepOutcome,
    pub snapshot: StageSnapshot,
}

/// Owns the stage and is the only thing that mutates it
pub struct Engine {
    stage: Stage,
    rng: StdRng,
    /// Nothing has been rendered since the last (re)initialization
    initial_pass: bool,
}

impl Engine {
    /// Create an engine with an entropy-seeded RNG
    pub fn new(board: BoardConfig) -> Self {
        Self::with_rng(board, StdRng::from_entropy())
    }

    /// Create an engine with a caller-provided RNG (deterministic tests)
    pub fn with_rng(board: BoardConfig, mut rng: StdRng) -> Self {
        let stage = Stage::new(board, &mut rng);
        Self {
            stage,
            rng,
            initial_pass: true,
        }
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Render pass that follows (re)initialization. Uses up the one pass in
    /// which self collision is not checked.
    pub fn initial_render(&mut self) -> StageSnapshot {
        self.initial_pass = false;
        self.stage.to_snapshot()
    }

    /// Advance one cell
    pub fn step(&mut self, direction: Direction) -> StepOutcome {
        let initial_pass = std::mem::replace(&mut self.initial_pass, false);

        self.stage.turn(direction);
        let candidate = self.stage.head().adjacent(self.stage.direction());

        if let Some(collision) = check_collision(
            candidate,
            self.stage.body(),
            self.stage.width_cells(),
            self.stage.height_cells(),
            initial_pass,
        ) {
            debug!(
                "Collision ({}) at ({}, {}), score {}",
                collision.as_str(),
                candidate.x,
                candidate.y,
                self.stage.score()
            );
            self.reset();
            return StepOutcome::Collided(collision);
        }

        if candidate == self.stage.food() {
            self.stage.grow_to(candidate, &mut self.rng);
            StepOutcome::Ate
        } else {
            self.stage.advance_to(candidate);
            StepOutcome::Moved
        }
    }

    /// Run a command as `distance` sequential steps, stopping after a collision.
    ///
    /// The report of a collision carries the reset stage, which is the
    /// initial render of the new game.
    pub fn execute(&mut self, command: GameCommand) -> Vec<StepReport> {
        let mut reports = Vec::new();

        for _ in 0..command.distance {
            let outcome = self.step(command.direction);

            if outcome.is_terminal() {
                reports.push(StepReport {
                    outcome,
                    snapshot: self.initial_render(),
                });
                break;
            }

            reports.push(StepReport {
                outcome,
                snapshot: self.stage.to_snapshot(),
            });
        }

        reports
    }

    /// Reinitialize the stage; self collision is off until the next render or step
    pub fn reset(&mut self) {
        self.stage.reset(&mut self.rng);
        self.initial_pass = true;
    }

    #[cfg(test)]
    pub(crate) fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }
}
