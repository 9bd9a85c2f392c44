//! Game module

pub mod collision;
pub mod command;
pub mod direction;
pub mod engine;
pub mod food;
pub mod game_loop;
pub mod location;
pub mod stage;

pub use command::{GameCommand, VotingSignal};
pub use direction::Direction;
pub use engine::{Engine, StepOutcome};
pub use stage::Stage;
