//! Chat voting: parsing, buffering, resolving and the window scheduler

pub mod buffer;
pub mod parser;
pub mod resolver;
pub mod scheduler;

pub use buffer::InputBuffer;
pub use scheduler::VotingScheduler;
