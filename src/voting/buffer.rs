//! Input buffer: commands accumulated during the open voting window

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::game::command::GameCommand;

/// Append-only between drains; drained once per window
#[derive(Debug, Default)]
pub struct InputBuffer {
    commands: Mutex<Vec<GameCommand>>,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    // A panicking producer cannot leave a half-pushed Vec behind, so a
    // poisoned lock still guards consistent data.
    fn lock(&self) -> MutexGuard<'_, Vec<GameCommand>> {
        self.commands.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a command to the current window
    pub fn push(&self, command: GameCommand) {
        self.lock().push(command);
    }

    /// Take everything accumulated so far and leave the buffer empty, as one
    /// step with respect to concurrent pushes
    pub fn drain(&self) -> Vec<GameCommand> {
        std::mem::take(&mut *self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::direction::Direction;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_drain_empties_buffer() {
        let buffer = InputBuffer::new();
        buffer.push(GameCommand::new(Direction::Up, 1));
        buffer.push(GameCommand::new(Direction::Left, 2));

        let drained = buffer.drain();
        assert_eq!(
            drained,
            vec![
                GameCommand::new(Direction::Up, 1),
                GameCommand::new(Direction::Left, 2)
            ]
        );
        assert!(buffer.is_empty());
        assert!(buffer.drain().is_empty());
    }

    #[test]
    fn test_concurrent_pushes_are_delivered_exactly_once() {
        let buffer = Arc::new(InputBuffer::new());
        let producers: Vec<_> = (0..4)
            .map(|_| {
                let buffer = buffer.clone();
                thread::spawn(move || {
                    for _ in 0..1000 {
                        buffer.push(GameCommand::new(Direction::Down, 1));
                    }
                })
            })
            .collect();

        let mut delivered = 0;
        while producers.iter().any(|p| !p.is_finished()) {
            delivered += buffer.drain().len();
        }
        for producer in producers {
            producer.join().unwrap();
        }
        delivered += buffer.drain().len();

        assert_eq!(delivered, 4000);
    }
}
