//! Popularity resolver: picks the winning command of a voting window

use std::collections::HashMap;

use crate::game::command::GameCommand;

/// Vote tally for one popularity key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    /// Representative command for the key
    pub command: GameCommand,
    /// Number of commands sharing the key
    pub votes: usize,
    /// Position of the key's first occurrence in arrival order
    pub first_seen: usize,
}

/// Group commands by popularity key, in first-seen order
pub fn tally(commands: &[GameCommand]) -> Vec<Tally> {
    let mut index_by_key: HashMap<String, usize> = HashMap::new();
    let mut tallies: Vec<Tally> = Vec::new();

    for command in commands {
        let key = command.popularity_key();
        match index_by_key.get(&key) {
            Some(&index) => tallies[index].votes += 1,
            None => {
                index_by_key.insert(key, tallies.len());
                tallies.push(Tally {
                    command: *command,
                    votes: 1,
                    first_seen: tallies.len(),
                });
            }
        }
    }

    tallies
}

/// Most popular command; ties go to the key seen first. `None` for an empty batch.
pub fn resolve(commands: &[GameCommand]) -> Option<GameCommand> {
    tally(commands)
        .into_iter()
        .min_by(|a, b| b.votes.cmp(&a.votes).then(a.first_seen.cmp(&b.first_seen)))
        .map(|winner| winner.command)
}
