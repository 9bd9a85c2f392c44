//! Chat command parser
//!
//! Recognized lines, prefix matched case-insensitively:
//!
//! ```text
//! sg:right        sg:left7        sg: up 3        sg:down-2
//! sg:gamemode:static              sg:gamemode:continuous
//! ```

use tracing::debug;

use super::buffer::InputBuffer;
use crate::config::{GameMode, SharedConfig};
use crate::game::command::GameCommand;
use crate::game::direction::Direction;

/// Prefix marking a chat line as a game message
pub const GAME_PREFIX: &str = "sg:";

/// Prefix of the privileged mode-change message
pub const GAME_MODE_PREFIX: &str = "sg:gamemode:";

/// What a chat line turned out to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseResult {
    /// Ordinary chat, or a malformed game message
    NotGameMessage,
    /// Privileged sender switched the game mode
    ModeChanged(GameMode),
    /// Privileged mode-change line with an unknown mode. Consumed, no effect.
    UnknownMode,
    /// Command accepted into the voting buffer
    Command(GameCommand),
}

impl ParseResult {
    /// Whether the line was consumed as a game message (and may be moderated)
    pub fn is_game_message(&self) -> bool {
        !matches!(self, ParseResult::NotGameMessage)
    }
}

/// Parse one chat line. Accepted commands are appended to `buffer`; a valid
/// mode change from a privileged sender is applied to `config`.
pub fn parse(
    line: &str,
    can_update_game_state: bool,
    config: &SharedConfig,
    buffer: &InputBuffer,
) -> ParseResult {
    if !starts_with_ignore_case(line, GAME_PREFIX) {
        return ParseResult::NotGameMessage;
    }

    if can_update_game_state && starts_with_ignore_case(line, GAME_MODE_PREFIX) {
        let token = &line[GAME_MODE_PREFIX.len()..];
        return match GameMode::from_token(token) {
            Some(mode) => {
                config.set_game_mode(mode);
                debug!("Game mode set to {}", mode.as_str());
                ParseResult::ModeChanged(mode)
            }
            None => {
                debug!("Ignoring unknown game mode {:?}", token);
                ParseResult::UnknownMode
            }
        };
    }

    let Some(command) = parse_command(line, config) else {
        return ParseResult::NotGameMessage;
    };

    buffer.push(command);
    ParseResult::Command(command)
}

/// Direction/distance part of a game line, with the distance clamped
fn parse_command(line: &str, config: &SharedConfig) -> Option<GameCommand> {
    // Segment between the first and second ':'
    let segment = line.split(':').nth(1)?;
    let compact: String = segment.chars().filter(|c| !c.is_whitespace()).collect();

    let (direction_token, distance_token) = match_tokens(&compact)?;
    let direction = Direction::from_chat_token(direction_token)?;
    let requested = parse_distance(distance_token.unwrap_or("1"));

    let distance = config.get().clamp_distance(requested);
    Some(GameCommand::new(direction, distance))
}

/// First run of ASCII letters, and an optional signed integer right after it
fn match_tokens(text: &str) -> Option<(&str, Option<&str>)> {
    let start = text.find(|c: char| c.is_ascii_alphabetic())?;
    let rest = &text[start..];
    let letters_end = rest
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(rest.len());
    let (letters, tail) = rest.split_at(letters_end);

    let sign_len = usize::from(tail.starts_with('-'));
    let digits_len = tail[sign_len..]
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(tail.len() - sign_len);

    let number = (digits_len > 0).then(|| &tail[..sign_len + digits_len]);
    Some((letters, number))
}

/// Parse a signed decimal, saturating values that overflow `i64`
fn parse_distance(token: &str) -> i64 {
    token.parse().unwrap_or_else(|_| {
        if token.starts_with('-') {
            i64::MIN
        } else {
            i64::MAX
        }
    })
}

fn starts_with_ignore_case(line: &str, prefix: &str) -> bool {
    line.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}
