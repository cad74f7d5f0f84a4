//! Shared types for the message-processing pipeline.

/// Explicit bot commands, short-circuiting the generation pipeline.
///
/// Telegram delivers commands as plain text (`/start`, possibly suffixed
/// with `@botname` in groups); parsing them here keeps the channel pure I/O.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
}

impl Command {
    /// Parse a trimmed message text into a command, if it is one.
    pub fn parse(text: &str) -> Option<Self> {
        let first_token = text.split_whitespace().next()?;
        let command = first_token.split('@').next().unwrap_or(first_token);
        match command {
            "/start" => Some(Self::Start),
            "/help" => Some(Self::Help),
            _ => None,
        }
    }
}
