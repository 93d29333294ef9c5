//! Slash command parsing for the chat application.
//!
//! This module handles parsing of special commands that start with `/`,
//! allowing users to control the chat session without sending messages
//! to the API.

use crate::view::SUGGESTIONS;

/// A parsed chat command.
///
/// These commands control the chat session and are not sent to the API.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    /// Send the suggestion with this zero-based index.
    Suggest(usize),

    /// List the suggestions again.
    ListSuggestions,

    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,

    /// Display session statistics (message count, requests, failures).
    Stats,

    /// Show the current configuration.
    ShowConfig,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// What one line typed at the prompt asks for.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatInput {
    /// Nothing but whitespace.
    Blank,

    /// A slash command.
    Command(ChatCommand),

    /// Text to send, exactly as typed.
    Message(String),
}

/// Classifies a line read at the prompt.
///
/// Whitespace only matters for recognizing blanks and commands; a message
/// keeps it.
pub fn parse_input(line: &str) -> ChatInput {
    if line.trim().is_empty() {
        return ChatInput::Blank;
    }
    match parse_command(line) {
        Some(command) => ChatInput::Command(command),
        None => ChatInput::Message(line.to_string()),
    }
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a valid command,
/// or `None` if it should be treated as a regular message.
///
/// # Examples
///
/// ```
/// # use gemini_chat::chat::{parse_command, ChatCommand};
/// assert_eq!(parse_command("/quit"), Some(ChatCommand::Quit));
/// assert_eq!(parse_command("/2"), Some(ChatCommand::Suggest(1)));
/// assert!(parse_command("Hello, Gemini!").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    let rest = input.strip_prefix('/')?;
    let mut parts = rest.splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        "stats" | "status" => ChatCommand::Stats,
        "config" => ChatCommand::ShowConfig,
        "suggestions" => ChatCommand::ListSuggestions,
        "suggest" => match argument {
            Some(arg) => parse_suggestion(arg),
            None => ChatCommand::Invalid("/suggest requires a number".to_string()),
        },
        number if number.chars().all(|c| c.is_ascii_digit()) && !number.is_empty() => {
            parse_suggestion(number)
        }
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

fn parse_suggestion(value: &str) -> ChatCommand {
    match value.parse::<usize>() {
        Ok(n) if (1..=SUGGESTIONS.len()).contains(&n) => ChatCommand::Suggest(n - 1),
        _ => ChatCommand::Invalid(format!(
            "suggestion must be a number between 1 and {}",
            SUGGESTIONS.len()
        )),
    }
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /<n>, /suggest <n>     Send suggestion number n
  /suggestions           List the suggestions
  /stats                 Show session statistics
  /config                Show current configuration
  /help                  Show this help message
  /quit                  Exit the chat"#
}
