//! Interactive terminal front end.
//!
//! This module provides the pieces the `gemini-chat` binary is assembled
//! from:
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`commands`]: Slash command parsing and handling

mod commands;
mod config;

pub use crate::render::{PlainTextRenderer, Renderer, TranscriptPane};
pub use commands::{ChatCommand, ChatInput, help_text, parse_command, parse_input};
pub use config::{ChatArgs, ChatConfig};
