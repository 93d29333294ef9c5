//! State to view.
//!
//! [`build_view`] is a pure function of the dispatcher's state; the terminal
//! front end turns its output into text with a [`TranscriptPane`](crate::TranscriptPane).

use crate::dispatcher::{Banner, ChatState};
use crate::transcript::Transcript;
use crate::types::Message;

/// Heading of the welcome view.
pub const WELCOME_TITLE: &str = "Hello!";

/// Body of the welcome view.
pub const WELCOME_TEXT: &str =
    "I'm a friendly assistant powered by Gemini. How can I help you today?";

/// Prompts offered while the transcript is empty.
pub const SUGGESTIONS: [&str; 4] = [
    "Explain quantum computing in simple terms",
    "What are some healthy dinner recipes?",
    "Write a short story about a robot who discovers music",
    "How does a black hole work?",
];

/// What occupies the transcript area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body<'a> {
    /// Empty transcript: greeting and suggestions.
    Welcome {
        /// Suggestions in display order.
        suggestions: &'static [&'static str],
    },
    /// The conversation, with a trailing typing indicator while loading.
    Transcript {
        /// Messages in order.
        messages: &'a [Message],
        /// Show the typing indicator after the last message.
        typing: bool,
    },
}

/// Everything the front end needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatView<'a> {
    /// The transcript area.
    pub body: Body<'a>,
    /// Error banner, if any.
    pub banner: Option<&'a Banner>,
    /// The text input accepts typing.
    pub input_enabled: bool,
    /// The submit control is active.
    pub submit_enabled: bool,
}

/// Builds the view for the current state.
pub fn build_view<'a>(state: &'a ChatState, transcript: &'a Transcript) -> ChatView<'a> {
    let body = if transcript.is_empty() && !state.is_loading {
        Body::Welcome {
            suggestions: &SUGGESTIONS,
        }
    } else {
        Body::Transcript {
            messages: transcript.messages(),
            typing: state.is_loading,
        }
    };
    ChatView {
        body,
        banner: state.error.as_ref(),
        input_enabled: !state.is_loading,
        submit_enabled: !state.is_loading && !state.draft.trim().is_empty(),
    }
}
