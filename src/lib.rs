//! A chat client for the Gemini API.
//!
//! The crate is split the way a message travels:
//!
//! - [`session`] creates the remote conversation and sends one message at a
//!   time through the [`Gemini`] client.
//! - [`transcript`] is the message store, mutated by a stage/confirm/revert
//!   protocol.
//! - [`dispatcher`] runs the send flow and holds the UI state.
//! - [`view`] and [`render`] turn that state into terminal output.

// Public modules
pub mod chat;
pub mod client;
pub mod client_logger;
pub mod dispatcher;
pub mod error;
pub mod observability;
pub mod render;
pub mod session;
pub mod transcript;
pub mod types;
pub mod view;

// Re-exports
pub use client::Gemini;
pub use client_logger::ClientLogger;
pub use dispatcher::{
    Banner, ChatState, DispatchStats, Dispatcher, PendingSend, SendOutcome, SkipReason,
};
pub use error::{Error, ErrorKind, Result};
pub use observability::register_biometrics;
pub use render::{PlainTextRenderer, Renderer, TranscriptPane};
pub use session::{Conversation, GeminiSession, SessionConfig, create_session};
pub use transcript::{Staged, Transcript};
pub use types::*;
pub use view::{Body, ChatView, SUGGESTIONS, build_view};
