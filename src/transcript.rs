//! The message store.
//!
//! The transcript is append-only from the outside.  An optimistic user
//! message goes through [`Transcript::stage`], which hands back a [`Staged`]
//! token; the token must be given back to either [`Transcript::confirm`] or
//! [`Transcript::revert`].  Reverting restores exactly the pre-stage state.

use crate::types::{Message, Role};

/// Proof that a message was tentatively appended.
///
/// Not `Clone`: each staged append is settled exactly once.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a staged message must be confirmed or reverted"]
pub struct Staged {
    index: usize,
}

impl Staged {
    /// Position of the staged message in the transcript.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Ordered, role-tagged conversation shown to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<Message>,
    staged: Option<usize>,
}

impl Transcript {
    /// Creates an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages in order, including a staged one.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns true if there are no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The most recent message.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Returns true while a staged message awaits confirmation.
    pub fn has_staged(&self) -> bool {
        self.staged.is_some()
    }

    /// Tentatively appends a user message.
    ///
    /// Returns `None` if another message is already staged.
    pub fn stage(&mut self, text: impl Into<String>) -> Option<Staged> {
        if self.staged.is_some() {
            return None;
        }
        let index = self.messages.len();
        self.messages.push(Message::user(text));
        self.staged = Some(index);
        Some(Staged { index })
    }

    /// Makes the staged message permanent and appends the model's reply.
    pub fn confirm(&mut self, staged: Staged, reply: impl Into<String>) {
        self.settle(&staged);
        self.messages.push(Message::new(Role::Model, reply));
    }

    /// Removes the staged message, restoring the pre-stage transcript.
    pub fn revert(&mut self, staged: Staged) -> Message {
        self.settle(&staged);
        // The staged message is always the tail: nothing can be appended while
        // a stage is outstanding.
        debug_assert_eq!(staged.index + 1, self.messages.len());
        self.messages.remove(staged.index)
    }

    fn settle(&mut self, staged: &Staged) {
        assert_eq!(
            self.staged,
            Some(staged.index),
            "staged token does not belong to this transcript"
        );
        self.staged = None;
    }
}
