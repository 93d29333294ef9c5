use serde::{Deserialize, Serialize};

use crate::types::{Message, Role};

/// A single piece of a [`Content`].
///
/// Only text parts are produced by this client.  Parts of other kinds that
/// arrive in a reply (inline data, function calls) deserialize with
/// `text == None` and are ignored when the reply text is assembled.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    /// The text of this part.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Set when this part is the model's internal reasoning.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought: Option<bool>,
}

impl Part {
    /// Create a text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            thought: None,
        }
    }

    /// Returns true if this part is reasoning rather than answer text.
    pub fn is_thought(&self) -> bool {
        self.thought.unwrap_or(false)
    }
}

/// A role-tagged list of parts: one turn of the conversation on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Content {
    /// `"user"` or `"model"`; omitted for system instructions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    /// The parts of this turn.
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// Create a content with a single text part.
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role: Some(role),
            parts: vec![Part::text(text)],
        }
    }

    /// Create a user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    /// Create a model turn.
    pub fn model(text: impl Into<String>) -> Self {
        Self::new(Role::Model, text)
    }

    /// Create a role-less content, as used for system instructions.
    pub fn instruction(text: impl Into<String>) -> Self {
        Self {
            role: None,
            parts: vec![Part::text(text)],
        }
    }

    /// Concatenates the non-thought text parts.
    ///
    /// Returns `None` when no part carries text.
    pub fn joined_text(&self) -> Option<String> {
        let mut saw_text = false;
        let mut out = String::new();
        for part in self.parts.iter().filter(|p| !p.is_thought()) {
            if let Some(text) = &part.text {
                saw_text = true;
                out.push_str(text);
            }
        }
        saw_text.then_some(out)
    }
}

impl From<&Message> for Content {
    fn from(message: &Message) -> Self {
        Content::new(message.role(), message.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_content_serialization() {
        let json = serde_json::to_value(Content::user("hi")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"role": "user", "parts": [{"text": "hi"}]})
        );
    }

    #[test]
    fn instruction_has_no_role() {
        let json = serde_json::to_value(Content::instruction("be brief")).unwrap();
        assert_eq!(json, serde_json::json!({"parts": [{"text": "be brief"}]}));
    }

    #[test]
    fn joined_text_skips_thoughts_and_non_text() {
        let content: Content = serde_json::from_value(serde_json::json!({
            "role": "model",
            "parts": [
                {"text": "pondering", "thought": true},
                {"text": "Hello, "},
                {"inlineData": {"mimeType": "image/png", "data": ""}},
                {"text": "world"}
            ]
        }))
        .unwrap();
        assert_eq!(content.joined_text().as_deref(), Some("Hello, world"));
    }

    #[test]
    fn joined_text_none_without_text() {
        let content = Content {
            role: Some(Role::Model),
            parts: vec![],
        };
        assert_eq!(content.joined_text(), None);
    }
}
