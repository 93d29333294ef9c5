use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{Content, FinishReason};

/// Optional sampling parameters for a request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Nucleus sampling threshold.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,

    /// Top-k sampling limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,

    /// Maximum tokens in the reply.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

impl GenerationConfig {
    /// Returns true if no parameter is set, in which case the field is omitted.
    pub fn is_empty(&self) -> bool {
        self == &GenerationConfig::default()
    }
}

/// Body of a `models/{model}:generateContent` request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// The conversation so far, ending with the new user turn.
    pub contents: Vec<Content>,

    /// Fixed instruction prepended by the server to every turn.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,

    /// Sampling parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// Create a new request for the given contents.
    pub fn new(contents: Vec<Content>) -> Self {
        Self {
            contents,
            system_instruction: None,
            generation_config: None,
        }
    }

    /// Sets the system instruction.
    pub fn with_system_instruction(mut self, instruction: Option<&str>) -> Self {
        self.system_instruction = instruction.map(Content::instruction);
        self
    }

    /// Sets the generation config; an empty config is omitted.
    pub fn with_generation_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = if config.is_empty() { None } else { Some(config) };
        self
    }
}

/// A single generated candidate.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// The generated content; absent when the candidate was filtered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,

    /// Why generation stopped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,

    /// Index of this candidate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
}

/// Feedback on the prompt itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Set when the prompt was blocked and no candidates were produced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<String>,
}

/// Token accounting for a request.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    /// Tokens in the prompt, history included.
    #[serde(default)]
    pub prompt_token_count: u32,

    /// Tokens across all candidates.
    #[serde(default)]
    pub candidates_token_count: u32,

    /// Total tokens for the request.
    #[serde(default)]
    pub total_token_count: u32,
}

/// Response of a `generateContent` call.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Generated candidates; this client requests one.
    #[serde(default)]
    pub candidates: Vec<Candidate>,

    /// Feedback on the prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<PromptFeedback>,

    /// Token accounting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<UsageMetadata>,

    /// The concrete model version that served the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
}

impl GenerateContentResponse {
    /// Extracts the reply text of the first candidate.
    ///
    /// A blocked prompt, a filtered candidate, or a reply without any text is
    /// an error: there is nothing to append to the transcript.
    pub fn text(&self) -> Result<String> {
        if let Some(reason) = self
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_ref())
        {
            return Err(Error::blocked(format!("prompt blocked ({reason})")));
        }
        let Some(candidate) = self.candidates.first() else {
            return Err(Error::empty_response("no candidates returned"));
        };
        let text = candidate.content.as_ref().and_then(Content::joined_text);
        match (text, &candidate.finish_reason) {
            (Some(text), _) if !text.is_empty() => Ok(text),
            (_, Some(reason)) if reason.is_blocked() => {
                Err(Error::blocked(format!("reply blocked ({reason})")))
            }
            (_, Some(reason)) => Err(Error::empty_response(format!(
                "candidate has no text (finish reason {reason})"
            ))),
            (_, None) => Err(Error::empty_response("candidate has no text")),
        }
    }
}
