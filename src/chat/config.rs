//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and configuration
//! structures for controlling chat behavior.

use std::time::Duration;

use arrrg_derive::CommandLine;

use crate::session::{DEFAULT_SYSTEM_INSTRUCTION, SessionConfig};
use crate::types::{GenerationConfig, Model};

/// Default bound on a single request, in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Command-line arguments for the gemini-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq)]
pub struct ChatArgs {
    /// Model to use for chat.
    #[arrrg(optional, "Model to use (default: gemini-2.5-flash)", "MODEL")]
    pub model: Option<String>,

    /// System instruction for the conversation.
    #[arrrg(optional, "System instruction for the conversation", "PROMPT")]
    pub system: Option<String>,

    /// Seconds to wait for a reply.
    #[arrrg(optional, "Seconds to wait for a reply (default: 60)", "SECS")]
    pub timeout_secs: Option<u64>,

    /// Base URL of the API.
    #[arrrg(optional, "Base URL of the Gemini API", "URL")]
    pub base_url: Option<String>,

    /// Sampling temperature.
    #[arrrg(optional, "Sampling temperature (default: model's own)", "TEMP")]
    pub temperature: Option<f32>,

    /// Upper bound on reply length.
    #[arrrg(optional, "Max output tokens per reply (default: model's own)", "TOKENS")]
    pub max_output_tokens: Option<u32>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

// `arrrg::CommandLine` requires `Eq`; `f32` prevents deriving it.
impl Eq for ChatArgs {}

/// Configuration for a chat session.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// The model to use for generating responses.
    pub model: Model,

    /// System instruction sent with every request.
    pub system_instruction: Option<String>,

    /// How long to wait for each reply.
    pub request_timeout: Duration,

    /// Override for the API base URL.
    pub base_url: Option<String>,

    /// Sampling parameters sent with every request.
    pub generation: GenerationConfig,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Model: gemini-2.5-flash
    /// - System instruction: a short "helpful and friendly" instruction
    /// - Request timeout: 60 seconds
    /// - Color: enabled
    pub fn new() -> Self {
        Self {
            model: Model::default(),
            system_instruction: Some(DEFAULT_SYSTEM_INSTRUCTION.to_string()),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            base_url: None,
            generation: GenerationConfig::default(),
            use_color: true,
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    /// Sets the system instruction.
    pub fn with_system_instruction(mut self, instruction: Option<String>) -> Self {
        self.system_instruction = instruction;
        self
    }

    /// Sets the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the API base URL.
    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        self.base_url = base_url;
        self
    }

    /// Sets the sampling parameters.
    pub fn with_generation(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// The session configuration derived from this chat configuration.
    ///
    /// The HTTP client gets a little more time than the dispatcher so that
    /// the dispatcher's timeout is the one the user sees.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            model: self.model.clone(),
            system_instruction: self.system_instruction.clone(),
            base_url: self.base_url.clone(),
            timeout: Some(self.request_timeout + Duration::from_secs(5)),
            generation: self.generation.clone(),
            ..SessionConfig::default()
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        let model = args
            .model
            .and_then(|s| s.parse::<Model>().ok())
            .unwrap_or_default();
        let defaults = ChatConfig::new();

        ChatConfig {
            model,
            system_instruction: args.system.or(defaults.system_instruction),
            request_timeout: args
                .timeout_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            base_url: args.base_url,
            generation: GenerationConfig {
                temperature: args.temperature,
                max_output_tokens: args.max_output_tokens,
                ..GenerationConfig::default()
            },
            use_color: !args.no_color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::KnownModel;

    #[test]
    fn default_config() {
        let config = ChatConfig::new();
        assert_eq!(config.model, Model::Known(KnownModel::Gemini25Flash));
        assert_eq!(
            config.system_instruction.as_deref(),
            Some(DEFAULT_SYSTEM_INSTRUCTION)
        );
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert!(config.base_url.is_none());
        assert!(config.use_color);
    }

    #[test]
    fn config_from_args_defaults() {
        let config = ChatConfig::from(ChatArgs::default());
        assert_eq!(config, ChatConfig::new());
    }

    #[test]
    fn config_from_args_custom() {
        let args = ChatArgs {
            model: Some("gemini-2.5-pro".to_string()),
            system: Some("You are terse.".to_string()),
            timeout_secs: Some(10),
            base_url: Some("http://localhost:8080/".to_string()),
            temperature: Some(0.25),
            max_output_tokens: Some(512),
            no_color: true,
        };
        let config = ChatConfig::from(args);
        assert_eq!(config.model, Model::Known(KnownModel::Gemini25Pro));
        assert_eq!(config.system_instruction.as_deref(), Some("You are terse."));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:8080/"));
        assert_eq!(config.generation.temperature, Some(0.25));
        assert_eq!(config.generation.max_output_tokens, Some(512));
        assert_eq!(config.session_config().generation, config.generation);
        assert!(!config.use_color);
    }

    #[test]
    fn zero_timeout_falls_back() {
        let args = ChatArgs {
            timeout_secs: Some(0),
            ..ChatArgs::default()
        };
        assert_eq!(
            ChatConfig::from(args).request_timeout,
            Duration::from_secs(60)
        );
    }

    #[test]
    fn config_builder_pattern() {
        let config = ChatConfig::new()
            .with_model(Model::Custom("tunedModels/mine".to_string()))
            .with_system_instruction(None)
            .with_request_timeout(Duration::from_secs(5))
            .with_base_url(Some("http://localhost/".to_string()))
            .with_generation(GenerationConfig {
                top_k: Some(8),
                ..GenerationConfig::default()
            })
            .without_color();
        let session = config.session_config();
        assert_eq!(session.model.to_string(), "tunedModels/mine");
        assert!(session.system_instruction.is_none());
        assert_eq!(session.timeout, Some(Duration::from_secs(10)));
        assert_eq!(session.base_url.as_deref(), Some("http://localhost/"));
        assert!(session.api_key.is_none());
        assert_eq!(session.generation.top_k, Some(8));
    }
}
