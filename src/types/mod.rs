// Public modules
pub mod content;
pub mod finish_reason;
pub mod generate_content;
pub mod message;
pub mod model;

// Re-exports
pub use content::{Content, Part};
pub use finish_reason::FinishReason;
pub use generate_content::{
    Candidate, GenerateContentRequest, GenerateContentResponse, GenerationConfig, PromptFeedback,
    UsageMetadata,
};
pub use message::{Message, Role};
pub use model::{KnownModel, Model};
