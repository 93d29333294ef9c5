use std::fmt;

use serde::{Deserialize, Serialize};

/// Why the model stopped generating a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinishReason {
    /// Natural stop point or a stop sequence.
    Stop,

    /// The token limit was reached.
    MaxTokens,

    /// Flagged for safety reasons.
    Safety,

    /// Flagged for recitation.
    Recitation,

    /// Flagged for a language the model does not support.
    Language,

    /// Contains blocklisted terms.
    Blocklist,

    /// Contains prohibited content.
    ProhibitedContent,

    /// Contains sensitive personally identifiable information.
    Spii,

    /// Any other reason, including ones added after this client was written.
    #[serde(other)]
    Other,
}

impl FinishReason {
    /// Returns true if the candidate was cut off by a content filter.
    pub fn is_blocked(&self) -> bool {
        matches!(
            self,
            FinishReason::Safety
                | FinishReason::Recitation
                | FinishReason::Blocklist
                | FinishReason::ProhibitedContent
                | FinishReason::Spii
        )
    }
}

impl fmt::Display for FinishReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FinishReason::Stop => "STOP",
            FinishReason::MaxTokens => "MAX_TOKENS",
            FinishReason::Safety => "SAFETY",
            FinishReason::Recitation => "RECITATION",
            FinishReason::Language => "LANGUAGE",
            FinishReason::Blocklist => "BLOCKLIST",
            FinishReason::ProhibitedContent => "PROHIBITED_CONTENT",
            FinishReason::Spii => "SPII",
            FinishReason::Other => "OTHER",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_known_and_unknown() {
        let reason: FinishReason = serde_json::from_str(r#""MAX_TOKENS""#).unwrap();
        assert_eq!(reason, FinishReason::MaxTokens);

        let reason: FinishReason = serde_json::from_str(r#""MALFORMED_FUNCTION_CALL""#).unwrap();
        assert_eq!(reason, FinishReason::Other);
    }

    #[test]
    fn blocked_reasons() {
        assert!(FinishReason::Safety.is_blocked());
        assert!(!FinishReason::Stop.is_blocked());
        assert!(!FinishReason::MaxTokens.is_blocked());
    }
}
