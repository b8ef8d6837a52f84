//! Error types for Docent operations

use crate::skills::SkillError;

/// Result type for Docent operations
pub type Result<T> = std::result::Result<T, DocentError>;

/// Error types for the Docent framework
///
/// Failures reachable from model-directed tool use never show up here: they are
/// rendered into tool-result text by the tool layer. Everything in this enum
/// terminates the current turn and propagates to the caller of the agent.
#[derive(Debug, thiserror::Error)]
pub enum DocentError {
    /// The underlying model call failed
    #[error("Model call failed: {0}")]
    ModelCall(String),

    /// The model kept requesting tools past the configured iteration bound
    #[error("Tool-call loop exceeded {limit} model calls")]
    LoopLimitExceeded {
        /// Configured maximum number of model calls per turn
        limit: usize,
    },

    /// A model call did not complete within the configured timeout
    #[error("Model call timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// The turn was cancelled by the caller
    #[error("Turn cancelled")]
    Cancelled,

    /// Conversation state store failure
    #[error("Thread store error: {0}")]
    Store(String),

    /// Skill registry or loader error outside of tool dispatch
    #[error("Skill error: {0}")]
    Skill(#[from] SkillError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl DocentError {
    /// Whether this error ended the turn because of a caller-imposed bound
    /// (iteration limit, timeout or cancellation) rather than a fault.
    pub fn is_interrupted(&self) -> bool {
        matches!(
            self,
            DocentError::LoopLimitExceeded { .. } | DocentError::Timeout(_) | DocentError::Cancelled
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_interrupted_kinds() {
        assert!(DocentError::Cancelled.is_interrupted());
        assert!(DocentError::Timeout(Duration::from_secs(1)).is_interrupted());
        assert!(DocentError::LoopLimitExceeded { limit: 3 }.is_interrupted());
        assert!(!DocentError::ModelCall("boom".to_string()).is_interrupted());
    }

    #[test]
    fn test_skill_error_conversion() {
        let err: DocentError = SkillError::NotFound {
            name: "missing".to_string(),
        }
        .into();
        assert!(err.to_string().contains("missing"));
    }
}
