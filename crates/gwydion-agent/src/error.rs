//! Error types for the agent crate.

use thiserror::Error;

/// Result type alias using the agent error type.
pub type Result<T> = std::result::Result<T, AgentError>;

/// Error type for controller operations.
#[derive(Debug, Error)]
pub enum AgentError {
    /// LLM backend error.
    #[error("LLM error: {0}")]
    Llm(#[from] gwydion_llm::LlmError),

    /// A decision was requested with no actions to choose from.
    #[error("No available actions to decide between")]
    NoAvailableActions,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AgentError::NoAvailableActions;
        assert!(err.to_string().contains("No available actions"));

        let err: AgentError = gwydion_llm::LlmError::Backend("down".to_string()).into();
        assert!(err.to_string().contains("LLM error"));
    }
}
