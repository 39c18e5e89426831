//! Error types for the LLM boundary.

use thiserror::Error;

/// Errors surfaced by LLM backends.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The backend failed to produce a completion.
    #[error("Backend error: {0}")]
    Backend(String),

    /// The request was rejected before being sent.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Result type alias for LLM operations.
pub type Result<T> = std::result::Result<T, LlmError>;
