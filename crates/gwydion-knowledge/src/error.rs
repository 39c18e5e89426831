//! Error types for the knowledge crate.

use thiserror::Error;

/// Errors that can occur in the knowledge crate.
#[derive(Debug, Error)]
pub enum KnowledgeError {
    /// A fact component was empty after normalization.
    #[error("Invalid fact: {0}")]
    InvalidFact(String),

    /// Snapshot file I/O failed.
    #[error("Persistence error: {0}")]
    Persistence(#[from] std::io::Error),

    /// Snapshot serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A save was requested on a manager with no storage directory.
    #[error("No storage directory configured")]
    NoStorage,
}

/// Result type alias for knowledge operations.
pub type Result<T> = std::result::Result<T, KnowledgeError>;
