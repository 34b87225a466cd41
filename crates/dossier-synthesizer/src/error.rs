//! Error types for the synthesis engine

use thiserror::Error;

/// Errors that can occur during synthesis
#[derive(Error, Debug)]
pub enum SynthesizerError {
    /// Oracle error
    #[error("Oracle error: {0}")]
    Oracle(String),

    /// Claim store error
    #[error("Store error: {0}")]
    Store(String),

    /// Candidate retrieval error
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// Embedding error
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Oracle call timed out
    #[error("Oracle timeout")]
    Timeout,

    /// Oracle response was not usable JSON
    #[error("Invalid decision format: {0}")]
    InvalidFormat(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for SynthesizerError {
    fn from(e: serde_json::Error) -> Self {
        SynthesizerError::InvalidFormat(e.to_string())
    }
}
