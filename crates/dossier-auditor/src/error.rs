//! Error types for the auditor

use thiserror::Error;

/// Errors that can occur during audit operations
#[derive(Error, Debug)]
pub enum AuditorError {
    /// Claim store error
    #[error("Store error: {0}")]
    Store(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
