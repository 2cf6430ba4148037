//! Error types for review operations

use thiserror::Error;

/// Errors that can occur during a review run
#[derive(Error, Debug)]
pub enum ReviewError {
    /// Storage layer error
    #[error("Storage error: {0}")]
    Store(String),

    /// LLM reply is not a usable corrections object
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
