//! Error types for the Extractor

use std::fmt;
use thiserror::Error;

/// Errors that abort a source before any item is produced
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// A required external program is not installed
    #[error("Required tool not found: {0}")]
    MissingTool(String),

    /// HTTP transport failure
    #[error("HTTP error: {0}")]
    Http(String),

    /// Non-success HTTP status
    #[error("HTTP {status} from {url}")]
    Status {
        /// Requested URL
        url: String,
        /// Response status code
        status: u16,
    },

    /// Local file or process failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// External conversion tool failed
    #[error("Conversion failed: {0}")]
    Conversion(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ExtractorError {
    fn from(e: serde_json::Error) -> Self {
        ExtractorError::JsonParse(e.to_string())
    }
}

impl From<reqwest::Error> for ExtractorError {
    fn from(e: reqwest::Error) -> Self {
        ExtractorError::Http(e.to_string())
    }
}

/// One item a source could not turn into a candidate
///
/// Yielded in place of a candidate; the stream continues after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    /// What was being processed (seed word, list number, URL)
    pub context: String,
    /// Why it failed
    pub reason: String,
}

impl ItemFailure {
    /// Create a failure record
    pub fn new(context: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self {
            context: context.into(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for ItemFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.context, self.reason)
    }
}
