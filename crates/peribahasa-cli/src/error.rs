//! Error types for the CLI application.

use peribahasa_extractor::ExtractorError;
use peribahasa_llm::LlmError;
use peribahasa_reviewer::ReviewError;
use peribahasa_store::StoreError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file could not be read
    #[error("Configuration error: {0}")]
    Config(String),

    /// An option or configuration value is out of range or unknown
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// Database file does not exist
    #[error("Database not found: {} (run 'peribahasa init' first)", .0.display())]
    MissingDatabase(PathBuf),

    /// Required external program is not installed
    #[error("Required tool not found: {0}")]
    MissingTool(String),

    /// Required credential is not set
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    /// Storage error
    #[error("Storage error: {0}")]
    Store(StoreError),

    /// Extraction error
    #[error("Extraction error: {0}")]
    Extractor(ExtractorError),

    /// Review error
    #[error("Review error: {0}")]
    Review(#[from] ReviewError),

    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(LlmError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl CliError {
    /// Process exit status for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::MissingDatabase(_) => 5,
            CliError::InvalidValue(_) => 22,
            _ => 1,
        }
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::MissingDatabase(path) => CliError::MissingDatabase(path),
            other => CliError::Store(other),
        }
    }
}

impl From<ExtractorError> for CliError {
    fn from(e: ExtractorError) -> Self {
        match e {
            ExtractorError::MissingTool(tool) => CliError::MissingTool(tool),
            ExtractorError::Config(msg) => CliError::InvalidValue(msg),
            other => CliError::Extractor(other),
        }
    }
}

impl From<LlmError> for CliError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::MissingApiKey(var) => CliError::MissingCredential(format!("set {}", var)),
            LlmError::Config(msg) => CliError::InvalidValue(msg),
            other => CliError::Llm(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::from(StoreError::MissingDatabase(PathBuf::from("x.db"))).exit_code(), 5);
        assert_eq!(CliError::InvalidValue("source".into()).exit_code(), 22);
        assert_eq!(
            CliError::from(ExtractorError::MissingTool("pdftotext".into())).exit_code(),
            1
        );
        assert_eq!(
            CliError::from(LlmError::MissingApiKey("ANTHROPIC_API_KEY".into())).exit_code(),
            1
        );
        assert_eq!(CliError::Config("unreadable".into()).exit_code(), 1);
    }

    #[test]
    fn test_credential_message_names_variable() {
        let err = CliError::from(LlmError::MissingApiKey("ANTHROPIC_API_KEY".into()));
        assert!(err.to_string().contains("ANTHROPIC_API_KEY"));
    }
}
