//! Peribahasa LLM Provider Layer
//!
//! Implementations of the `LlmProvider` trait from `peribahasa-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing, with scripted failures
//! - `AnthropicProvider`: Messages API over blocking HTTP
//!
//! # Examples
//!
//! ```
//! use peribahasa_llm::MockProvider;
//! use peribahasa_domain::traits::LlmProvider;
//!
//! let provider = MockProvider::new("Hello from LLM!");
//! let result = provider.generate("test prompt").unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! ```

#![warn(missing_docs)]

pub mod anthropic;
pub mod config;

use peribahasa_domain::traits::LlmProvider as LlmProviderTrait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use anthropic::AnthropicProvider;
pub use config::LlmConfig;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// The service answered with an explicit `error` object
    #[error("Remote error: {0}")]
    Remote(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The completion contained no text
    #[error("Empty completion")]
    EmptyResponse,

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// No API key configured
    #[error("Missing API key: set {0}")]
    MissingApiKey(String),

    /// Invalid provider configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// One scripted reply of the mock
#[derive(Debug, Clone)]
enum Scripted {
    Reply(String),
    Fail(String),
}

/// Mock LLM provider for deterministic testing
///
/// Replies are taken from the script queue first, then from the per-prompt
/// table, then the default response. No network calls are made.
///
/// # Examples
///
/// ```
/// use peribahasa_llm::MockProvider;
/// use peribahasa_domain::traits::LlmProvider;
///
/// // Fail twice, then succeed
/// let provider = MockProvider::new("fallback");
/// provider.push_error("timeout");
/// provider.push_error("timeout");
/// provider.push_response("third time lucky");
///
/// assert!(provider.generate("p").is_err());
/// assert!(provider.generate("p").is_err());
/// assert_eq!(provider.generate("p").unwrap(), "third time lucky");
/// assert_eq!(provider.generate("p").unwrap(), "fallback");
/// assert_eq!(provider.call_count(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<HashMap<String, String>>>,
    script: Arc<Mutex<VecDeque<Scripted>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            script: Arc::new(Mutex::new(VecDeque::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(prompt.into(), response.into());
    }

    /// Queue a reply for the next unscripted call
    pub fn push_response(&self, response: impl Into<String>) {
        self.script
            .lock()
            .unwrap()
            .push_back(Scripted::Reply(response.into()));
    }

    /// Queue a failure for the next unscripted call
    pub fn push_error(&self, message: impl Into<String>) {
        self.script
            .lock()
            .unwrap()
            .push_back(Scripted::Fail(message.into()));
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    /// Every prompt received so far
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        if let Some(step) = self.script.lock().unwrap().pop_front() {
            return match step {
                Scripted::Reply(text) => Ok(text),
                Scripted::Fail(message) => Err(LlmError::Other(message)),
            };
        }

        if let Some(response) = self.responses.lock().unwrap().get(prompt) {
            return Ok(response.clone());
        }

        Ok(self.default_response.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        let result = provider.generate("any prompt");
        assert_eq!(result.unwrap(), "Test response");
    }

    #[test]
    fn test_mock_provider_specific_responses() {
        let mut provider = MockProvider::default();
        provider.add_response("hello", "world");

        assert_eq!(provider.generate("hello").unwrap(), "world");
        assert_eq!(provider.generate("unknown").unwrap(), "Default mock response");
    }

    #[test]
    fn test_script_takes_precedence() {
        let mut provider = MockProvider::new("default");
        provider.add_response("hello", "world");
        provider.push_error("boom");

        let err = provider.generate("hello").unwrap_err();
        assert!(matches!(err, LlmError::Other(ref m) if m == "boom"));
        assert_eq!(provider.generate("hello").unwrap(), "world");
    }

    #[test]
    fn test_mock_provider_records_prompts() {
        let provider = MockProvider::new("test");
        provider.generate("one").unwrap();
        provider.generate("two").unwrap();
        assert_eq!(provider.prompts(), vec!["one".to_string(), "two".to_string()]);
    }

    #[test]
    fn test_mock_provider_clone_shares_state() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider1.generate("test").unwrap();

        // Both should share the same call count due to Arc
        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }
}
