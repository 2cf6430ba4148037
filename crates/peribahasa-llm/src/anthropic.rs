//! Anthropic Messages API provider
//!
//! Sends a single user message and returns the text of the first content
//! block. Calls are blocking with the configured timeout; retrying is left to
//! the caller so that backoff policy stays in one place.
//!
//! # Examples
//!
//! ```no_run
//! use peribahasa_llm::{AnthropicProvider, LlmConfig};
//! use peribahasa_domain::traits::LlmProvider;
//!
//! let provider = AnthropicProvider::from_env(LlmConfig::default()).unwrap();
//! let text = provider.generate("Say hello").unwrap();
//! ```

use crate::{LlmConfig, LlmError};
use peribahasa_domain::traits::LlmProvider as LlmProviderTrait;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Messages API provider
pub struct AnthropicProvider {
    config: LlmConfig,
    api_key: String,
    client: reqwest::blocking::Client,
}

/// Request body for the Messages API
#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [Message<'a>; 1],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

impl AnthropicProvider {
    /// Create a provider with an explicit API key
    pub fn new(config: LlmConfig, api_key: impl Into<String>) -> Result<Self, LlmError> {
        config.validate().map_err(LlmError::Config)?;
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::MissingApiKey(config.api_key_env.clone()));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| LlmError::Config(format!("failed to build http client: {}", e)))?;

        Ok(Self {
            config,
            api_key,
            client,
        })
    }

    /// Create a provider reading the API key from `config.api_key_env`
    pub fn from_env(config: LlmConfig) -> Result<Self, LlmError> {
        let key = std::env::var(&config.api_key_env).unwrap_or_default();
        Self::new(config, key.trim())
    }

    /// Model in use
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn send(&self, prompt: &str) -> Result<String, LlmError> {
        let url = self.config.messages_url();
        let body = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.config.api_version)
            .json(&body)
            .send()
            .map_err(|e| LlmError::Communication(format!("Request to {} failed: {}", url, e)))?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| LlmError::Communication(format!("Failed to read response: {}", e)))?;
        debug!(%status, bytes = text.len(), "Messages API response");

        let json: Option<Value> = serde_json::from_str(&text).ok();

        if !status.is_success() {
            if let Some(message) = json.as_ref().and_then(remote_error_message) {
                return Err(LlmError::Remote(message));
            }
            return Err(match status {
                reqwest::StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimitExceeded,
                reqwest::StatusCode::NOT_FOUND => {
                    LlmError::ModelNotAvailable(self.config.model.clone())
                }
                _ => LlmError::Communication(format!("HTTP {}: {}", status, text)),
            });
        }

        let json = json.ok_or_else(|| {
            LlmError::InvalidResponse("response body is not valid JSON".to_string())
        })?;
        parse_messages_response(&json)
    }
}

/// Message of a top-level `error` field, if present
fn remote_error_message(json: &Value) -> Option<String> {
    let error = json.get("error")?;
    if error.is_null() {
        return None;
    }
    let message = error
        .get("message")
        .and_then(|m| m.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| error.to_string());
    Some(message)
}

/// Extract `content[0].text` from a Messages API response
pub fn parse_messages_response(json: &Value) -> Result<String, LlmError> {
    if let Some(message) = remote_error_message(json) {
        return Err(LlmError::Remote(message));
    }

    let text = json
        .get("content")
        .and_then(|c| c.as_array())
        .and_then(|blocks| blocks.first())
        .and_then(|block| block.get("text"))
        .and_then(|t| t.as_str())
        .ok_or_else(|| LlmError::InvalidResponse("missing content[0].text".to_string()))?;

    if text.trim().is_empty() {
        return Err(LlmError::EmptyResponse);
    }
    Ok(text.to_string())
}

impl LlmProviderTrait for AnthropicProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        self.send(prompt)
    }
}
