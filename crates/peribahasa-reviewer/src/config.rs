//! Configuration for review runs
//!
//! Batch size, retry policy and pacing of the correction workflow.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the correction client and workflow
///
/// # Examples
///
/// ```
/// use peribahasa_reviewer::ReviewerConfig;
/// use std::time::Duration;
///
/// let config = ReviewerConfig::default();
/// assert_eq!(config.batch_size, 10);
/// assert_eq!(config.backoff_step(), Duration::from_secs(2));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewerConfig {
    /// Entries sent to the LLM per request
    /// Default: 10
    pub batch_size: usize,

    /// Attempts per batch before it is marked failed
    /// Default: 3
    pub max_attempts: u32,

    /// Backoff unit; attempt `n` failing waits `n` times this (seconds)
    /// Default: 2
    pub backoff_step_secs: u64,

    /// Minimum gap between two batch requests (milliseconds)
    /// Default: 1000
    pub inter_batch_delay_ms: u64,
}

impl Default for ReviewerConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            max_attempts: 3,
            backoff_step_secs: 2,
            inter_batch_delay_ms: 1000,
        }
    }
}

impl ReviewerConfig {
    /// Get the backoff unit as Duration
    pub fn backoff_step(&self) -> Duration {
        Duration::from_secs(self.backoff_step_secs)
    }

    /// Get the inter-batch delay as Duration
    pub fn inter_batch_delay(&self) -> Duration {
        Duration::from_millis(self.inter_batch_delay_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.batch_size == 0 {
            return Err("batch_size must be greater than 0".to_string());
        }
        if self.max_attempts == 0 {
            return Err("max_attempts must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ReviewerConfig::default();
        assert_eq!(config.batch_size, 10);
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.inter_batch_delay(), Duration::from_secs(1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_batch_size_is_invalid() {
        let config = ReviewerConfig {
            batch_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_attempts_is_invalid() {
        let config = ReviewerConfig {
            max_attempts: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_toml() {
        let config = ReviewerConfig::from_toml("batch_size = 25\nbackoff_step_secs = 5").unwrap();
        assert_eq!(config.batch_size, 25);
        assert_eq!(config.backoff_step(), Duration::from_secs(5));
        assert_eq!(config.max_attempts, 3);
    }
}
