//! Correction client: one LLM request per batch, with retries

use crate::config::ReviewerConfig;
use crate::prompt::build_prompt;
use peribahasa_domain::traits::LlmProvider;
use peribahasa_domain::{ProverbEntry, Sleeper, ThreadSleeper};
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Result of asking the LLM to correct one batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientOutcome {
    /// A completion was received
    Success {
        /// Completion text
        text: String,
        /// Attempts used, including the successful one
        attempts: u32,
    },
    /// Every attempt failed
    Failed {
        /// Attempts made
        attempts: u32,
        /// Error of the final attempt
        last_error: String,
    },
}

/// Sends batches to an LLM provider with linear backoff
///
/// After failed attempt `n` (except the last) the client sleeps
/// `n * backoff_step`.
///
/// # Examples
///
/// ```
/// use peribahasa_reviewer::{ClientOutcome, CorrectionClient, ReviewerConfig};
/// use peribahasa_domain::RecordingSleeper;
/// use peribahasa_llm::MockProvider;
/// use std::sync::Arc;
///
/// let provider = MockProvider::new("{\"corrections\": []}");
/// provider.push_error("timeout");
/// let sleeper = RecordingSleeper::new();
/// let client = CorrectionClient::new(provider, &ReviewerConfig::default())
///     .with_sleeper(Arc::new(sleeper.clone()));
///
/// let outcome = client.correct(&[]);
/// assert!(matches!(outcome, ClientOutcome::Success { attempts: 2, .. }));
/// assert_eq!(sleeper.sleeps().len(), 1);
/// ```
pub struct CorrectionClient<L> {
    provider: L,
    max_attempts: u32,
    backoff_step: Duration,
    sleeper: Arc<dyn Sleeper>,
}

impl<L> CorrectionClient<L>
where
    L: LlmProvider,
    L::Error: Display,
{
    /// Create a client sleeping on the real clock
    pub fn new(provider: L, config: &ReviewerConfig) -> Self {
        Self {
            provider,
            max_attempts: config.max_attempts.max(1),
            backoff_step: config.backoff_step(),
            sleeper: Arc::new(ThreadSleeper),
        }
    }

    /// Use an injected sleeper for backoff
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Request corrections for a batch
    ///
    /// Never fails; exhaustion is reported as [`ClientOutcome::Failed`].
    pub fn correct(&self, batch: &[ProverbEntry]) -> ClientOutcome {
        let prompt = build_prompt(batch);
        let mut last_error = String::new();

        for attempt in 1..=self.max_attempts {
            match self.provider.generate(&prompt) {
                Ok(text) => {
                    debug!(attempt, entries = batch.len(), "correction received");
                    return ClientOutcome::Success { text, attempts: attempt };
                }
                Err(e) => {
                    warn!(attempt, max_attempts = self.max_attempts, error = %e, "correction request failed");
                    last_error = e.to_string();
                    if attempt < self.max_attempts {
                        self.sleeper.sleep(self.backoff_step * attempt);
                    }
                }
            }
        }

        ClientOutcome::Failed {
            attempts: self.max_attempts,
            last_error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use peribahasa_domain::RecordingSleeper;
    use peribahasa_llm::MockProvider;

    fn client(provider: MockProvider) -> (CorrectionClient<MockProvider>, RecordingSleeper) {
        let sleeper = RecordingSleeper::new();
        let client = CorrectionClient::new(provider, &ReviewerConfig::default())
            .with_sleeper(Arc::new(sleeper.clone()));
        (client, sleeper)
    }

    #[test]
    fn test_first_attempt_success_does_not_sleep() {
        let (client, sleeper) = client(MockProvider::new("ok"));
        assert_eq!(
            client.correct(&[]),
            ClientOutcome::Success { text: "ok".to_string(), attempts: 1 }
        );
        assert!(sleeper.sleeps().is_empty());
    }

    #[test]
    fn test_linear_backoff_then_success() {
        let provider = MockProvider::new("third");
        provider.push_error("connection reset");
        provider.push_error("overloaded");
        let (client, sleeper) = client(provider.clone());

        let outcome = client.correct(&[]);
        assert_eq!(outcome, ClientOutcome::Success { text: "third".to_string(), attempts: 3 });
        assert_eq!(sleeper.sleeps(), vec![Duration::from_secs(2), Duration::from_secs(4)]);
        assert_eq!(provider.call_count(), 3);
    }

    #[test]
    fn test_exhaustion_reports_last_error() {
        let provider = MockProvider::new("never");
        for reason in ["one", "two", "three"] {
            provider.push_error(reason);
        }
        let (client, sleeper) = client(provider);

        match client.correct(&[]) {
            ClientOutcome::Failed { attempts, last_error } => {
                assert_eq!(attempts, 3);
                assert!(last_error.contains("three"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
        // No sleep after the final attempt
        assert_eq!(sleeper.sleeps().len(), 2);
    }
}
