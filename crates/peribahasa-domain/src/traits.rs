//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::{Confidence, EntryId, NewEntry, ProverbEntry, ReviewCounts, Source};

/// Trait for storing and reviewing corpus entries
///
/// Implemented by the infrastructure layer (peribahasa-store). Every write is
/// a single durable statement; nothing is buffered.
pub trait ProverbStore {
    /// Error type for store operations
    type Error;

    /// Whether an entry with exactly this proverb text exists
    fn exists(&self, text: &str) -> Result<bool, Self::Error>;

    /// Insert a new entry (unused, unreviewed)
    ///
    /// Fails with an error for which [`ProverbStore::is_duplicate`] holds when
    /// the text is already present.
    fn insert(&mut self, entry: &NewEntry) -> Result<EntryId, Self::Error>;

    /// Whether an error returned by [`ProverbStore::insert`] is a duplicate rejection
    fn is_duplicate(error: &Self::Error) -> bool;

    /// Count entries that were never reviewed
    fn count_unreviewed(&self, source: Option<Source>) -> Result<usize, Self::Error>;

    /// Fetch one page of unreviewed entries, ordered by id
    fn fetch_unreviewed_batch(
        &self,
        limit: usize,
        offset: usize,
        source: Option<Source>,
    ) -> Result<Vec<ProverbEntry>, Self::Error>;

    /// Record an LLM correction for an entry, overwriting any earlier one
    fn apply_correction(
        &mut self,
        id: EntryId,
        reviewed_text: &str,
        reviewed_meaning: &str,
        confidence: Confidence,
    ) -> Result<(), Self::Error>;

    /// Record that the review attempt for an entry failed
    fn mark_review_failed(&mut self, id: EntryId) -> Result<(), Self::Error>;

    /// Breakdown of entries by review state
    fn review_counts(&self, source: Option<Source>) -> Result<ReviewCounts, Self::Error>;
}

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (peribahasa-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate a text completion for a single user prompt
    fn generate(&self, prompt: &str) -> Result<String, Self::Error>;
}
