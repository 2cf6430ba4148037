//! Entry module - the unit of the corpus

use crate::{ReviewStatus, Source};
use std::fmt;

/// Store-assigned identifier of an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(i64);

impl EntryId {
    /// Wrap a raw row id
    ///
    /// This is primarily for storage layer deserialization.
    pub fn from_value(value: i64) -> Self {
        Self(value)
    }

    /// Get the raw row id
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors raised when constructing an entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryError {
    /// Proverb text is empty after trimming
    EmptyText,
    /// Meaning is empty after trimming
    EmptyMeaning,
}

impl fmt::Display for EntryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryError::EmptyText => f.write_str("proverb text is empty"),
            EntryError::EmptyMeaning => f.write_str("meaning is empty"),
        }
    }
}

impl std::error::Error for EntryError {}

/// A proverb entry as persisted in the corpus
#[derive(Debug, Clone, PartialEq)]
pub struct ProverbEntry {
    /// Store-assigned identifier
    pub id: EntryId,

    /// Canonical proverb text (the dedup key)
    pub text: String,

    /// Explanation of the proverb
    pub meaning: String,

    /// Consumption flag of the serving rotation
    pub used: bool,

    /// Extractor that produced the entry
    pub source: Option<Source>,

    /// LLM-suggested proverb text
    pub reviewed_text: Option<String>,

    /// LLM-suggested meaning
    pub reviewed_meaning: Option<String>,

    /// Review state
    pub review: ReviewStatus,
}

impl ProverbEntry {
    /// Combined character length of proverb and meaning
    pub fn combined_len(&self) -> usize {
        self.text.chars().count() + self.meaning.chars().count()
    }
}

/// An entry ready to be inserted
///
/// Construction enforces the non-empty invariant, so every `NewEntry` that
/// reaches the store is valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    text: String,
    meaning: String,
    source: Source,
}

impl NewEntry {
    /// Create a new entry, trimming both fields
    ///
    /// # Examples
    ///
    /// ```
    /// use peribahasa_domain::{NewEntry, Source};
    ///
    /// let entry = NewEntry::new(" Bagai aur dengan tebing ", "Saling membantu", Source::HtmlArticleA).unwrap();
    /// assert_eq!(entry.text(), "Bagai aur dengan tebing");
    ///
    /// assert!(NewEntry::new("  ", "x", Source::HtmlArticleA).is_err());
    /// ```
    pub fn new(
        text: impl AsRef<str>,
        meaning: impl AsRef<str>,
        source: Source,
    ) -> Result<Self, EntryError> {
        let text = text.as_ref().trim();
        let meaning = meaning.as_ref().trim();
        if text.is_empty() {
            return Err(EntryError::EmptyText);
        }
        if meaning.is_empty() {
            return Err(EntryError::EmptyMeaning);
        }
        Ok(Self {
            text: text.to_string(),
            meaning: meaning.to_string(),
            source,
        })
    }

    /// Proverb text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Meaning
    pub fn meaning(&self) -> &str {
        &self.meaning
    }

    /// Source tag
    pub fn source(&self) -> Source {
        self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entry_rejects_empty_fields() {
        assert_eq!(
            NewEntry::new("", "meaning", Source::ApiDictionary),
            Err(EntryError::EmptyText)
        );
        assert_eq!(
            NewEntry::new("text", " \t", Source::ApiDictionary),
            Err(EntryError::EmptyMeaning)
        );
    }

    #[test]
    fn test_combined_len_counts_chars() {
        let entry = ProverbEntry {
            id: EntryId::from_value(1),
            text: "Air dicincang".to_string(),
            meaning: "tak putus…".to_string(),
            used: false,
            source: Some(Source::PdfCollection),
            reviewed_text: None,
            reviewed_meaning: None,
            review: ReviewStatus::Unreviewed,
        };
        assert_eq!(entry.combined_len(), 13 + 10);
    }
}
