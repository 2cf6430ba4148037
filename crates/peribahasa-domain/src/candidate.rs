//! Raw candidates produced by source extractors

use crate::{EntryError, NewEntry, Source};

/// A (proverb, meaning) pair as found in a source, before normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCandidate {
    /// Proverb text as extracted
    pub text: String,
    /// Meaning as extracted
    pub meaning: String,
}

impl RawCandidate {
    /// Create a candidate
    pub fn new(text: impl Into<String>, meaning: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            meaning: meaning.into(),
        }
    }

    /// Normalize both fields and validate them into an insertable entry
    pub fn into_entry(self, source: Source) -> Result<NewEntry, EntryError> {
        NewEntry::new(normalize_text(&self.text), normalize_text(&self.meaning), source)
    }
}

/// Trim and collapse internal whitespace runs into single spaces
///
/// Layout-preserving PDF text and HTML both leave runs of spaces and line
/// breaks inside fields; the dedup key is the collapsed form.
///
/// # Examples
///
/// ```
/// use peribahasa_domain::normalize_text;
///
/// assert_eq!(normalize_text("  Bulat  air\tkerana\npembetung "), "Bulat air kerana pembetung");
/// ```
pub fn normalize_text(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_into_entry_normalizes() {
        let entry = RawCandidate::new("  Ada  udang di balik batu ", "Ada motif\n tersembunyi")
            .into_entry(Source::HtmlArticleB)
            .unwrap();
        assert_eq!(entry.text(), "Ada udang di balik batu");
        assert_eq!(entry.meaning(), "Ada motif tersembunyi");
        assert_eq!(entry.source(), Source::HtmlArticleB);
    }

    proptest! {
        #[test]
        fn prop_blank_text_never_becomes_entry(ws in "[ \t\n\r]*", meaning in "[a-z]{1,20}") {
            let result = RawCandidate::new(ws, meaning).into_entry(Source::PdfCollection);
            prop_assert_eq!(result, Err(EntryError::EmptyText));
        }

        #[test]
        fn prop_blank_meaning_never_becomes_entry(text in "[a-z]{1,20}", ws in "[ \t\n\r]*") {
            let result = RawCandidate::new(text, ws).into_entry(Source::PdfCollection);
            prop_assert_eq!(result, Err(EntryError::EmptyMeaning));
        }

        #[test]
        fn prop_normalize_is_idempotent(s in "\\PC{0,40}") {
            let once = normalize_text(&s);
            prop_assert_eq!(normalize_text(&once), once.clone());
            prop_assert!(!once.starts_with(' ') && !once.ends_with(' '));
            prop_assert!(!once.contains("  "));
        }
    }
}
