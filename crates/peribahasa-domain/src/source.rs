//! Source module - which extractor produced an entry

use std::fmt;

/// Origin of a corpus entry
///
/// Every entry is tagged with the extractor that produced it. The tag is
/// written once at insert time and never changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Source {
    /// Online dictionary REST API, queried per seed word
    ApiDictionary,

    /// Numbered collection published as a PDF document
    PdfCollection,

    /// First HTML article with a `<li>proverb: meaning</li>` list
    HtmlArticleA,

    /// Second HTML article with the same list layout
    HtmlArticleB,
}

impl Source {
    /// All sources, in the order the "all sources" import drains them
    pub const ALL: [Source; 4] = [
        Source::ApiDictionary,
        Source::PdfCollection,
        Source::HtmlArticleA,
        Source::HtmlArticleB,
    ];

    /// Get the tag as stored in the `sumber` column
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::ApiDictionary => "api-dictionary",
            Source::PdfCollection => "pdf-collection",
            Source::HtmlArticleA => "html-article-A",
            Source::HtmlArticleB => "html-article-B",
        }
    }

    /// Parse a source tag (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "api-dictionary" => Some(Source::ApiDictionary),
            "pdf-collection" => Some(Source::PdfCollection),
            "html-article-a" => Some(Source::HtmlArticleA),
            "html-article-b" => Some(Source::HtmlArticleB),
            _ => None,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Source {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid source: {}", s))
    }
}
