//! HTML article sources
//!
//! Both articles list entries as `<li>proverb: meaning</li>`.

use super::{CandidateStream, SourceExtractor};
use crate::error::{ExtractorError, ItemFailure};
use crate::fetch::Fetcher;
use peribahasa_domain::{RawCandidate, Source};
use regex::Regex;
use std::sync::{Arc, LazyLock};
use tracing::{info, warn};

static LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<li(?:\s[^>]*)?>(.*?)</li>").unwrap());

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

const ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&rsquo;", "\u{2019}"),
    ("&lsquo;", "\u{2018}"),
    ("&ldquo;", "\u{201C}"),
    ("&rdquo;", "\u{201D}"),
    ("&hellip;", "\u{2026}"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    // last, so "&amp;nbsp;" stays literal
    ("&amp;", "&"),
];

fn decode_entities(text: &str) -> String {
    ENTITIES
        .iter()
        .fold(text.to_string(), |acc, (entity, replacement)| acc.replace(entity, replacement))
}

/// Trim whitespace, then at most one trailing period, then whitespace again
fn clean_side(side: &str) -> &str {
    let side = side.trim();
    side.strip_suffix('.').unwrap_or(side).trim_end()
}

/// Extract (proverb, meaning) pairs from list items of a page
///
/// Items without a colon or with an empty side after cleaning are not
/// entries and are dropped silently.
///
/// # Examples
///
/// ```
/// use peribahasa_extractor::parse_html;
///
/// let pairs = parse_html("<li>Ada udang di balik batu: Ada motif tersembunyi.</li>");
/// assert_eq!(pairs[0].text, "Ada udang di balik batu");
/// assert_eq!(pairs[0].meaning, "Ada motif tersembunyi");
/// ```
pub fn parse_html(page: &str) -> Vec<RawCandidate> {
    LIST_ITEM
        .captures_iter(page)
        .filter_map(|caps| {
            let inner = TAG.replace_all(&caps[1], "");
            let decoded = decode_entities(&inner);
            let (proverb, meaning) = decoded.split_once(':')?;
            let (proverb, meaning) = (clean_side(proverb), clean_side(meaning));
            if proverb.is_empty() || meaning.is_empty() {
                return None;
            }
            Some(RawCandidate::new(proverb, meaning))
        })
        .collect()
}

/// Fetches one article and lists its entries
pub struct HtmlExtractor {
    source: Source,
    fetcher: Arc<dyn Fetcher>,
    url: String,
}

impl HtmlExtractor {
    /// Create an extractor for one of the article sources
    pub fn new(source: Source, fetcher: Arc<dyn Fetcher>, url: impl Into<String>) -> Self {
        Self {
            source,
            fetcher,
            url: url.into(),
        }
    }
}

impl SourceExtractor for HtmlExtractor {
    fn source(&self) -> Source {
        self.source
    }

    fn extract(&self) -> Result<CandidateStream<'_>, ExtractorError> {
        let items: Vec<Result<RawCandidate, ItemFailure>> =
            match self.fetcher.get_text(&self.url, &[]) {
                Ok(page) => {
                    let pairs = parse_html(&page);
                    info!(source = %self.source, url = %self.url, items = pairs.len(), "parsed article");
                    pairs.into_iter().map(Ok).collect()
                }
                Err(e) => {
                    warn!(source = %self.source, url = %self.url, error = %e, "article unavailable");
                    vec![Err(ItemFailure::new(self.url.clone(), e))]
                }
            };
        Ok(Box::new(items.into_iter()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MemoryFetcher;

    #[test]
    fn test_fragment_is_cleaned() {
        let pairs = parse_html("<li>Ada udang di balik batu: Ada motif tersembunyi.</li>");
        assert_eq!(
            pairs,
            vec![RawCandidate::new("Ada udang di balik batu", "Ada motif tersembunyi")]
        );
    }

    #[test]
    fn test_entities_and_inline_tags() {
        let page = "<ul>\n<LI class=\"p\"><strong>Bagai&nbsp;pinang dibelah dua</strong>: Sama cantik&hellip; sama padan.</LI>\n</ul>";
        let pairs = parse_html(page);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].text, "Bagai pinang dibelah dua");
        assert_eq!(pairs[0].meaning, "Sama cantik\u{2026} sama padan");
    }

    #[test]
    fn test_splits_on_first_colon_only() {
        let pairs = parse_html("<li>Harimau mati meninggalkan belang: nama baik: dikenang</li>");
        assert_eq!(pairs[0].meaning, "nama baik: dikenang");
    }

    #[test]
    fn test_only_one_trailing_period_removed() {
        let pairs = parse_html("<li>Sediakan payung sebelum hujan..: Berjaga-jaga.</li>");
        assert_eq!(pairs[0].text, "Sediakan payung sebelum hujan.");
        assert_eq!(pairs[0].meaning, "Berjaga-jaga");
    }

    #[test]
    fn test_items_without_pair_are_dropped() {
        let page = "<li>Menu utama</li><li>: tanpa peribahasa</li><li>Tanpa maksud: .</li><li>A: B</li>";
        assert_eq!(parse_html(page), vec![RawCandidate::new("A", "B")]);
    }

    #[test]
    fn test_fetch_failure_yields_single_item_failure() {
        let extractor = HtmlExtractor::new(
            Source::HtmlArticleB,
            Arc::new(MemoryFetcher::new()),
            "http://host/missing",
        );
        let items: Vec<_> = extractor.extract().unwrap().collect();
        assert_eq!(items.len(), 1);
        assert!(items[0].is_err());
        assert_eq!(extractor.source(), Source::HtmlArticleB);
    }
}
