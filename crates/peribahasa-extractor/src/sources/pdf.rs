//! PDF collection source
//!
//! The document is downloaded into a temporary directory, converted with
//! `pdftotext -layout`, and the text is read by [`PdfEntryParser`]:
//!
//! ```text
//!            numbered line                 numbered line (flush, start)
//!   Idle ─────────────────────▶ InEntry ◀──────────────────────┐
//!     ▲  other lines ignored       │ other lines append meaning │
//!     │                            └────────────────────────────┘
//!     └──── end of input (flush)
//! ```

use super::{CandidateStream, SourceExtractor};
use crate::error::{ExtractorError, ItemFailure};
use crate::fetch::Fetcher;
use peribahasa_domain::{RawCandidate, Source};
use regex::Regex;
use std::io::ErrorKind;
use std::process::{Command, Stdio};
use std::sync::{Arc, LazyLock};
use tracing::{debug, info, warn};

static NUMBERED_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+)\.\s+(.+)$").unwrap());

/// Document title words; a line is a heading only when written in capitals
/// or when it is the bare word
const TITLE_WORDS: &[&str] = &["peribahasa", "koleksi", "himpunan", "senarai"];

/// Lowercased prefixes of connector lines
const CONNECTORS: &[&str] = &["maksud:", "maksudnya:", "erti:", "contoh:"];

#[derive(Debug, Clone, PartialEq, Eq)]
enum ParserState {
    Idle,
    InEntry {
        number: String,
        text: String,
        meaning: Vec<String>,
    },
}

/// Line-oriented state machine over layout text
///
/// # Examples
///
/// ```
/// use peribahasa_extractor::PdfEntryParser;
///
/// let mut parser = PdfEntryParser::new();
/// assert!(parser.feed_line("1. Bagai aur dengan tebing").is_none());
/// assert!(parser.feed_line("Saling membantu").is_none());
/// let pair = parser.finish().unwrap().unwrap();
/// assert_eq!(pair.meaning, "Saling membantu");
/// ```
#[derive(Debug, Clone)]
pub struct PdfEntryParser {
    state: ParserState,
}

impl Default for PdfEntryParser {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfEntryParser {
    /// Start in the idle state
    pub fn new() -> Self {
        Self {
            state: ParserState::Idle,
        }
    }

    /// Whether an entry is open
    pub fn in_entry(&self) -> bool {
        matches!(self.state, ParserState::InEntry { .. })
    }

    /// Consume one line, returning the entry it closed, if any
    pub fn feed_line(&mut self, line: &str) -> Option<Result<RawCandidate, ItemFailure>> {
        if let Some(caps) = NUMBERED_LINE.captures(line) {
            let text = caps[2]
                .trim_end_matches(|c: char| c == '.' || c == '…' || c.is_whitespace())
                .to_string();
            let next = ParserState::InEntry {
                number: caps[1].to_string(),
                text,
                meaning: Vec::new(),
            };
            return Self::flush(std::mem::replace(&mut self.state, next));
        }

        let trimmed = line.trim();
        if trimmed.is_empty() || is_page_number(trimmed) || is_boilerplate(trimmed) {
            return None;
        }

        if let ParserState::InEntry { meaning, .. } = &mut self.state {
            meaning.push(trimmed.to_string());
        }
        None
    }

    /// Close the open entry at end of input
    pub fn finish(self) -> Option<Result<RawCandidate, ItemFailure>> {
        Self::flush(self.state)
    }

    fn flush(state: ParserState) -> Option<Result<RawCandidate, ItemFailure>> {
        match state {
            ParserState::Idle => None,
            ParserState::InEntry {
                number,
                text,
                meaning,
            } => {
                let context = format!("entry {}", number);
                if text.is_empty() {
                    return Some(Err(ItemFailure::new(context, "empty proverb")));
                }
                if meaning.is_empty() {
                    return Some(Err(ItemFailure::new(context, format!("no meaning for '{}'", text))));
                }
                Some(Ok(RawCandidate::new(text, meaning.join(" "))))
            }
        }
    }
}

fn is_page_number(line: &str) -> bool {
    line.chars().all(|c| c.is_ascii_digit())
}

fn is_boilerplate(line: &str) -> bool {
    let lower = line.to_lowercase();
    if CONNECTORS.iter().any(|prefix| lower.starts_with(prefix)) {
        return true;
    }
    if let Some(rest) = lower.strip_prefix("halaman") {
        return is_page_number(rest.trim());
    }
    let first_word = lower.split_whitespace().next().unwrap_or_default();
    if !TITLE_WORDS.contains(&first_word) {
        return false;
    }
    lower.trim() == first_word || !line.chars().any(char::is_lowercase)
}

/// Run the state machine over a whole document
pub fn parse_pdf_text(text: &str) -> Vec<Result<RawCandidate, ItemFailure>> {
    let mut parser = PdfEntryParser::new();
    let mut items: Vec<_> = text.lines().filter_map(|line| parser.feed_line(line)).collect();
    items.extend(parser.finish());
    items
}

/// Downloads and parses the PDF collection
pub struct PdfExtractor {
    fetcher: Arc<dyn Fetcher>,
    url: String,
    program: String,
}

impl PdfExtractor {
    /// Create an extractor using `program` for conversion
    pub fn new(fetcher: Arc<dyn Fetcher>, url: impl Into<String>, program: impl Into<String>) -> Self {
        Self {
            fetcher,
            url: url.into(),
            program: program.into(),
        }
    }

    /// Fail with [`ExtractorError::MissingTool`] unless the converter can be run
    pub fn check_tool(&self) -> Result<(), ExtractorError> {
        match Command::new(&self.program)
            .arg("-v")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
        {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(ExtractorError::MissingTool(self.program.clone()))
            }
            Err(e) => Err(ExtractorError::Io(e)),
        }
    }

    fn fetch_text(&self) -> Result<String, ExtractorError> {
        let dir = tempfile::Builder::new().prefix("peribahasa-").tempdir()?;
        let pdf_path = dir.path().join("collection.pdf");
        let bytes = self.fetcher.download(&self.url, &pdf_path)?;
        debug!(url = %self.url, bytes, "downloaded document");

        let output = Command::new(&self.program)
            .arg("-layout")
            .arg(&pdf_path)
            .arg("-")
            .output()?;
        if !output.status.success() {
            return Err(ExtractorError::Conversion(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl SourceExtractor for PdfExtractor {
    fn source(&self) -> Source {
        Source::PdfCollection
    }

    fn extract(&self) -> Result<CandidateStream<'_>, ExtractorError> {
        self.check_tool()?;

        let items = match self.fetch_text() {
            Ok(text) => {
                let items = parse_pdf_text(&text);
                info!(url = %self.url, items = items.len(), "parsed document");
                items
            }
            Err(e) => {
                warn!(url = %self.url, error = %e, "document unavailable");
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

    fn pairs(text: &str) -> Vec<(String, String)> {
        parse_pdf_text(text)
            .into_iter()
            .map(|item| {
                let c = item.unwrap();
                (c.text, c.meaning)
            })
            .collect()
    }

    #[test]
    fn test_two_entries_with_multiline_meaning() {
        let text = "1. Foo bar...\nMeaning line one\nMeaning line two\n2. Baz\nMeaning two";
        assert_eq!(
            pairs(text),
            vec![
                ("Foo bar".to_string(), "Meaning line one Meaning line two".to_string()),
                ("Baz".to_string(), "Meaning two".to_string()),
            ]
        );
    }

    #[test]
    fn test_lines_before_first_entry_are_ignored() {
        let text = "Kata pengantar buku\n\n1. Seperti katak di bawah tempurung\n   Orang yang pengetahuannya sempit";
        assert_eq!(pairs(text).len(), 1);
    }

    #[test]
    fn test_boilerplate_and_page_numbers_are_dropped() {
        let text = "\
HIMPUNAN PERIBAHASA MELAYU
12. Bagai kaca terhempas ke batu…
    Maksud:
    Sangat sedih
    14
Halaman 3
    dan kecewa";
        assert_eq!(
            pairs(text),
            vec![("Bagai kaca terhempas ke batu".to_string(), "Sangat sedih dan kecewa".to_string())]
        );
    }

    #[test]
    fn test_meaning_starting_with_title_word_is_kept() {
        let text = "\
KOLEKSI PERIBAHASA
1. Bagai melukut di tepi gantang
Peribahasa ini bermaksud orang yang tidak dihargai
Koleksi
2. Hangat-hangat tahi ayam
Koleksi semangat yang cepat padam";
        assert_eq!(
            pairs(text),
            vec![
                (
                    "Bagai melukut di tepi gantang".to_string(),
                    "Peribahasa ini bermaksud orang yang tidak dihargai".to_string()
                ),
                (
                    "Hangat-hangat tahi ayam".to_string(),
                    "Koleksi semangat yang cepat padam".to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_halaman_needs_page_number() {
        assert!(is_boilerplate("Halaman 12"));
        assert!(is_boilerplate("HALAMAN"));
        assert!(!is_boilerplate("Halaman rumah yang luas"));
        assert!(is_boilerplate("Maksudnya: sesuatu"));
    }

    #[test]
    fn test_entry_without_meaning_is_failure() {
        let items = parse_pdf_text("1. Tiada maksud\n2. Ada\nMaksud ada");
        assert_eq!(items.len(), 2);
        let failure = items[0].as_ref().unwrap_err();
        assert_eq!(failure.context, "entry 1");
        assert!(items[1].is_ok());
    }

    #[test]
    fn test_parser_state_transitions() {
        let mut parser = PdfEntryParser::new();
        assert!(!parser.in_entry());
        assert!(parser.feed_line("stray line").is_none());
        assert!(!parser.in_entry());
        parser.feed_line("3. Tiga");
        assert!(parser.in_entry());
        let flushed = parser.feed_line("4. Empat").unwrap();
        assert!(flushed.is_err());
    }

    #[test]
    fn test_empty_document() {
        assert!(parse_pdf_text("").is_empty());
    }

    #[test]
    fn test_missing_tool_is_fatal() {
        let extractor = PdfExtractor::new(
            Arc::new(MemoryFetcher::new()),
            "http://host/doc.pdf",
            "pdftotext-not-installed-here",
        );
        assert!(matches!(extractor.check_tool(), Err(ExtractorError::MissingTool(_))));
        assert!(matches!(extractor.extract(), Err(ExtractorError::MissingTool(_))));
    }
}
