//! Source extractors
//!
//! Each source turns one remote location into a finite stream of raw
//! candidates. A malformed item is yielded as an [`ItemFailure`] and the
//! stream carries on; `extract` only fails for preconditions that make the
//! whole source unusable.

pub mod api;
pub mod html;
pub mod pdf;

use crate::error::{ExtractorError, ItemFailure};
use peribahasa_domain::{RawCandidate, Source};

pub use api::{parse_api_response, ApiExtractor, SEED_WORDS};
pub use html::{parse_html, HtmlExtractor};
pub use pdf::{parse_pdf_text, PdfEntryParser, PdfExtractor};

/// Items produced by one extraction pass
pub type CandidateStream<'a> = Box<dyn Iterator<Item = Result<RawCandidate, ItemFailure>> + 'a>;

/// A source of raw (proverb, meaning) candidates
pub trait SourceExtractor {
    /// Tag recorded on every entry from this source
    fn source(&self) -> Source;

    /// Start a new pass over the source
    ///
    /// Every call fetches and parses again; the returned stream cannot be
    /// restarted.
    fn extract(&self) -> Result<CandidateStream<'_>, ExtractorError>;
}
