//! Peribahasa Extractor
//!
//! Pulls candidate entries from the corpus sources and ingests them.
//!
//! # Overview
//!
//! Four sources feed the corpus: a dictionary API queried per seed word, a
//! PDF collection, and two HTML articles. Each implements
//! [`SourceExtractor`] and yields a finite stream of raw candidates. The
//! [`IngestPipeline`] normalizes them, skips empty and duplicate entries and
//! inserts the rest, returning a [`SourceReport`] per source.
//!
//! # Architecture
//!
//! ```text
//! Fetcher → SourceExtractor → RawCandidate → IngestPipeline → ProverbStore
//! ```
//!
//! # Example Usage
//!
//! ```
//! use peribahasa_extractor::{HtmlExtractor, IngestOptions, IngestPipeline, MemoryFetcher};
//! use peribahasa_domain::Source;
//! use peribahasa_store::SqliteStore;
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = MemoryFetcher::new();
//! fetcher.insert("http://host/a", "<ul><li>Ada gula ada semut: Tempat yang mewah didatangi orang.</li></ul>");
//!
//! let article = HtmlExtractor::new(Source::HtmlArticleA, Arc::new(fetcher), "http://host/a");
//! let mut store = SqliteStore::in_memory()?;
//! let report = IngestPipeline::new(&mut store, IngestOptions::default()).ingest(&article)?;
//!
//! assert_eq!(report.imported, 1);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod fetch;
mod pipeline;
pub mod sources;
mod types;

pub use config::{ExtractorConfig, MIN_REQUEST_INTERVAL_MS};
pub use error::{ExtractorError, ItemFailure};
pub use fetch::{Fetcher, HttpFetcher, MemoryFetcher};
pub use pipeline::IngestPipeline;
pub use sources::{
    parse_api_response, parse_html, parse_pdf_text, ApiExtractor, CandidateStream, HtmlExtractor,
    PdfEntryParser, PdfExtractor, SourceExtractor, SEED_WORDS,
};
pub use types::{IngestOptions, IngestReport, SourceReport};
