//! Ingestion pipeline: drains extractors into the store

use crate::error::ExtractorError;
use crate::sources::SourceExtractor;
use crate::types::{IngestOptions, IngestReport, SourceReport};
use peribahasa_domain::traits::ProverbStore;
use std::collections::HashSet;
use std::fmt::Display;
use tracing::{debug, info, warn};

/// Normalizes, deduplicates and inserts candidates
///
/// Duplicates are detected against the store and against texts already seen
/// in this run, so preview counts match what a real import would do.
pub struct IngestPipeline<'a, S: ProverbStore> {
    store: &'a mut S,
    options: IngestOptions,
    seen: HashSet<String>,
}

impl<'a, S> IngestPipeline<'a, S>
where
    S: ProverbStore,
    S::Error: Display,
{
    /// Create a pipeline writing to `store`
    pub fn new(store: &'a mut S, options: IngestOptions) -> Self {
        Self {
            store,
            options,
            seen: HashSet::new(),
        }
    }

    /// Drain one extractor
    ///
    /// Only a fatal extractor precondition is returned as an error; every
    /// per-item problem is counted in the report.
    pub fn ingest(&mut self, extractor: &dyn SourceExtractor) -> Result<SourceReport, ExtractorError> {
        let source = extractor.source();
        let mut report = SourceReport::new(source);
        info!(%source, preview = self.options.preview, "ingesting");

        for item in extractor.extract()? {
            let candidate = match item {
                Ok(candidate) => candidate,
                Err(failure) => {
                    warn!(%source, %failure, "source item failed");
                    report.source_errors += 1;
                    continue;
                }
            };
            report.candidates += 1;

            let entry = match candidate.into_entry(source) {
                Ok(entry) => entry,
                Err(e) => {
                    debug!(%source, reason = %e, "skipping empty candidate");
                    report.skipped += 1;
                    continue;
                }
            };

            if self.seen.contains(entry.text()) {
                report.skipped += 1;
                continue;
            }
            match self.store.exists(entry.text()) {
                Ok(true) => {
                    self.seen.insert(entry.text().to_string());
                    report.skipped += 1;
                    continue;
                }
                Ok(false) => {}
                Err(e) => {
                    warn!(%source, text = entry.text(), error = %e, "duplicate check failed");
                    report.failed += 1;
                    continue;
                }
            }
            self.seen.insert(entry.text().to_string());

            if self.options.preview {
                report.would_import += 1;
                continue;
            }

            match self.store.insert(&entry) {
                Ok(id) => {
                    debug!(%source, %id, text = entry.text(), "imported");
                    report.imported += 1;
                }
                Err(e) if S::is_duplicate(&e) => report.skipped += 1,
                Err(e) => {
                    warn!(%source, text = entry.text(), error = %e, "insert failed");
                    report.failed += 1;
                }
            }
        }

        info!(
            %source,
            candidates = report.candidates,
            imported = report.imported,
            skipped = report.skipped,
            failed = report.failed,
            would_import = report.would_import,
            source_errors = report.source_errors,
            "source done"
        );
        Ok(report)
    }

    /// Drain extractors in order, each fully before the next
    pub fn run_all(
        &mut self,
        extractors: &[Box<dyn SourceExtractor>],
    ) -> Result<IngestReport, ExtractorError> {
        let mut report = IngestReport::default();
        for extractor in extractors {
            report.sources.push(self.ingest(extractor.as_ref())?);
        }
        Ok(report)
    }
}
