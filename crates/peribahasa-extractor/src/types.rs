//! Options and reports for ingestion runs

use peribahasa_domain::Source;

/// Options for an ingestion run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestOptions {
    /// Count what would be imported without writing
    pub preview: bool,
}

/// Outcome of draining one source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReport {
    /// Source that was drained
    pub source: Source,

    /// Candidates received (excluding item failures)
    pub candidates: usize,

    /// Rows inserted
    pub imported: usize,

    /// Candidates rejected as empty or duplicate
    pub skipped: usize,

    /// Inserts that failed for reasons other than duplication
    pub failed: usize,

    /// Candidates that would have been inserted (preview only)
    pub would_import: usize,

    /// Items the source could not produce
    pub source_errors: usize,
}

impl SourceReport {
    /// Empty report for a source
    pub fn new(source: Source) -> Self {
        Self {
            source,
            candidates: 0,
            imported: 0,
            skipped: 0,
            failed: 0,
            would_import: 0,
            source_errors: 0,
        }
    }
}

/// Outcome of an ingestion run over several sources
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Per-source reports, in the order the sources were drained
    pub sources: Vec<SourceReport>,
}

impl IngestReport {
    /// Total rows inserted
    pub fn imported(&self) -> usize {
        self.sources.iter().map(|s| s.imported).sum()
    }

    /// Total candidates skipped
    pub fn skipped(&self) -> usize {
        self.sources.iter().map(|s| s.skipped).sum()
    }

    /// Total failed inserts
    pub fn failed(&self) -> usize {
        self.sources.iter().map(|s| s.failed).sum()
    }

    /// Total candidates that would be inserted
    pub fn would_import(&self) -> usize {
        self.sources.iter().map(|s| s.would_import).sum()
    }

    /// Total per-item source failures
    pub fn source_errors(&self) -> usize {
        self.sources.iter().map(|s| s.source_errors).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals_sum_sources() {
        let mut a = SourceReport::new(Source::PdfCollection);
        a.imported = 3;
        a.skipped = 1;
        let mut b = SourceReport::new(Source::HtmlArticleA);
        b.imported = 2;
        b.source_errors = 4;

        let report = IngestReport { sources: vec![a, b] };
        assert_eq!(report.imported(), 5);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.source_errors(), 4);
        assert_eq!(report.failed(), 0);
    }
}
