//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use peribahasa_domain::{ReviewCounts, Source};
use peribahasa_extractor::IngestReport;
use peribahasa_reviewer::ReviewReport;
use serde_json::json;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Corpus statistics for one scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusStats {
    /// Source filter, if any
    pub source: Option<Source>,
    /// All entries in scope
    pub total: usize,
    /// Review breakdown
    pub counts: ReviewCounts,
}

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format an ingestion summary, one row per source.
    pub fn format_ingest(&self, report: &IngestReport, preview: bool) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let sources: Vec<_> = report
                    .sources
                    .iter()
                    .map(|s| {
                        json!({
                            "source": s.source.as_str(),
                            "candidates": s.candidates,
                            "imported": s.imported,
                            "would_import": s.would_import,
                            "skipped": s.skipped,
                            "failed": s.failed,
                            "source_errors": s.source_errors,
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&json!({
                    "preview": preview,
                    "sources": sources,
                }))?)
            }
            OutputFormat::Table => {
                let written = if preview { "Would import" } else { "Imported" };
                let mut builder = Builder::default();
                builder.push_record(["Source", "Candidates", written, "Skipped", "Failed", "Source errors"]);
                for s in &report.sources {
                    let count = if preview { s.would_import } else { s.imported };
                    builder.push_record([
                        s.source.to_string(),
                        s.candidates.to_string(),
                        count.to_string(),
                        s.skipped.to_string(),
                        s.failed.to_string(),
                        s.source_errors.to_string(),
                    ]);
                }
                let total = if preview { report.would_import() } else { report.imported() };
                builder.push_record([
                    "total".to_string(),
                    report.sources.iter().map(|s| s.candidates).sum::<usize>().to_string(),
                    total.to_string(),
                    report.skipped().to_string(),
                    report.failed().to_string(),
                    report.source_errors().to_string(),
                ]);
                Ok(Self::render(builder))
            }
        }
    }

    /// Format a review run summary.
    pub fn format_review(&self, report: &ReviewReport, preview: bool) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&json!({
                "preview": preview,
                "total": report.total,
                "batches": report.batches,
                "checked": report.checked,
                "corrected": report.corrected,
                "failed_batches": report.failed_batches,
                "write_failures": report.write_failures,
                "ignored": report.ignored,
                "counts": counts_json(&report.counts),
            }))?),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Metric", "Value"]);
                let rows = [
                    ("Unreviewed at start", report.total),
                    ("Batches", report.batches),
                    (if preview { "Would check" } else { "Checked" }, report.checked),
                    ("Corrected", report.corrected),
                    ("Failed batches", report.failed_batches),
                    ("Write failures", report.write_failures),
                    ("Ignored corrections", report.ignored),
                    ("Needs human review", report.counts.needs_review),
                ];
                for (label, value) in rows {
                    builder.push_record([label.to_string(), value.to_string()]);
                }
                Ok(Self::render(builder))
            }
        }
    }

    /// Format corpus statistics.
    pub fn format_stats(&self, stats: &CorpusStats) -> Result<String> {
        let scope = stats.source.map(|s| s.as_str()).unwrap_or("all");
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&json!({
                "source": scope,
                "total": stats.total,
                "counts": counts_json(&stats.counts),
            }))?),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Scope", "Total", "Unreviewed", "Reviewed", "Needs review", "Failed"]);
                builder.push_record([
                    scope.to_string(),
                    stats.total.to_string(),
                    stats.counts.unreviewed.to_string(),
                    stats.counts.reviewed.to_string(),
                    stats.counts.needs_review.to_string(),
                    stats.counts.failed.to_string(),
                ]);
                Ok(Self::render(builder))
            }
        }
    }

    fn render(builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn counts_json(counts: &ReviewCounts) -> serde_json::Value {
    json!({
        "unreviewed": counts.unreviewed,
        "reviewed": counts.reviewed,
        "needs_review": counts.needs_review,
        "failed": counts.failed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use peribahasa_extractor::SourceReport;

    fn ingest_report() -> IngestReport {
        let mut pdf = SourceReport::new(Source::PdfCollection);
        pdf.candidates = 12;
        pdf.imported = 10;
        pdf.skipped = 2;
        let mut html = SourceReport::new(Source::HtmlArticleA);
        html.candidates = 3;
        html.imported = 3;
        html.source_errors = 1;
        IngestReport { sources: vec![pdf, html] }
    }

    #[test]
    fn test_ingest_table_has_row_per_source() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_ingest(&ingest_report(), false).unwrap();
        assert!(output.contains("pdf-collection"));
        assert!(output.contains("html-article-A"));
        assert!(output.contains("Imported"));
        assert!(output.contains("13"));
    }

    #[test]
    fn test_ingest_preview_header() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_ingest(&ingest_report(), true).unwrap();
        assert!(output.contains("Would import"));
    }

    #[test]
    fn test_ingest_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_ingest(&ingest_report(), false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["sources"][0]["source"], "pdf-collection");
        assert_eq!(value["sources"][1]["source_errors"], 1);
    }

    #[test]
    fn test_review_json_counts() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let report = ReviewReport {
            total: 25,
            batches: 3,
            checked: 25,
            counts: ReviewCounts {
                reviewed: 25,
                needs_review: 4,
                ..Default::default()
            },
            ..Default::default()
        };
        let output = formatter.format_review(&report, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["batches"], 3);
        assert_eq!(value["counts"]["needs_review"], 4);
    }

    #[test]
    fn test_stats_scope() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let stats = CorpusStats {
            source: Some(Source::HtmlArticleB),
            total: 7,
            counts: ReviewCounts::default(),
        };
        assert!(formatter.format_stats(&stats).unwrap().contains("html-article-B"));
    }

    #[test]
    fn test_no_color() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("done"), "✓ done");
    }
}
