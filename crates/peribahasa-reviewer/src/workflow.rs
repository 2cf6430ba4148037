//! Correction workflow: pages unreviewed entries through the client

use crate::client::{ClientOutcome, CorrectionClient};
use crate::config::ReviewerConfig;
use crate::error::ReviewError;
use crate::parser::parse_corrections;
use peribahasa_domain::traits::{LlmProvider, ProverbStore};
use peribahasa_domain::{EntryId, Pacer, ProverbEntry, ReviewCounts, Source};
use std::collections::{HashMap, HashSet};
use std::fmt::Display;
use tracing::{debug, info, warn};

/// Options for one review run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewOptions {
    /// Entries per request
    pub batch_size: usize,
    /// Only review entries from this source
    pub source: Option<Source>,
    /// Walk the batches without calling the LLM or writing
    pub preview: bool,
}

impl Default for ReviewOptions {
    fn default() -> Self {
        Self {
            batch_size: ReviewerConfig::default().batch_size,
            source: None,
            preview: false,
        }
    }
}

/// Outcome of a review run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewReport {
    /// Unreviewed entries at the start of the run
    pub total: usize,
    /// Batches fetched
    pub batches: usize,
    /// Entries reviewed (or walked, in preview)
    pub checked: usize,
    /// Reviewed entries whose text or meaning was changed
    pub corrected: usize,
    /// Batches whose entries were marked failed
    pub failed_batches: usize,
    /// Store writes that did not succeed
    pub write_failures: usize,
    /// Corrections dropped for an id outside the batch or already applied
    pub ignored: usize,
    /// Review breakdown after the run
    pub counts: ReviewCounts,
}

/// Batches unreviewed entries through a [`CorrectionClient`]
///
/// Batches are fetched in id order. The fetch offset is the number of entries
/// from earlier batches that are still unreviewed, so entries that leave the
/// unreviewed set never shift a later page past unseen entries.
pub struct ReviewWorkflow {
    options: ReviewOptions,
    pacer: Pacer,
}

impl ReviewWorkflow {
    /// Create a workflow pacing batches with `pacer`
    pub fn new(options: ReviewOptions, pacer: Pacer) -> Result<Self, ReviewError> {
        if options.batch_size == 0 {
            return Err(ReviewError::Config("batch_size must be greater than 0".to_string()));
        }
        Ok(Self { options, pacer })
    }

    /// Run one pass over the unreviewed entries
    ///
    /// Only failures to count or fetch entries abort the run.
    pub fn run<S, L>(
        &mut self,
        store: &mut S,
        client: &CorrectionClient<L>,
    ) -> Result<ReviewReport, ReviewError>
    where
        S: ProverbStore,
        S::Error: Display,
        L: LlmProvider,
        L::Error: Display,
    {
        let ReviewOptions {
            batch_size,
            source,
            preview,
        } = self.options;
        let store_err = |e: S::Error| ReviewError::Store(e.to_string());

        let mut report = ReviewReport {
            total: store.count_unreviewed(source).map_err(store_err)?,
            ..Default::default()
        };
        if report.total == 0 {
            info!(source = ?source, "nothing to review");
            report.counts = store.review_counts(source).map_err(store_err)?;
            return Ok(report);
        }
        info!(total = report.total, batch_size, preview, source = ?source, "starting review");

        let mut processed = 0;
        let mut offset = 0;
        while processed < report.total {
            let batch = store
                .fetch_unreviewed_batch(batch_size, offset, source)
                .map_err(store_err)?;
            if batch.is_empty() {
                debug!(processed, offset, "no more unreviewed entries");
                break;
            }
            report.batches += 1;
            processed += batch.len();

            let still_unreviewed = if preview {
                report.checked += batch.len();
                batch.len()
            } else {
                self.pacer.wait();
                self.review_batch(store, client, &batch, &mut report)
            };
            offset += still_unreviewed;
            debug!(batch = report.batches, size = batch.len(), processed, offset, "batch done");
        }

        report.counts = store.review_counts(source).map_err(store_err)?;
        info!(
            checked = report.checked,
            corrected = report.corrected,
            failed_batches = report.failed_batches,
            write_failures = report.write_failures,
            needs_review = report.counts.needs_review,
            "review finished"
        );
        Ok(report)
    }

    /// Returns how many entries of the batch are still unreviewed
    fn review_batch<S, L>(
        &self,
        store: &mut S,
        client: &CorrectionClient<L>,
        batch: &[ProverbEntry],
        report: &mut ReviewReport,
    ) -> usize
    where
        S: ProverbStore,
        S::Error: Display,
        L: LlmProvider,
        L::Error: Display,
    {
        let corrections = match client.correct(batch) {
            ClientOutcome::Success { text, .. } => parse_corrections(&text),
            ClientOutcome::Failed { attempts, last_error } => {
                warn!(attempts, error = %last_error, "batch failed");
                return Self::fail_batch(store, batch, report);
            }
        };
        let corrections = match corrections {
            Ok(corrections) => corrections,
            Err(e) => {
                warn!(error = %e, "unusable correction reply");
                return Self::fail_batch(store, batch, report);
            }
        };

        let originals: HashMap<EntryId, &ProverbEntry> = batch.iter().map(|e| (e.id, e)).collect();
        let mut applied: HashSet<EntryId> = HashSet::new();
        for correction in corrections {
            let Some(original) = originals.get(&correction.id) else {
                warn!(id = %correction.id, "correction for an id outside the batch");
                report.ignored += 1;
                continue;
            };
            if applied.contains(&correction.id) {
                warn!(id = %correction.id, "repeated correction, keeping the first");
                report.ignored += 1;
                continue;
            }
            match store.apply_correction(
                correction.id,
                &correction.text,
                &correction.meaning,
                correction.confidence,
            ) {
                Ok(()) => {
                    applied.insert(correction.id);
                    report.checked += 1;
                    if correction.text != original.text || correction.meaning != original.meaning {
                        report.corrected += 1;
                        debug!(id = %correction.id, confidence = %correction.confidence, "corrected");
                    }
                }
                Err(e) => {
                    warn!(id = %correction.id, error = %e, "failed to store correction");
                    report.write_failures += 1;
                }
            }
        }

        let unreviewed = batch.len().saturating_sub(applied.len());
        if unreviewed > 0 {
            debug!(missing = unreviewed, "entries left unreviewed");
        }
        unreviewed
    }

    fn fail_batch<S>(store: &mut S, batch: &[ProverbEntry], report: &mut ReviewReport) -> usize
    where
        S: ProverbStore,
        S::Error: Display,
    {
        report.failed_batches += 1;
        let mut unmarked = 0;
        for entry in batch {
            if let Err(e) = store.mark_review_failed(entry.id) {
                warn!(id = %entry.id, error = %e, "failed to mark entry");
                report.write_failures += 1;
                unmarked += 1;
            }
        }
        unmarked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use peribahasa_domain::{ManualClock, NewEntry, RecordingSleeper, ReviewStatus};
    use peribahasa_llm::MockProvider;
    use peribahasa_store::SqliteStore;
    use std::sync::Arc;
    use std::time::Duration;

    fn seeded(n: usize) -> SqliteStore {
        let mut store = SqliteStore::in_memory().unwrap();
        for i in 0..n {
            let entry = NewEntry::new(format!("Peribahasa {}", i), format!("Maksud {}", i), Source::PdfCollection)
                .unwrap();
            store.insert(&entry).unwrap();
        }
        store
    }

    fn workflow(options: ReviewOptions) -> (ReviewWorkflow, RecordingSleeper) {
        let clock = ManualClock::new();
        let sleeper = RecordingSleeper::new().with_clock(clock.clone());
        let pacer = Pacer::new(Duration::from_secs(1), Arc::new(clock), Arc::new(sleeper.clone()));
        (ReviewWorkflow::new(options, pacer).unwrap(), sleeper)
    }

    fn quiet_client(provider: MockProvider) -> CorrectionClient<MockProvider> {
        CorrectionClient::new(provider, &ReviewerConfig::default())
            .with_sleeper(Arc::new(RecordingSleeper::new()))
    }

    #[test]
    fn test_empty_store_is_noop() {
        let mut store = seeded(0);
        let provider = MockProvider::new("unused");
        let (mut wf, _) = workflow(ReviewOptions::default());

        let report = wf.run(&mut store, &quiet_client(provider.clone())).unwrap();
        assert_eq!(report, ReviewReport::default());
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let options = ReviewOptions { batch_size: 0, ..Default::default() };
        assert!(ReviewWorkflow::new(options, Pacer::system(Duration::ZERO)).is_err());
    }

    #[test]
    fn test_preview_walks_all_batches_without_calls() {
        let mut store = seeded(25);
        let provider = MockProvider::new("unused");
        let (mut wf, sleeper) = workflow(ReviewOptions { preview: true, ..Default::default() });

        let report = wf.run(&mut store, &quiet_client(provider.clone())).unwrap();
        assert_eq!(report.batches, 3);
        assert_eq!(report.checked, 25);
        assert_eq!(provider.call_count(), 0);
        assert!(sleeper.sleeps().is_empty());
        assert_eq!(store.count_unreviewed(None).unwrap(), 25);
    }

    #[test]
    fn test_malformed_reply_marks_batch_failed() {
        let mut store = seeded(3);
        let provider = MockProvider::new("I could not process these entries.");
        let (mut wf, _) = workflow(ReviewOptions::default());

        let report = wf.run(&mut store, &quiet_client(provider)).unwrap();
        assert_eq!(report.failed_batches, 1);
        assert_eq!(report.checked, 0);
        assert_eq!(report.counts.failed, 3);
        assert_eq!(report.counts.unreviewed, 0);
    }

    #[test]
    fn test_omitted_entries_are_not_skipped_over() {
        // Three batches of two; the LLM only ever corrects the first entry it
        // sees, so the second entry of each page stays unreviewed.
        let mut store = seeded(6);
        let provider = MockProvider::new("");
        for id in [1, 3, 5] {
            provider.push_response(format!(
                r#"{{"corrections": [{{"id": {id}, "cek_peribahasa": "P", "cek_artinya": "M", "cek": 0.9}}]}}"#
            ));
        }
        let (mut wf, _) = workflow(ReviewOptions { batch_size: 2, ..Default::default() });

        let report = wf.run(&mut store, &quiet_client(provider.clone())).unwrap();
        assert_eq!(report.batches, 3);
        assert_eq!(report.checked, 3);
        assert_eq!(report.corrected, 3);

        let prompts = provider.prompts();
        assert!(prompts[1].contains("\"id\": 3") && prompts[1].contains("\"id\": 4"));
        assert!(prompts[2].contains("\"id\": 5") && prompts[2].contains("\"id\": 6"));

        for id in [2, 4, 6] {
            let entry = store.get(EntryId::from_value(id)).unwrap().unwrap();
            assert_eq!(entry.review, ReviewStatus::Unreviewed);
        }
    }

    #[test]
    fn test_foreign_ids_are_ignored() {
        let mut store = seeded(1);
        let provider = MockProvider::new(
            r#"{"corrections": [
                {"id": 1, "cek_peribahasa": "Peribahasa 0", "cek_artinya": "Maksud 0", "cek": 1.0},
                {"id": 99, "cek_peribahasa": "x", "cek_artinya": "y", "cek": 1.0}
            ]}"#,
        );
        let (mut wf, _) = workflow(ReviewOptions::default());

        let report = wf.run(&mut store, &quiet_client(provider)).unwrap();
        assert_eq!(report.checked, 1);
        assert_eq!(report.corrected, 0, "unchanged text is not a correction");
        assert_eq!(report.ignored, 1);
        assert_eq!(report.write_failures, 0);
    }

    #[test]
    fn test_repeated_id_counts_once() {
        let mut store = seeded(1);
        let provider = MockProvider::new(
            r#"{"corrections": [
                {"id": 1, "cek_peribahasa": "Pertama", "cek_artinya": "Maksud pertama", "cek": 0.9},
                {"id": 1, "cek_peribahasa": "Kedua", "cek_artinya": "Maksud kedua", "cek": 0.2}
            ]}"#,
        );
        let (mut wf, _) = workflow(ReviewOptions::default());

        let report = wf.run(&mut store, &quiet_client(provider.clone())).unwrap();
        assert_eq!(report.batches, 1);
        assert_eq!(report.checked, 1);
        assert_eq!(report.corrected, 1);
        assert_eq!(report.ignored, 1);
        assert_eq!(provider.call_count(), 1);

        let entry = store.get(EntryId::from_value(1)).unwrap().unwrap();
        assert_eq!(entry.reviewed_text.as_deref(), Some("Pertama"));
        assert_eq!(report.counts.needs_review, 0);
    }
}
