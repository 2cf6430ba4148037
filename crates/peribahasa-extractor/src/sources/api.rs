//! Dictionary API source

use super::{CandidateStream, SourceExtractor};
use crate::error::{ExtractorError, ItemFailure};
use crate::fetch::Fetcher;
use peribahasa_domain::{Clock, Pacer, RawCandidate, Sleeper, Source, SystemClock, ThreadSleeper};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Words queried against the dictionary, one request each
pub const SEED_WORDS: &[&str] = &[
    "air", "anak", "angin", "api", "awan", "ayam", "batu", "beras", "biduk", "buah",
    "buaya", "bulan", "bumi", "bunga", "burung", "cacing", "darah", "daun", "duri", "emas",
    "enau", "gading", "gajah", "garam", "gula", "gunung", "harimau", "harta", "hati", "hujan",
    "ikan", "jalan", "kaki", "kapal", "katak", "kayu", "kepala", "kerbau", "kucing", "kuda",
    "lalang", "langit", "laut", "lembu", "lidah", "mata", "minyak", "mulut", "nasi", "nyamuk",
    "ombak", "padi", "pagar", "perahu", "pinang", "pisang", "pohon", "rambut", "ribut", "rotan",
    "rumah", "sampan", "semut", "sungai", "tanah", "tangan", "tebu", "telur", "tikus", "ubi",
    "udang", "ular",
];

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    results: Vec<ApiResult>,
}

#[derive(Debug, Deserialize)]
struct ApiResult {
    #[serde(default)]
    proverbs: Vec<ApiProverb>,
}

#[derive(Debug, Deserialize)]
struct ApiProverb {
    proverb: Option<String>,
    meaning: Option<String>,
}

/// Flatten one dictionary response into candidates
///
/// A body that is not the expected JSON yields a single failure for the word.
///
/// # Examples
///
/// ```
/// use peribahasa_extractor::parse_api_response;
///
/// let body = r#"{"results": [{"word": "air", "proverbs": [
///     {"proverb": "Air dicincang tidak akan putus", "meaning": "Persaudaraan tidak mudah putus"}
/// ]}]}"#;
/// let items = parse_api_response("air", body);
/// assert_eq!(items.len(), 1);
/// assert_eq!(items[0].as_ref().unwrap().text, "Air dicincang tidak akan putus");
/// ```
pub fn parse_api_response(word: &str, body: &str) -> Vec<Result<RawCandidate, ItemFailure>> {
    let response: ApiResponse = match serde_json::from_str(body) {
        Ok(response) => response,
        Err(e) => return vec![Err(ItemFailure::new(word, format!("invalid JSON: {}", e)))],
    };

    response
        .results
        .into_iter()
        .flat_map(|result| result.proverbs)
        .map(|item| match (item.proverb, item.meaning) {
            (Some(proverb), Some(meaning)) => Ok(RawCandidate::new(proverb, meaning)),
            (proverb, _) => Err(ItemFailure::new(
                word,
                format!(
                    "incomplete item {:?}",
                    proverb.unwrap_or_else(|| "<no proverb>".to_string())
                ),
            )),
        })
        .collect()
}

/// Queries the dictionary API once per seed word
pub struct ApiExtractor {
    fetcher: Arc<dyn Fetcher>,
    endpoint: String,
    words: Vec<String>,
    interval: Duration,
    clock: Arc<dyn Clock>,
    sleeper: Arc<dyn Sleeper>,
}

impl ApiExtractor {
    /// Create an extractor over [`SEED_WORDS`] paced on the wall clock
    pub fn new(fetcher: Arc<dyn Fetcher>, endpoint: impl Into<String>, interval: Duration) -> Self {
        Self {
            fetcher,
            endpoint: endpoint.into(),
            words: SEED_WORDS.iter().map(|w| w.to_string()).collect(),
            interval,
            clock: Arc::new(SystemClock),
            sleeper: Arc::new(ThreadSleeper),
        }
    }

    /// Replace the seed vocabulary
    pub fn with_words<I, W>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = W>,
        W: Into<String>,
    {
        self.words = words.into_iter().map(Into::into).collect();
        self
    }

    /// Pace requests with an injected clock and sleeper
    pub fn with_timing(mut self, clock: Arc<dyn Clock>, sleeper: Arc<dyn Sleeper>) -> Self {
        self.clock = clock;
        self.sleeper = sleeper;
        self
    }

    fn query(&self, word: &str) -> Vec<Result<RawCandidate, ItemFailure>> {
        match self.fetcher.get_text(&self.endpoint, &[("q", word)]) {
            Ok(body) => {
                let items = parse_api_response(word, &body);
                debug!(word, items = items.len(), "dictionary lookup");
                items
            }
            Err(e) => {
                warn!(word, error = %e, "dictionary lookup failed");
                vec![Err(ItemFailure::new(word, e))]
            }
        }
    }
}

impl SourceExtractor for ApiExtractor {
    fn source(&self) -> Source {
        Source::ApiDictionary
    }

    fn extract(&self) -> Result<CandidateStream<'_>, ExtractorError> {
        let mut pacer = Pacer::new(self.interval, self.clock.clone(), self.sleeper.clone());
        Ok(Box::new(self.words.iter().flat_map(move |word| {
            pacer.wait();
            self.query(word)
        })))
    }
}
