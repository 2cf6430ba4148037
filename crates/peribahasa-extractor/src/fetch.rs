//! HTTP fetching behind a trait so sources can be tested offline

use crate::error::ExtractorError;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::debug;

/// Blocking fetch operations used by the extractors
pub trait Fetcher: Send + Sync {
    /// GET a URL with query parameters and return the body as text
    fn get_text(&self, url: &str, query: &[(&str, &str)]) -> Result<String, ExtractorError>;

    /// GET a URL and write the body to `dest`
    fn download(&self, url: &str, dest: &Path) -> Result<u64, ExtractorError>;
}

/// `reqwest` implementation of [`Fetcher`]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// Create a fetcher with a per-request timeout and user agent
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, ExtractorError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    fn get(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<reqwest::blocking::Response, ExtractorError> {
        let response = self.client.get(url).query(query).send()?;
        let status = response.status();
        debug!(url, %status, "GET");
        if !status.is_success() {
            return Err(ExtractorError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

impl Fetcher for HttpFetcher {
    fn get_text(&self, url: &str, query: &[(&str, &str)]) -> Result<String, ExtractorError> {
        Ok(self.get(url, query)?.text()?)
    }

    fn download(&self, url: &str, dest: &Path) -> Result<u64, ExtractorError> {
        let mut response = self.get(url, &[])?;
        let mut file = File::create(dest)?;
        Ok(response.copy_to(&mut file)?)
    }
}

/// In-memory [`Fetcher`] serving canned bodies
///
/// Keys are the URL followed by `?k=v&...` when query parameters are given.
/// Unknown keys answer HTTP 404.
///
/// # Examples
///
/// ```
/// use peribahasa_extractor::{Fetcher, MemoryFetcher};
///
/// let fetcher = MemoryFetcher::new();
/// fetcher.insert("http://api/search?q=air", r#"{"results": []}"#);
///
/// assert!(fetcher.get_text("http://api/search", &[("q", "air")]).is_ok());
/// assert!(fetcher.get_text("http://api/search", &[("q", "api")]).is_err());
/// assert_eq!(fetcher.requests(), vec!["http://api/search?q=air", "http://api/search?q=api"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    bodies: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MemoryFetcher {
    /// Create an empty fetcher
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `key`
    pub fn insert(&self, key: impl Into<String>, body: impl Into<Vec<u8>>) {
        self.bodies.lock().unwrap().insert(key.into(), body.into());
    }

    /// Keys requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn lookup(&self, url: &str, query: &[(&str, &str)]) -> Result<Vec<u8>, ExtractorError> {
        let key = if query.is_empty() {
            url.to_string()
        } else {
            let pairs: Vec<String> = query.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            format!("{}?{}", url, pairs.join("&"))
        };
        self.requests.lock().unwrap().push(key.clone());
        self.bodies
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .ok_or(ExtractorError::Status { url: key, status: 404 })
    }
}

impl Fetcher for MemoryFetcher {
    fn get_text(&self, url: &str, query: &[(&str, &str)]) -> Result<String, ExtractorError> {
        let body = self.lookup(url, query)?;
        String::from_utf8(body).map_err(|e| ExtractorError::Http(e.to_string()))
    }

    fn download(&self, url: &str, dest: &Path) -> Result<u64, ExtractorError> {
        let body = self.lookup(url, &[])?;
        std::fs::write(dest, &body)?;
        Ok(body.len() as u64)
    }
}
