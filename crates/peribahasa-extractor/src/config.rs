//! Configuration for the source extractors

use peribahasa_domain::Source;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Smallest allowed delay between dictionary API requests
pub const MIN_REQUEST_INTERVAL_MS: u64 = 150;

/// Configuration for the source extractors
///
/// Source locations have no defaults; a source can only be imported once its
/// URL is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Dictionary API endpoint, queried as `{api_endpoint}?q={word}`
    pub api_endpoint: String,

    /// URL of the PDF proverb collection
    pub pdf_url: String,

    /// URL of the first HTML article
    pub html_a_url: String,

    /// URL of the second HTML article
    pub html_b_url: String,

    /// Minimum delay between dictionary API requests (milliseconds)
    pub request_interval_ms: u64,

    /// Timeout for page, API and document fetches (seconds)
    pub fetch_timeout_secs: u64,

    /// User agent sent with every request
    pub user_agent: String,

    /// PDF to text conversion program
    pub pdftotext: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            api_endpoint: String::new(),
            pdf_url: String::new(),
            html_a_url: String::new(),
            html_b_url: String::new(),
            request_interval_ms: 200,
            fetch_timeout_secs: 30,
            user_agent: concat!("peribahasa/", env!("CARGO_PKG_VERSION")).to_string(),
            pdftotext: "pdftotext".to_string(),
        }
    }
}

impl ExtractorConfig {
    /// Get the dictionary API pacing interval as a Duration
    pub fn request_interval(&self) -> Duration {
        Duration::from_millis(self.request_interval_ms)
    }

    /// Get the fetch timeout as a Duration
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    fn location(&self, source: Source) -> (&'static str, &str) {
        match source {
            Source::ApiDictionary => ("api_endpoint", &self.api_endpoint),
            Source::PdfCollection => ("pdf_url", &self.pdf_url),
            Source::HtmlArticleA => ("html_a_url", &self.html_a_url),
            Source::HtmlArticleB => ("html_b_url", &self.html_b_url),
        }
    }

    /// Configured URL for a source
    pub fn url_for(&self, source: Source) -> Result<&str, String> {
        let (name, url) = self.location(source);
        if url.trim().is_empty() {
            return Err(format!("{} is not configured (needed for source '{}')", name, source));
        }
        Ok(url.trim())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        for source in Source::ALL {
            let (name, url) = self.location(source);
            let url = url.trim();
            if !url.is_empty() && !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(format!("{} must be an http(s) URL, got '{}'", name, url));
            }
        }
        if self.request_interval_ms < MIN_REQUEST_INTERVAL_MS {
            return Err(format!(
                "request_interval_ms must be at least {}",
                MIN_REQUEST_INTERVAL_MS
            ));
        }
        if self.fetch_timeout_secs == 0 {
            return Err("fetch_timeout_secs must be greater than 0".to_string());
        }
        if self.pdftotext.trim().is_empty() {
            return Err("pdftotext must not be empty".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExtractorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.request_interval(), Duration::from_millis(200));
        assert_eq!(config.fetch_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_interval_floor() {
        let mut config = ExtractorConfig::default();
        config.request_interval_ms = 149;
        assert!(config.validate().is_err());
        config.request_interval_ms = 150;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_http_url() {
        let mut config = ExtractorConfig::default();
        config.pdf_url = "file:///tmp/a.pdf".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_url_for_requires_configuration() {
        let mut config = ExtractorConfig::default();
        assert!(config.url_for(Source::HtmlArticleA).is_err());

        config.html_a_url = " https://example.org/peribahasa ".to_string();
        assert_eq!(config.url_for(Source::HtmlArticleA).unwrap(), "https://example.org/peribahasa");
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ExtractorConfig::default();
        let toml_str = config.to_toml().unwrap();
        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();

        assert_eq!(config.api_endpoint, parsed.api_endpoint);
        assert_eq!(config.request_interval_ms, parsed.request_interval_ms);
    }

    #[test]
    fn test_partial_toml() {
        let parsed = ExtractorConfig::from_toml("request_interval_ms = 500").unwrap();
        assert_eq!(parsed.request_interval_ms, 500);
        assert_eq!(parsed.fetch_timeout_secs, 30);
    }
}
