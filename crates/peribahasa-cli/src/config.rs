//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use peribahasa_extractor::ExtractorConfig;
use peribahasa_llm::LlmConfig;
use peribahasa_reviewer::ReviewerConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
///
/// ```toml
/// [database]
/// path = "peribahasa.db"
///
/// [extractor]
/// html_a_url = "https://..."
///
/// [llm]
/// model = "claude-3-5-haiku-latest"
///
/// [reviewer]
/// batch_size = 10
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Database location
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Source extractor settings
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// LLM provider settings
    #[serde(default)]
    pub llm: LlmConfig,

    /// Review workflow settings
    #[serde(default)]
    pub reviewer: ReviewerConfig,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// Database settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("peribahasa.db"),
        }
    }
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

impl Config {
    /// Get the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".peribahasa").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one the default path is used if
    /// present, otherwise the built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Ok(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| CliError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Check every section, reporting bad values as invalid.
    pub fn validate(&self) -> Result<()> {
        let sections = [
            ("extractor", self.extractor.validate()),
            ("llm", self.llm.validate()),
            ("reviewer", self.reviewer.validate()),
        ];
        for (name, result) in sections {
            result.map_err(|e| CliError::InvalidValue(format!("[{}] {}", name, e)))?;
        }
        Ok(())
    }
}
