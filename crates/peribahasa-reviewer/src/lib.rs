//! Peribahasa Reviewer
//!
//! LLM-assisted proofreading of the corpus.
//!
//! # Overview
//!
//! The reviewer is responsible for:
//! - **Batching**: Paging unreviewed entries in id order
//! - **Correction requests**: One LLM call per batch, retried with linear backoff
//! - **Persistence**: Storing corrected text and a confidence score per entry
//! - **Failure marking**: Entries of a batch that cannot be reviewed are marked failed
//!
//! Entries with a confidence below 0.5 are flagged for a human; failed
//! entries are counted separately.
//!
//! # Usage
//!
//! ```no_run
//! use peribahasa_domain::Pacer;
//! use peribahasa_llm::{AnthropicProvider, LlmConfig};
//! use peribahasa_reviewer::{CorrectionClient, ReviewOptions, ReviewWorkflow, ReviewerConfig};
//! use peribahasa_store::SqliteStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = SqliteStore::open("peribahasa.db")?;
//! let config = ReviewerConfig::default();
//! let client = CorrectionClient::new(AnthropicProvider::from_env(LlmConfig::default())?, &config);
//!
//! let mut workflow = ReviewWorkflow::new(
//!     ReviewOptions::default(),
//!     Pacer::system(config.inter_batch_delay()),
//! )?;
//! let report = workflow.run(&mut store, &client)?;
//! println!("checked {} entries, {} need review", report.checked, report.counts.needs_review);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! [reviewer]
//! batch_size = 10
//! max_attempts = 3
//! backoff_step_secs = 2
//! inter_batch_delay_ms = 1000
//! ```

#![warn(missing_docs)]

mod client;
mod config;
mod error;
mod parser;
mod prompt;
mod workflow;

pub use client::{ClientOutcome, CorrectionClient};
pub use config::ReviewerConfig;
pub use error::ReviewError;
pub use parser::{parse_corrections, Correction};
pub use prompt::build_prompt;
pub use workflow::{ReviewOptions, ReviewReport, ReviewWorkflow};
