//! Peribahasa CLI - Command-line interface for the peribahasa corpus manager.
//!
//! Provides commands to create the corpus database, import entries from the
//! configured sources, proofread them with an LLM, serve one entry at a time
//! and report statistics.

#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
