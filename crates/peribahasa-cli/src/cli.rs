//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Peribahasa - Build, proofread and serve a corpus of Malay proverbs.
#[derive(Debug, Parser)]
#[command(name = "peribahasa")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// SQLite database file (overrides the configuration)
    #[arg(long, global = true, env = "PERIBAHASA_DB")]
    pub db: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format for summaries
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create an empty corpus database
    Init,

    /// Import entries from the configured sources
    Import(ImportArgs),

    /// Proofread unreviewed entries with the LLM
    Review(ReviewArgs),

    /// Pick the next entry of the rotation and render it
    Serve(ServeArgs),

    /// Show corpus and review statistics
    Stats(StatsArgs),
}

/// Arguments for the import command.
#[derive(Debug, Parser)]
pub struct ImportArgs {
    /// Source to import: api-dictionary, pdf-collection, html-article-A,
    /// html-article-B or all
    #[arg(short, long, default_value = "all")]
    pub source: String,

    /// Count what would be imported without writing
    #[arg(long)]
    pub preview: bool,
}

/// Arguments for the review command.
#[derive(Debug, Parser)]
pub struct ReviewArgs {
    /// Only review entries from this source
    #[arg(short, long)]
    pub source: Option<String>,

    /// Walk the batches without calling the LLM or writing
    #[arg(long)]
    pub preview: bool,

    /// Entries per LLM request (overrides the configuration)
    #[arg(short, long)]
    pub batch_size: Option<usize>,
}

/// Arguments for the serve command.
#[derive(Debug, Parser)]
pub struct ServeArgs {
    /// Rendering of the selected entry
    #[arg(long, value_enum, default_value = "plain")]
    pub render: RenderArg,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Only pick entries whose proverb and meaning together are at most this many characters
    #[arg(long)]
    pub max_len: Option<usize>,
}

/// Arguments for the stats command.
#[derive(Debug, Parser)]
pub struct StatsArgs {
    /// Restrict statistics to one source
    #[arg(short, long)]
    pub source: Option<String>,
}

/// Entry rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RenderArg {
    /// Proverb and meaning on two lines
    Plain,
    /// HTML fragment
    Html,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_defaults_to_all_sources() {
        let cli = Cli::parse_from(["peribahasa", "import"]);
        match cli.command {
            Command::Import(args) => {
                assert_eq!(args.source, "all");
                assert!(!args.preview);
            }
            _ => panic!("Expected Import command"),
        }
    }

    #[test]
    fn test_review_flags() {
        let cli = Cli::parse_from([
            "peribahasa",
            "--db",
            "corpus.db",
            "review",
            "--source",
            "pdf-collection",
            "--batch-size",
            "5",
            "--preview",
        ]);
        assert_eq!(cli.db, Some(PathBuf::from("corpus.db")));
        match cli.command {
            Command::Review(args) => {
                assert_eq!(args.source.as_deref(), Some("pdf-collection"));
                assert_eq!(args.batch_size, Some(5));
                assert!(args.preview);
            }
            _ => panic!("Expected Review command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["peribahasa", "serve", "--render", "html", "-vv"]);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Command::Serve(ServeArgs { render: RenderArg::Html, .. })));
    }

    #[test]
    fn test_missing_subcommand_is_usage_error() {
        let err = Cli::try_parse_from(["peribahasa"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
