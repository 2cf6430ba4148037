//! Review command implementation.

use crate::cli::ReviewArgs;
use crate::commands::parse_source_filter;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use peribahasa_domain::traits::LlmProvider;
use peribahasa_domain::Pacer;
use peribahasa_llm::{AnthropicProvider, LlmError};
use peribahasa_reviewer::{CorrectionClient, ReviewOptions, ReviewReport, ReviewWorkflow};
use peribahasa_store::SqliteStore;
use std::fmt::Display;
use std::path::Path;
use tracing::info;

/// Stand-in provider for preview runs, which never send a request.
struct OfflineProvider;

impl LlmProvider for OfflineProvider {
    type Error = LlmError;

    fn generate(&self, _prompt: &str) -> std::result::Result<String, LlmError> {
        Err(LlmError::Other("preview runs do not call the LLM".to_string()))
    }
}

/// Resolve review options from arguments and configuration.
pub(crate) fn review_options(args: &ReviewArgs, config: &Config) -> Result<ReviewOptions> {
    let batch_size = args.batch_size.unwrap_or(config.reviewer.batch_size);
    if batch_size == 0 {
        return Err(CliError::InvalidValue("batch size must be greater than 0".into()));
    }
    Ok(ReviewOptions {
        batch_size,
        source: parse_source_filter(args.source.as_deref())?,
        preview: args.preview,
    })
}

/// Execute the review command.
pub fn execute_review(args: ReviewArgs, config: &Config, db_path: &Path, formatter: &Formatter) -> Result<()> {
    let options = review_options(&args, config)?;
    let mut store = SqliteStore::open(db_path)?;

    let report = if options.preview {
        let client = CorrectionClient::new(OfflineProvider, &config.reviewer);
        run_workflow(options, config, &mut store, &client)?
    } else {
        let provider = AnthropicProvider::from_env(config.llm.clone())?;
        info!(model = provider.model(), "using LLM provider");
        let client = CorrectionClient::new(provider, &config.reviewer);
        run_workflow(options, config, &mut store, &client)?
    };

    println!("{}", formatter.format_review(&report, options.preview)?);
    if report.failed_batches > 0 {
        println!(
            "{}",
            formatter.warning(&format!("{} batch(es) failed; their entries were marked failed", report.failed_batches))
        );
    }
    if report.counts.needs_review > 0 {
        println!(
            "{}",
            formatter.info(&format!("{} entries scored below the confidence threshold", report.counts.needs_review))
        );
    }
    Ok(())
}

fn run_workflow<L>(
    options: ReviewOptions,
    config: &Config,
    store: &mut SqliteStore,
    client: &CorrectionClient<L>,
) -> Result<ReviewReport>
where
    L: LlmProvider,
    L::Error: Display,
{
    let mut workflow = ReviewWorkflow::new(options, Pacer::system(config.reviewer.inter_batch_delay()))?;
    Ok(workflow.run(store, client)?)
}
