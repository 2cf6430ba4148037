//! Import command implementation.

use crate::cli::ImportArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use peribahasa_domain::Source;
use peribahasa_extractor::{
    ApiExtractor, ExtractorConfig, Fetcher, HtmlExtractor, HttpFetcher, IngestOptions,
    IngestPipeline, PdfExtractor, SourceExtractor,
};
use peribahasa_store::SqliteStore;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Resolve the `--source` argument; `all` selects every source in drain order.
pub fn select_sources(tag: &str) -> Result<Vec<Source>> {
    if tag.trim().eq_ignore_ascii_case("all") {
        return Ok(Source::ALL.to_vec());
    }
    let source = tag.parse::<Source>().map_err(CliError::InvalidValue)?;
    Ok(vec![source])
}

/// Execute the import command.
pub fn execute_import(
    args: ImportArgs,
    config: &ExtractorConfig,
    db_path: &Path,
    formatter: &Formatter,
) -> Result<()> {
    let sources = select_sources(&args.source)?;
    let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new(config.fetch_timeout(), &config.user_agent)?);
    let extractors = build_extractors(config, &sources, fetcher)?;
    let mut store = SqliteStore::open(db_path)?;

    info!(sources = sources.len(), preview = args.preview, "starting import");
    let report = IngestPipeline::new(&mut store, IngestOptions { preview: args.preview })
        .run_all(&extractors)?;

    println!("{}", formatter.format_ingest(&report, args.preview)?);
    if report.source_errors() > 0 {
        println!(
            "{}",
            formatter.warning(&format!("{} item(s) could not be read from their source", report.source_errors()))
        );
    }
    if args.preview {
        println!("{}", formatter.info(&format!("Preview: {} entries would be imported", report.would_import())));
    } else {
        println!("{}", formatter.success(&format!("Imported {} entries", report.imported())));
    }
    Ok(())
}

/// Build one extractor per source.
///
/// Fails before any fetch when a selected source has no URL configured or
/// the PDF converter is missing.
pub(crate) fn build_extractors(
    config: &ExtractorConfig,
    sources: &[Source],
    fetcher: Arc<dyn Fetcher>,
) -> Result<Vec<Box<dyn SourceExtractor>>> {
    let mut extractors: Vec<Box<dyn SourceExtractor>> = Vec::with_capacity(sources.len());
    for &source in sources {
        let url = config.url_for(source).map_err(CliError::InvalidValue)?;
        let extractor: Box<dyn SourceExtractor> = match source {
            Source::ApiDictionary => Box::new(ApiExtractor::new(
                Arc::clone(&fetcher),
                url,
                config.request_interval(),
            )),
            Source::PdfCollection => {
                let pdf = PdfExtractor::new(Arc::clone(&fetcher), url, config.pdftotext.as_str());
                pdf.check_tool()?;
                Box::new(pdf)
            }
            Source::HtmlArticleA | Source::HtmlArticleB => {
                Box::new(HtmlExtractor::new(source, Arc::clone(&fetcher), url))
            }
        };
        extractors.push(extractor);
    }
    Ok(extractors)
}
