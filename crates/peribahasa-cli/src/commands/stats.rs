//! Stats command implementation.

use crate::cli::StatsArgs;
use crate::commands::parse_source_filter;
use crate::error::Result;
use crate::output::{CorpusStats, Formatter};
use peribahasa_domain::traits::ProverbStore;
use peribahasa_store::SqliteStore;

/// Execute the stats command.
pub fn execute_stats(args: StatsArgs, store: &SqliteStore, formatter: &Formatter) -> Result<()> {
    let source = parse_source_filter(args.source.as_deref())?;
    let stats = collect_stats(store, source)?;
    println!("{}", formatter.format_stats(&stats)?);
    Ok(())
}

fn collect_stats(store: &SqliteStore, source: Option<peribahasa_domain::Source>) -> Result<CorpusStats> {
    Ok(CorpusStats {
        source,
        total: store.count(source)?,
        counts: store.review_counts(source)?,
    })
}
