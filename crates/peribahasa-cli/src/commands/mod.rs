//! Command implementations.

mod import;
mod init;
mod review;
mod serve;
mod stats;

pub use import::{execute_import, select_sources};
pub use init::execute_init;
pub use review::execute_review;
pub use serve::{execute_serve, html_escape, render_html, render_plain};
pub use stats::execute_stats;

use crate::error::{CliError, Result};
use peribahasa_domain::Source;

/// Parse an optional source filter, rejecting unknown tags.
pub fn parse_source_filter(source: Option<&str>) -> Result<Option<Source>> {
    source
        .map(|tag| tag.parse::<Source>().map_err(CliError::InvalidValue))
        .transpose()
}
