//! Serve command implementation.

use crate::cli::{RenderArg, ServeArgs};
use crate::error::Result;
use crate::output::Formatter;
use chrono::{DateTime, SecondsFormat, Utc};
use peribahasa_domain::ProverbEntry;
use peribahasa_store::SqliteStore;
use std::fs;
use tracing::info;

/// Execute the serve command.
///
/// Picks an unused entry (resetting the rotation when every candidate has
/// been shown), renders it and marks it used.
pub fn execute_serve(args: ServeArgs, store: &mut SqliteStore, formatter: &Formatter) -> Result<()> {
    let Some(entry) = store.pick_unused(args.max_len)? else {
        eprintln!("{}", formatter.warning("No entry matches the length limit"));
        return Ok(());
    };

    let rendered = match args.render {
        RenderArg::Plain => render_plain(&entry),
        RenderArg::Html => render_html(&entry, Utc::now()),
    };

    match &args.output {
        Some(path) => {
            fs::write(path, &rendered)?;
            eprintln!("{}", formatter.success(&format!("Wrote entry {} to {}", entry.id, path.display())));
        }
        None => print!("{}", rendered),
    }

    store.mark_used(entry.id)?;
    info!(id = %entry.id, "entry served");
    Ok(())
}

/// Proverb and meaning on two lines.
pub fn render_plain(entry: &ProverbEntry) -> String {
    format!("{}\n{}\n", entry.text, entry.meaning)
}

/// HTML fragment with a generation timestamp.
pub fn render_html(entry: &ProverbEntry, generated: DateTime<Utc>) -> String {
    format!(
        "<!-- generated {} -->\n<div class=\"peribahasa\">\n  <p class=\"teks\">{}</p>\n  <p class=\"artinya\">{}</p>\n</div>\n",
        generated.to_rfc3339_opts(SecondsFormat::Secs, true),
        html_escape(&entry.text),
        html_escape(&entry.meaning),
    )
}

/// Escape text for HTML element content and attribute values.
pub fn html_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
