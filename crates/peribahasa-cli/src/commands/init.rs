//! Init command implementation.

use crate::error::Result;
use crate::output::Formatter;
use peribahasa_store::SqliteStore;
use std::path::Path;
use tracing::info;

/// Execute the init command.
///
/// Creates the database file and schema. Running it on an existing corpus
/// only adds missing review columns.
pub fn execute_init(db_path: &Path, formatter: &Formatter) -> Result<()> {
    let existed = db_path.is_file();
    let store = SqliteStore::create(db_path)?;
    let total = store.count(None)?;
    info!(path = %db_path.display(), existed, total, "database ready");

    if existed {
        println!(
            "{}",
            formatter.info(&format!("Database {} already exists ({} entries)", db_path.display(), total))
        );
    } else {
        println!("{}", formatter.success(&format!("Created {}", db_path.display())));
    }
    Ok(())
}
