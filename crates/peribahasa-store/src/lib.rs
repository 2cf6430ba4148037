//! Peribahasa Storage Layer
//!
//! Implements the ProverbStore trait on SQLite.
//!
//! # Architecture
//!
//! - One `peribahasa` table shared with the serving/rotation component
//! - Parameterized statements only; values never reach SQL text
//! - Every write is a single auto-committed statement
//! - The `cek` column keeps the legacy `NULL` / `-1` / `[0, 1]` encoding;
//!   it is decoded into `ReviewStatus` at this boundary
//!
//! # Examples
//!
//! ```
//! use peribahasa_store::SqliteStore;
//! use peribahasa_domain::{NewEntry, Source};
//! use peribahasa_domain::traits::ProverbStore;
//!
//! let mut store = SqliteStore::in_memory().unwrap();
//! let entry = NewEntry::new("Bagai aur dengan tebing", "Saling membantu", Source::HtmlArticleA).unwrap();
//! store.insert(&entry).unwrap();
//! assert!(store.exists("Bagai aur dengan tebing").unwrap());
//! ```

#![warn(missing_docs)]

use peribahasa_domain::traits::ProverbStore;
use peribahasa_domain::{
    Confidence, EntryId, NewEntry, ProverbEntry, ReviewCounts, ReviewStatus, Source,
    NEEDS_REVIEW_THRESHOLD,
};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Database file does not exist
    #[error("Database file not found: {}", .0.display())]
    MissingDatabase(PathBuf),

    /// Entry not found
    #[error("Entry not found: {0}")]
    NotFound(EntryId),

    /// Proverb text already present
    #[error("Duplicate entry: {0}")]
    Duplicate(String),
}

/// Columns selected for every entry read, in `row_to_entry` order
const ENTRY_COLUMNS: &str =
    "id, peribahasa, artinya, dipakai, sumber, cek_peribahasa, cek_artinya, cek";

/// Review columns added to tables created by older tooling
const REVIEW_COLUMNS: [(&str, &str); 4] = [
    ("sumber", "TEXT"),
    ("cek_peribahasa", "TEXT"),
    ("cek_artinya", "TEXT"),
    ("cek", "REAL"),
];

/// SQLite-based implementation of ProverbStore
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should have its own SqliteStore instance.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open an existing database file
    ///
    /// The file must already exist; a missing file is a fatal precondition
    /// for every command, so it is reported instead of silently created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(StoreError::MissingDatabase(path.to_path_buf()));
        }
        Self::from_connection(Connection::open(path)?)
    }

    /// Open a database file, creating it if needed
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Create an in-memory database (useful for testing)
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        self.ensure_review_columns()?;
        Ok(())
    }

    /// Add review columns missing from tables created before review existed
    fn ensure_review_columns(&mut self) -> Result<(), StoreError> {
        let existing: Vec<String> = {
            let mut stmt = self.conn.prepare("SELECT name FROM pragma_table_info('peribahasa')")?;
            let names = stmt
                .query_map([], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()?;
            names
        };

        for (column, sql_type) in REVIEW_COLUMNS {
            if !existing.iter().any(|name| name == column) {
                info!(column, "Adding missing column to peribahasa table");
                // Identifiers cannot be bound as parameters; both come from REVIEW_COLUMNS.
                self.conn.execute(
                    &format!("ALTER TABLE peribahasa ADD COLUMN {} {}", column, sql_type),
                    [],
                )?;
            }
        }
        self.conn
            .execute("CREATE INDEX IF NOT EXISTS idx_peribahasa_cek ON peribahasa (cek)", [])?;
        Ok(())
    }

    /// Decode one row selected with `ENTRY_COLUMNS`
    fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<ProverbEntry> {
        let source: Option<String> = row.get(4)?;
        let cek: Option<f64> = row.get(7)?;
        Ok(ProverbEntry {
            id: EntryId::from_value(row.get(0)?),
            text: row.get(1)?,
            meaning: row.get(2)?,
            used: row.get::<_, i64>(3)? != 0,
            source: source.as_deref().and_then(Source::parse),
            reviewed_text: row.get(5)?,
            reviewed_meaning: row.get(6)?,
            review: ReviewStatus::from_stored(cek),
        })
    }

    fn source_tag(source: Option<Source>) -> Option<&'static str> {
        source.map(|s| s.as_str())
    }

    fn is_constraint_violation(error: &rusqlite::Error) -> bool {
        matches!(
            error,
            rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
        )
    }

    /// Get an entry by ID
    pub fn get(&self, id: EntryId) -> Result<Option<ProverbEntry>, StoreError> {
        let entry = self
            .conn
            .query_row(
                &format!("SELECT {} FROM peribahasa WHERE id = ?1", ENTRY_COLUMNS),
                params![id.value()],
                Self::row_to_entry,
            )
            .optional()?;
        Ok(entry)
    }

    /// Count all entries, optionally restricted to one source
    pub fn count(&self, source: Option<Source>) -> Result<usize, StoreError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM peribahasa WHERE (?1 IS NULL OR sumber = ?1)",
            params![Self::source_tag(source)],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Pick one random unused entry for display
    ///
    /// When `max_len` is given only entries whose proverb and meaning together
    /// are at most that many characters are candidates. When no candidate is
    /// unused, every entry is reset to unused first and the pick is retried.
    /// The returned entry is not marked; call [`SqliteStore::mark_used`] once
    /// it has been shown.
    pub fn pick_unused(&mut self, max_len: Option<usize>) -> Result<Option<ProverbEntry>, StoreError> {
        if let Some(entry) = self.random_unused(max_len)? {
            return Ok(Some(entry));
        }
        let reset = self.reset_usage()?;
        info!(reset, "All candidate entries used, rotation reset");
        self.random_unused(max_len)
    }

    fn random_unused(&self, max_len: Option<usize>) -> Result<Option<ProverbEntry>, StoreError> {
        let max_len = max_len.map(|n| n as i64);
        let entry = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM peribahasa
                     WHERE dipakai = 0
                       AND (?1 IS NULL OR length(peribahasa) + length(artinya) <= ?1)
                     ORDER BY RANDOM() LIMIT 1",
                    ENTRY_COLUMNS
                ),
                params![max_len],
                Self::row_to_entry,
            )
            .optional()?;
        Ok(entry)
    }

    /// Mark every entry as unused; returns the number of rows touched
    pub fn reset_usage(&mut self) -> Result<usize, StoreError> {
        Ok(self.conn.execute("UPDATE peribahasa SET dipakai = 0", [])?)
    }

    /// Mark an entry as shown
    pub fn mark_used(&mut self, id: EntryId) -> Result<(), StoreError> {
        let changed = self
            .conn
            .execute("UPDATE peribahasa SET dipakai = 1 WHERE id = ?1", params![id.value()])?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}

impl ProverbStore for SqliteStore {
    type Error = StoreError;

    fn exists(&self, text: &str) -> Result<bool, Self::Error> {
        let exists = self
            .conn
            .query_row(
                "SELECT 1 FROM peribahasa WHERE peribahasa = ?1",
                params![text],
                |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
        Ok(exists)
    }

    fn insert(&mut self, entry: &NewEntry) -> Result<EntryId, Self::Error> {
        if self.exists(entry.text())? {
            return Err(StoreError::Duplicate(entry.text().to_string()));
        }

        self.conn
            .execute(
                "INSERT INTO peribahasa (peribahasa, artinya, dipakai, sumber) VALUES (?1, ?2, 0, ?3)",
                params![entry.text(), entry.meaning(), entry.source().as_str()],
            )
            .map_err(|e| {
                if Self::is_constraint_violation(&e) {
                    StoreError::Duplicate(entry.text().to_string())
                } else {
                    StoreError::Database(e)
                }
            })?;

        let id = EntryId::from_value(self.conn.last_insert_rowid());
        debug!(%id, source = %entry.source(), "Inserted entry");
        Ok(id)
    }

    fn is_duplicate(error: &Self::Error) -> bool {
        matches!(error, StoreError::Duplicate(_))
    }

    fn count_unreviewed(&self, source: Option<Source>) -> Result<usize, Self::Error> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM peribahasa WHERE cek IS NULL AND (?1 IS NULL OR sumber = ?1)",
            params![Self::source_tag(source)],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    fn fetch_unreviewed_batch(
        &self,
        limit: usize,
        offset: usize,
        source: Option<Source>,
    ) -> Result<Vec<ProverbEntry>, Self::Error> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM peribahasa
             WHERE cek IS NULL AND (?1 IS NULL OR sumber = ?1)
             ORDER BY id
             LIMIT ?2 OFFSET ?3",
            ENTRY_COLUMNS
        ))?;

        let entries = stmt
            .query_map(
                params![Self::source_tag(source), limit as i64, offset as i64],
                Self::row_to_entry,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    fn apply_correction(
        &mut self,
        id: EntryId,
        reviewed_text: &str,
        reviewed_meaning: &str,
        confidence: Confidence,
    ) -> Result<(), Self::Error> {
        let changed = self.conn.execute(
            "UPDATE peribahasa SET cek_peribahasa = ?1, cek_artinya = ?2, cek = ?3 WHERE id = ?4",
            params![reviewed_text, reviewed_meaning, confidence.value(), id.value()],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    fn mark_review_failed(&mut self, id: EntryId) -> Result<(), Self::Error> {
        let changed = self.conn.execute(
            "UPDATE peribahasa SET cek = ?1 WHERE id = ?2",
            params![ReviewStatus::Failed.to_stored(), id.value()],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    fn review_counts(&self, source: Option<Source>) -> Result<ReviewCounts, Self::Error> {
        let counts = self.conn.query_row(
            "SELECT
                 COALESCE(SUM(CASE WHEN cek IS NULL THEN 1 ELSE 0 END), 0),
                 COALESCE(SUM(CASE WHEN cek >= 0 THEN 1 ELSE 0 END), 0),
                 COALESCE(SUM(CASE WHEN cek >= 0 AND cek < ?2 THEN 1 ELSE 0 END), 0),
                 COALESCE(SUM(CASE WHEN cek < 0 THEN 1 ELSE 0 END), 0)
             FROM peribahasa
             WHERE (?1 IS NULL OR sumber = ?1)",
            params![Self::source_tag(source), NEEDS_REVIEW_THRESHOLD],
            |row| {
                Ok(ReviewCounts {
                    unreviewed: row.get::<_, i64>(0)? as usize,
                    reviewed: row.get::<_, i64>(1)? as usize,
                    needs_review: row.get::<_, i64>(2)? as usize,
                    failed: row.get::<_, i64>(3)? as usize,
                })
            },
        )?;
        Ok(counts)
    }
}
