//! End-to-end tests of the command layer against a database file.

use peribahasa_cli::cli::{ImportArgs, ReviewArgs, StatsArgs};
use peribahasa_cli::commands;
use peribahasa_cli::config::OutputFormat;
use peribahasa_cli::{CliError, Config, Formatter};
use peribahasa_domain::traits::ProverbStore;
use peribahasa_domain::{NewEntry, Source};
use peribahasa_store::SqliteStore;

fn formatter() -> Formatter {
    Formatter::new(OutputFormat::Json, false)
}

#[test]
fn test_commands_require_database() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.db");

    let err = commands::execute_review(
        ReviewArgs { source: None, preview: true, batch_size: None },
        &Config::default(),
        &missing,
        &formatter(),
    )
    .unwrap_err();
    assert!(matches!(err, CliError::MissingDatabase(_)));
    assert_eq!(err.exit_code(), 5);
    assert!(!missing.exists());
}

#[test]
fn test_import_without_urls_fails_before_opening_database() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.db");

    let err = commands::execute_import(
        ImportArgs { source: "html-article-b".into(), preview: false },
        &Config::default().extractor,
        &missing,
        &formatter(),
    )
    .unwrap_err();
    assert_eq!(err.exit_code(), 22);
}

#[test]
fn test_init_then_stats_and_preview_review() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("corpus.db");
    commands::execute_init(&db, &formatter()).unwrap();

    {
        let mut store = SqliteStore::open(&db).unwrap();
        store
            .insert(&NewEntry::new("Hujan emas di negeri orang", "Sebaik-baik negeri orang", Source::PdfCollection).unwrap())
            .unwrap();
    }

    let store = SqliteStore::open(&db).unwrap();
    commands::execute_stats(StatsArgs { source: Some("pdf-collection".into()) }, &store, &formatter()).unwrap();
    drop(store);

    let mut config = Config::default();
    config.reviewer.inter_batch_delay_ms = 0;
    commands::execute_review(
        ReviewArgs { source: None, preview: true, batch_size: Some(5) },
        &config,
        &db,
        &formatter(),
    )
    .unwrap();

    let store = SqliteStore::open(&db).unwrap();
    assert_eq!(store.count_unreviewed(None).unwrap(), 1);
}
