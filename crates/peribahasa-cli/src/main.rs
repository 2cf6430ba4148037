//! Peribahasa CLI - Command-line interface for the peribahasa corpus manager.

use clap::Parser;
use peribahasa_cli::commands;
use peribahasa_cli::config::OutputFormat;
use peribahasa_cli::{Cli, Command, Config, Formatter};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Until configuration is loaded, errors print with the defaults
    let mut formatter = Formatter::new(OutputFormat::Table, !cli.no_color);
    match run(cli, &mut formatter) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", formatter.error(&e.to_string()));
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = if verbose > 0 {
        EnvFilter::new(default)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn run(cli: Cli, formatter: &mut Formatter) -> peribahasa_cli::Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    let format = cli.format.map(Into::into).unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    *formatter = Formatter::new(format, color_enabled);

    let db_path = cli.db.unwrap_or_else(|| config.database.path.clone());

    match cli.command {
        Command::Init => commands::execute_init(&db_path, formatter),
        Command::Import(args) => commands::execute_import(args, &config.extractor, &db_path, formatter),
        Command::Review(args) => commands::execute_review(args, &config, &db_path, formatter),
        Command::Serve(args) => {
            let mut store = peribahasa_store::SqliteStore::open(&db_path)?;
            commands::execute_serve(args, &mut store, formatter)
        }
        Command::Stats(args) => {
            let store = peribahasa_store::SqliteStore::open(&db_path)?;
            commands::execute_stats(args, &store, formatter)
        }
    }
}
