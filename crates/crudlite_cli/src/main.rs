//! CLI smoke check.
//!
//! # Responsibility
//! - Verify `crudlite_core` linkage and run one CRUD round trip against a
//!   real SQLite store.
//! - Keep output deterministic for quick local sanity checks.

use clap::Parser;
use crudlite_core::{
    core_version, default_log_level, init_logging, ColumnDef, ColumnType, Conditions, CrudStore,
    Database, Record, TableSchema,
};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

const SMOKE_TABLE: &str = "crudlite_smoke";

#[derive(Parser)]
#[command(name = "crudlite_cli")]
#[command(version, about = "Smoke check for the crudlite SQLite facade", long_about = None)]
struct Cli {
    /// Database identifier handed to SQLite (file path or `:memory:`)
    #[arg(long, default_value = ":memory:")]
    db: String,

    /// Absolute directory for rolling log files; logging stays off when unset
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error); only valid with --log-dir
    #[arg(long, requires = "log_dir")]
    log_level: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        let level = cli
            .log_level
            .clone()
            .unwrap_or_else(|| default_log_level().as_str().to_string());
        if let Err(err) = init_logging(&level, log_dir) {
            eprintln!("crudlite_cli logging error={err}");
            return ExitCode::FAILURE;
        }
    }

    println!("crudlite_core version={}", core_version());
    match run_smoke(&cli.db) {
        Ok(summary) => {
            println!("{summary}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("crudlite_cli smoke error={err}");
            ExitCode::FAILURE
        }
    }
}

fn run_smoke(identifier: &str) -> crudlite_core::DbResult<String> {
    let db = Database::open(identifier)?;
    let schema = TableSchema::new()
        .with_column(ColumnDef::new("id", ColumnType::Integer).primary_key())
        .column("label", ColumnType::Text);
    db.create_table(SMOKE_TABLE, &schema)?;

    // Leftovers from an earlier run against a file store.
    db.delete(SMOKE_TABLE, &Conditions::new().eq("id", 1))?;

    db.insert(SMOKE_TABLE, &Record::new().with("id", 1).with("label", "smoke"))?;
    let updated = db.update(
        SMOKE_TABLE,
        &Record::new().with("label", "smoke-updated"),
        &Conditions::new().eq("id", 1),
    )?;
    let rows = db.read(SMOKE_TABLE, Some(&Conditions::new().eq("id", 1)))?;
    let deleted = db.delete(SMOKE_TABLE, &Conditions::new().eq("id", 1))?;
    db.close()?;

    info!(
        "event=cli_smoke module=cli status=ok rows={} updated={updated} deleted={deleted}",
        rows.len()
    );
    Ok(format!(
        "crudlite_cli smoke rows={} updated={updated} deleted={deleted}",
        rows.len()
    ))
}
