//! Migration: add `participant2_email` and `participant_type` columns to
//! the `conversations` table. Idempotent — safe to run multiple times.
//!
//! ```text
//! migrate-add-participant-fields [db_path]    # default: messaging.db
//! ```
//!
//! Exits 0 on success, 1 on failure.

use std::process::ExitCode;

use clap::Parser;

use messaging_admin::migrate::{self, ColumnStatus};
use messaging_admin::{db, Result};

#[derive(Parser, Debug)]
#[command(
    name = "migrate-add-participant-fields",
    version,
    about = "Add participant2_email and participant_type columns to conversations"
)]
struct Args {
    /// Path to the messaging database
    #[arg(default_value = db::DEFAULT_DB_PATH, env = "MESSAGING_DB")]
    db_path: String,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    println!("Migrating database: {}\n", args.db_path);

    match run(&args.db_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error during migration: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(db_path: &str) -> Result<()> {
    let mut conn = db::open(db_path)?;
    let report = migrate::run_migration(&mut conn)?;

    for (column, status) in &report.columns {
        match status {
            ColumnStatus::Added => println!("✓ {} column added", column),
            ColumnStatus::AlreadyExists => println!("✓ {} column already exists", column),
        }
    }
    println!("\nMigration completed successfully!");

    let stats = report.stats;
    println!("\nStatistics:");
    println!("  Total conversations: {}", stats.total);
    println!(
        "  Conversations with participant_type set: {}",
        stats.with_type
    );
    println!(
        "  Conversations needing type inference: {}",
        stats.needing_inference
    );

    Ok(())
}
