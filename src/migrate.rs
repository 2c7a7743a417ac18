//! Schema migration: add participant fields to `conversations`.
//!
//! Adds `participant2_email` and `participant_type` as nullable TEXT
//! columns if they are missing. Safe to run any number of times: the
//! current column set is inspected first and an `ALTER TABLE` is only
//! issued for a column that is absent.
//!
//! `participant_type` classifies the second participant of a conversation;
//! rows where it is still NULL after the migration need their type
//! inferred by the messaging service.

use rusqlite::Connection;

use crate::error::{Error, Result};

/// Table the migration targets
pub const TABLE: &str = "conversations";

/// Columns the migration adds, with their declarations
pub const NEW_COLUMNS: [(&str, &str); 2] = [
    ("participant2_email", "TEXT"),
    ("participant_type", "TEXT"),
];

/// What happened to one column during a migration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnStatus {
    Added,
    AlreadyExists,
}

/// Row-count statistics gathered after the migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationStats {
    /// Total rows in `conversations`
    pub total: i64,
    /// Rows that already have `participant_type` populated
    pub with_type: i64,
    /// Rows whose type still needs inference
    pub needing_inference: i64,
}

/// Full report of one migration run.
#[derive(Debug, Clone)]
pub struct MigrationReport {
    /// Per-column outcome, in the order of [`NEW_COLUMNS`]
    pub columns: Vec<(&'static str, ColumnStatus)>,
    pub stats: MigrationStats,
}

/// Names of the columns currently present on `table`.
pub fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({})", table))
        .map_err(|e| Error::Database(format!("Failed to inspect table {}: {}", table, e)))?;

    // Column 1 of table_info is the column name
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .map_err(|e| Error::Database(format!("Failed to read table info: {}", e)))?;

    let mut columns = Vec::new();
    for row in rows {
        columns.push(row.map_err(|e| Error::Database(format!("Failed to read column: {}", e)))?);
    }

    Ok(columns)
}

/// Run the migration: add each missing participant column, commit once,
/// then gather statistics.
pub fn run_migration(conn: &mut Connection) -> Result<MigrationReport> {
    let existing = table_columns(conn, TABLE)?;

    let tx = conn
        .transaction()
        .map_err(|e| Error::Database(format!("Failed to begin transaction: {}", e)))?;

    let mut columns = Vec::with_capacity(NEW_COLUMNS.len());
    for (name, decl) in NEW_COLUMNS {
        if existing.iter().any(|c| c == name) {
            columns.push((name, ColumnStatus::AlreadyExists));
            continue;
        }

        tx.execute_batch(&format!("ALTER TABLE {} ADD COLUMN {} {}", TABLE, name, decl))
            .map_err(|e| Error::Database(format!("Failed to add column {}: {}", name, e)))?;
        tracing::info!(table = TABLE, column = name, "Added column");
        columns.push((name, ColumnStatus::Added));
    }

    tx.commit()
        .map_err(|e| Error::Database(format!("Failed to commit migration: {}", e)))?;

    let stats = gather_stats(conn)?;
    Ok(MigrationReport { columns, stats })
}

fn gather_stats(conn: &Connection) -> Result<MigrationStats> {
    let total: i64 = conn
        .query_row("SELECT COUNT(*) FROM conversations", [], |row| row.get(0))
        .map_err(|e| Error::Database(format!("Failed to count conversations: {}", e)))?;

    let with_type: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM conversations WHERE participant_type IS NOT NULL",
            [],
            |row| row.get(0),
        )
        .map_err(|e| Error::Database(format!("Failed to count classified conversations: {}", e)))?;

    Ok(MigrationStats {
        total,
        with_type,
        needing_inference: total - with_type,
    })
}
