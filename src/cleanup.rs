//! User cleanup operations.
//!
//! Deleting a user resolves UNIQUE constraint errors when a user's Firebase
//! UID changes: the old row (and, via `ON DELETE CASCADE`, their threads,
//! conversations, and messages) is removed so the account can re-register.
//!
//! The cascade itself is the database engine's job — this module only
//! counts the dependent rows beforehand so the operator knows what a
//! deletion will take with it. The reported cascade counts are those
//! pre-deletion counts, not a post-deletion re-check; if the schema's
//! cascade rules ever change, the report can diverge from what was
//! actually removed.

use rusqlite::{params, Connection};

use crate::error::{Error, Result};

/// A row from the `users` table.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub firebase_uid: String,
    pub email: String,
    pub display_name: Option<String>,
    pub role: String,
    pub last_seen: Option<String>,
}

/// Counts of rows that a user deletion will cascade to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelatedCounts {
    /// Threads the user created
    pub threads: i64,
    /// Conversations where the user is either participant
    pub conversations: i64,
    /// Messages the user sent
    pub messages: i64,
}

/// Look up a user by email. Returns `None` if no such user exists.
pub fn find_user(conn: &Connection, email: &str) -> Result<Option<UserRecord>> {
    let result = conn.query_row(
        "SELECT firebase_uid, email, display_name, role, last_seen
         FROM users WHERE email = ?",
        params![email],
        |row| {
            Ok(UserRecord {
                firebase_uid: row.get(0)?,
                email: row.get(1)?,
                display_name: row.get(2)?,
                role: row.get(3)?,
                last_seen: row.get(4)?,
            })
        },
    );

    match result {
        Ok(record) => Ok(Some(record)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::Database(format!("Failed to look up user: {}", e))),
    }
}

/// Count the rows that deleting this user will cascade to.
pub fn related_counts(conn: &Connection, firebase_uid: &str) -> Result<RelatedCounts> {
    let threads: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM threads WHERE created_by = ?",
            params![firebase_uid],
            |row| row.get(0),
        )
        .map_err(|e| Error::Database(format!("Failed to count threads: {}", e)))?;

    let conversations: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM conversations
             WHERE participant1_id = ? OR participant2_id = ?",
            params![firebase_uid, firebase_uid],
            |row| row.get(0),
        )
        .map_err(|e| Error::Database(format!("Failed to count conversations: {}", e)))?;

    let messages: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM messages WHERE sender_id = ?",
            params![firebase_uid],
            |row| row.get(0),
        )
        .map_err(|e| Error::Database(format!("Failed to count messages: {}", e)))?;

    Ok(RelatedCounts {
        threads,
        conversations,
        messages,
    })
}

/// Delete a user by email inside a transaction.
///
/// Returns the number of user rows removed (0 or 1). Dependent rows are
/// removed by the engine's cascade rules, not by this function. If the
/// transaction fails at any point it is rolled back on drop.
pub fn delete_user(conn: &mut Connection, email: &str) -> Result<usize> {
    let tx = conn
        .transaction()
        .map_err(|e| Error::Database(format!("Failed to begin transaction: {}", e)))?;

    let rows = tx
        .execute("DELETE FROM users WHERE email = ?", params![email])
        .map_err(|e| Error::Database(format!("Failed to delete user: {}", e)))?;

    tx.commit()
        .map_err(|e| Error::Database(format!("Failed to commit deletion: {}", e)))?;

    tracing::info!(email = email, rows = rows, "Deleted user");
    Ok(rows)
}

/// Get all users, ordered by email.
pub fn list_users(conn: &Connection) -> Result<Vec<UserRecord>> {
    let mut stmt = conn
        .prepare(
            "SELECT firebase_uid, email, display_name, role, last_seen
             FROM users ORDER BY email",
        )
        .map_err(|e| Error::Database(format!("Failed to prepare query: {}", e)))?;

    let rows = stmt
        .query_map([], |row| {
            Ok(UserRecord {
                firebase_uid: row.get(0)?,
                email: row.get(1)?,
                display_name: row.get(2)?,
                role: row.get(3)?,
                last_seen: row.get(4)?,
            })
        })
        .map_err(|e| Error::Database(format!("Failed to query users: {}", e)))?;

    let mut users = Vec::new();
    for row in rows {
        users.push(row.map_err(|e| Error::Database(format!("Failed to read user: {}", e)))?);
    }

    Ok(users)
}

/// Whether a confirmation response authorizes deletion.
///
/// Only the exact token `yes` confirms (case-insensitive, surrounding
/// whitespace ignored). Everything else — including "y", "yep", or an
/// empty line — cancels.
pub fn is_affirmative(response: &str) -> bool {
    response.trim().eq_ignore_ascii_case("yes")
}
