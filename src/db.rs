//! Database connection handling.
//!
//! Each tool invocation opens exactly one connection, works on it
//! synchronously, and closes it when the handle drops. SQLite ships with
//! foreign-key enforcement disabled per connection, so `open` switches it
//! on — the cleanup tool depends on `ON DELETE CASCADE` actually firing.

use rusqlite::Connection;

use crate::error::{Error, Result};

/// Default database file, next to the messaging service
pub const DEFAULT_DB_PATH: &str = "messaging.db";

/// Open the messaging database at `path`.
pub fn open(path: &str) -> Result<Connection> {
    let conn = Connection::open(path)
        .map_err(|e| Error::Database(format!("Failed to open database {}: {}", path, e)))?;

    conn.pragma_update(None, "foreign_keys", true)
        .map_err(|e| Error::Database(format!("Failed to enable foreign keys: {}", e)))?;

    tracing::debug!(path = path, "Opened messaging database");
    Ok(conn)
}

// ── Test fixtures ────────────────────────────────────────────────────────────

/// Minimal copy of the messaging service schema, with the cascading
/// foreign keys the cleanup tool relies on. The real schema is owned by
/// the service; this fixture only mirrors the tables the tools touch.
#[cfg(test)]
pub(crate) const FIXTURE_SCHEMA: &str = r#"
CREATE TABLE users (
    firebase_uid TEXT PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    display_name TEXT,
    role TEXT NOT NULL DEFAULT 'member',
    last_seen TEXT
);

CREATE TABLE threads (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    created_by TEXT NOT NULL,
    title TEXT,
    FOREIGN KEY (created_by) REFERENCES users(firebase_uid) ON DELETE CASCADE
);

CREATE TABLE conversations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    participant1_id TEXT NOT NULL,
    participant2_id TEXT NOT NULL,
    FOREIGN KEY (participant1_id) REFERENCES users(firebase_uid) ON DELETE CASCADE,
    FOREIGN KEY (participant2_id) REFERENCES users(firebase_uid) ON DELETE CASCADE
);

CREATE TABLE messages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    sender_id TEXT NOT NULL,
    body TEXT,
    FOREIGN KEY (sender_id) REFERENCES users(firebase_uid) ON DELETE CASCADE
);
"#;

/// In-memory database with the fixture schema and foreign keys enabled.
#[cfg(test)]
pub(crate) fn open_fixture() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.pragma_update(None, "foreign_keys", true).unwrap();
    conn.execute_batch(FIXTURE_SCHEMA).unwrap();
    conn
}
