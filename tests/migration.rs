//! Integration tests against an on-disk database file, the way the tools
//! run in production.

use messaging_admin::{cleanup, db, migrate};

const SCHEMA: &str = r#"
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

fn create_db(dir: &tempfile::TempDir) -> String {
    let path = dir.path().join("messaging.db");
    let path = path.to_str().unwrap().to_string();
    let conn = db::open(&path).unwrap();
    conn.execute_batch(SCHEMA).unwrap();
    path
}

#[test]
fn migration_twice_on_same_file_is_a_noop() {
    let dir = tempfile::tempdir().unwrap();
    let path = create_db(&dir);

    // First run adds both columns
    {
        let mut conn = db::open(&path).unwrap();
        let report = migrate::run_migration(&mut conn).unwrap();
        assert!(report
            .columns
            .iter()
            .all(|(_, s)| *s == migrate::ColumnStatus::Added));
    }

    // Second run, fresh connection: both already present, no error
    {
        let mut conn = db::open(&path).unwrap();
        let report = migrate::run_migration(&mut conn).unwrap();
        assert!(report
            .columns
            .iter()
            .all(|(_, s)| *s == migrate::ColumnStatus::AlreadyExists));
    }
}

#[test]
fn migrated_columns_survive_reopen_and_accept_writes() {
    let dir = tempfile::tempdir().unwrap();
    let path = create_db(&dir);

    {
        let mut conn = db::open(&path).unwrap();
        migrate::run_migration(&mut conn).unwrap();
    }

    let conn = db::open(&path).unwrap();
    conn.execute_batch(
        "INSERT INTO users (firebase_uid, email) VALUES ('uid-1', 'a@example.com');
         INSERT INTO users (firebase_uid, email) VALUES ('uid-2', 'b@example.com');",
    )
    .unwrap();
    conn.execute(
        "INSERT INTO conversations (participant1_id, participant2_id, participant2_email, participant_type)
         VALUES ('uid-1', 'uid-2', 'b@example.com', 'external')",
        [],
    )
    .unwrap();

    let (email, ptype): (String, String) = conn
        .query_row(
            "SELECT participant2_email, participant_type FROM conversations",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(email, "b@example.com");
    assert_eq!(ptype, "external");
}

#[test]
fn cleanup_cascades_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let path = create_db(&dir);

    {
        let conn = db::open(&path).unwrap();
        conn.execute_batch(
            "INSERT INTO users (firebase_uid, email) VALUES ('uid-1', 'a@example.com');
             INSERT INTO users (firebase_uid, email) VALUES ('uid-2', 'b@example.com');
             INSERT INTO threads (created_by) VALUES ('uid-1');
             INSERT INTO conversations (participant1_id, participant2_id) VALUES ('uid-1', 'uid-2');
             INSERT INTO messages (sender_id) VALUES ('uid-1');",
        )
        .unwrap();
    }

    {
        let mut conn = db::open(&path).unwrap();
        let user = cleanup::find_user(&conn, "a@example.com").unwrap().unwrap();
        let counts = cleanup::related_counts(&conn, &user.firebase_uid).unwrap();
        assert_eq!(counts.threads, 1);
        assert_eq!(counts.conversations, 1);
        assert_eq!(counts.messages, 1);
        assert_eq!(cleanup::delete_user(&mut conn, "a@example.com").unwrap(), 1);
    }

    // Fresh connection sees the cascade's result
    let conn = db::open(&path).unwrap();
    let remaining: i64 = conn
        .query_row(
            "SELECT (SELECT COUNT(*) FROM threads)
                  + (SELECT COUNT(*) FROM conversations)
                  + (SELECT COUNT(*) FROM messages)",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(remaining, 0);
    assert!(cleanup::find_user(&conn, "a@example.com").unwrap().is_none());
    assert!(cleanup::find_user(&conn, "b@example.com").unwrap().is_some());
}
