//! # Messaging Admin Tools
//!
//! Administrative utilities for the messaging database. Two independent
//! command-line tools share this library:
//!
//! - `clean-user`: delete a user by email, relying on `ON DELETE CASCADE`
//!   foreign keys to remove their threads, conversations, and messages.
//!   Also lists all users.
//! - `migrate-add-participant-fields`: idempotently add the
//!   `participant2_email` and `participant_type` columns to the
//!   `conversations` table.
//!
//! The database schema is owned by the messaging service itself — these
//! tools only read it, delete from it, and extend it. There is no
//! abstraction layer over SQLite here: each module issues its parameterized
//! statements directly against the connection.

pub mod cleanup;
pub mod db;
pub mod error;
pub mod migrate;

pub use error::{Error, Result};
