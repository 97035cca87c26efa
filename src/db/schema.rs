//! Table definitions and schema initialization.
//!
//! The schema is deliberately stable: old encrypted stores must remain
//! readable by newer versions, so changes here need a migration story.

use crate::errors::{AppResult, StorageError};
use rusqlite::Connection;

/// Creates all tables if they don't exist.
///
/// `created` is an ISO date string and the entry's identity; the UNIQUE
/// constraint gives us both the upsert conflict target and an index for the
/// only lookups we do.
pub fn create_tables(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS entries (
            created  TEXT NOT NULL UNIQUE,
            modified TEXT NOT NULL,
            content  TEXT NOT NULL
        );
        "#,
    )
    .map_err(StorageError::Sqlite)?;
    Ok(())
}
