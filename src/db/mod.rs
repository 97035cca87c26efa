//! Database operations for journal entries.
//!
//! This module manages the single `entries` table inside the transient
//! plaintext SQLite database. The database file only ever exists inside an
//! open [`Session`](crate::session::Session); encryption of the file as a
//! whole is the session's job, not SQLite's.
//!
//! # Module Structure
//!
//! - `schema`: Table definitions and schema initialization
//! - `entries`: Entry lookup and upsert operations
//!
//! # Example
//!
//! ```no_run
//! use daybook::db::Database;
//! use std::path::Path;
//!
//! let db = Database::open(Path::new("/dev/shm/daybook/db-1234"))?;
//! let entries = daybook::db::entries::list_entries(db.conn())?;
//! # Ok::<(), daybook::errors::AppError>(())
//! ```

pub mod entries;
pub mod schema;

use crate::errors::{AppResult, StorageError};
use rusqlite::Connection;
use std::path::Path;
use tracing::debug;

/// Handle on the transient plaintext database.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens the database at the given plaintext path.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Sqlite` if the file cannot be opened or is not
    /// a SQLite database (e.g. a corrupt decrypt).
    pub fn open(path: &Path) -> AppResult<Self> {
        debug!(?path, "Opening transient database");
        let conn = Connection::open(path).map_err(StorageError::Sqlite)?;
        Ok(Database { conn })
    }

    /// Creates a fresh database at the given path and initializes the schema.
    ///
    /// Used by `daybook init` to build the empty journal before its first
    /// seal.
    pub fn create(path: &Path) -> AppResult<Self> {
        let db = Self::open(path)?;
        db.initialize_schema()?;
        Ok(db)
    }

    /// Initializes the schema. Idempotent and safe to call multiple times.
    pub fn initialize_schema(&self) -> AppResult<()> {
        schema::create_tables(&self.conn)?;
        debug!("Database schema initialized");
        Ok(())
    }

    /// Borrow the underlying connection for entry operations.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}
