//! Entry lookup and upsert operations.
//!
//! The only mutation path is [`upsert_entry`]: insert a new row or replace
//! `content` and `modified` for an existing date, never touching `created`.

use crate::errors::{AppResult, StorageError};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, Row};
use tracing::debug;

/// Timestamp format stored in the `modified` column.
const MODIFIED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// One journal entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// Logical day of the entry; immutable once set.
    pub created: NaiveDate,
    /// Last save time; updated on every upsert.
    pub modified: NaiveDateTime,
    /// The journal text.
    pub text: String,
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<Entry> {
    let created: String = row.get(0)?;
    let modified: String = row.get(1)?;
    Ok(Entry {
        created: NaiveDate::parse_from_str(&created, "%Y-%m-%d").map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?,
        modified: NaiveDateTime::parse_from_str(&modified, MODIFIED_FORMAT).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
        })?,
        text: row.get(2)?,
    })
}

/// Inserts a new entry or updates the text of an existing one.
///
/// On conflict only `modified` and `content` change; `created` stays as it
/// was when the entry was first written.
///
/// # Errors
///
/// Returns `StorageError::Sqlite` if the statement fails.
pub fn upsert_entry(
    conn: &Connection,
    created: NaiveDate,
    modified: NaiveDateTime,
    text: &str,
) -> AppResult<()> {
    debug!(%created, "Upserting entry");

    conn.execute(
        r#"
        INSERT INTO entries (created, modified, content)
        VALUES (?1, ?2, ?3)
        ON CONFLICT(created) DO UPDATE SET
            modified = excluded.modified,
            content = excluded.content
        "#,
        params![
            created.to_string(),
            modified.format(MODIFIED_FORMAT).to_string(),
            text
        ],
    )
    .map_err(StorageError::Sqlite)?;

    Ok(())
}

/// Retrieves the entry for a given day, or `None` if there isn't one.
pub fn get_entry_for(conn: &Connection, date: NaiveDate) -> AppResult<Option<Entry>> {
    debug!(%date, "Looking up entry");

    let result = conn.query_row(
        "SELECT created, modified, content FROM entries WHERE created = ?1",
        params![date.to_string()],
        entry_from_row,
    );

    match result {
        Ok(entry) => Ok(Some(entry)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(StorageError::Sqlite(e).into()),
    }
}

/// Returns the date of the most recent entry, or `None` for an empty journal.
///
/// `edit` and `view` without an explicit date target this entry.
pub fn latest_entry_date(conn: &Connection) -> AppResult<Option<NaiveDate>> {
    let result = conn.query_row(
        "SELECT created FROM entries ORDER BY created DESC LIMIT 1",
        [],
        |row| row.get::<_, String>(0),
    );

    match result {
        Ok(created) => {
            let date = NaiveDate::parse_from_str(&created, "%Y-%m-%d")
                .map_err(|e| StorageError::Custom(format!("Invalid date in store: {}", e)))?;
            Ok(Some(date))
        }
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(StorageError::Sqlite(e).into()),
    }
}

/// Returns all entries ordered by `created` ascending.
pub fn list_entries(conn: &Connection) -> AppResult<Vec<Entry>> {
    let mut stmt = conn
        .prepare("SELECT created, modified, content FROM entries ORDER BY created ASC")
        .map_err(StorageError::Sqlite)?;

    let rows = stmt
        .query_map([], entry_from_row)
        .map_err(StorageError::Sqlite)?;

    let mut entries = Vec::new();
    for row in rows {
        entries.push(row.map_err(StorageError::Sqlite)?);
    }
    Ok(entries)
}
