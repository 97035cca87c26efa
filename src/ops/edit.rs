//! Create, edit, or view a journal entry through the editor bridge.

use crate::config::Config;
use crate::crypto::passphrase;
use crate::db::{entries, Database};
use crate::editor::Editor;
use crate::errors::{AppError, AppResult, StorageError};
use crate::session::Session;
use chrono::{Local, NaiveDate};
use tracing::{debug, info};

/// How the target date defaults and whether the store is rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    /// `daybook new`: default to today, create the entry if missing.
    Create,
    /// `daybook edit`: default to the latest entry, which must exist.
    Edit,
    /// `daybook view`: like `Edit` but read-only; the store is never rewritten.
    View,
}

/// Resolves the entry date this invocation targets.
fn resolve_target_date(
    db: &Database,
    requested: Option<NaiveDate>,
    mode: EditMode,
) -> AppResult<NaiveDate> {
    if let Some(date) = requested {
        return Ok(date);
    }
    match mode {
        EditMode::Create => Ok(Local::now().naive_local().date()),
        EditMode::Edit | EditMode::View => entries::latest_entry_date(db.conn())?.ok_or_else(|| {
            AppError::Journal(
                "No journal entries exist; create one with `daybook new` first.".to_string(),
            )
        }),
    }
}

/// Runs one interactive session against the store.
///
/// Opens the store, looks up the target entry, hands its text to the editor,
/// and either upserts the result and re-seals the store (`Create`/`Edit`) or
/// discards the session untouched (`View`).
///
/// # Errors
///
/// Any editor failure aborts before the database is mutated; the session's
/// drop guard scrubs the plaintext and the store stays byte-identical. A
/// failed re-seal preserves the plaintext for retry (see
/// [`Session::close`]).
pub fn run(
    config: &Config,
    editor: &dyn Editor,
    requested_date: Option<NaiveDate>,
    mode: EditMode,
) -> AppResult<()> {
    super::require_store(config)?;

    let passphrase = passphrase::resolve(true)?;
    let mut session = Session::open(&config.store_path, &passphrase)?;

    let db = Database::open(session.plaintext_path())?;
    let target_date = resolve_target_date(&db, requested_date, mode)?;
    let existing = entries::get_entry_for(db.conn(), target_date)?;
    debug!(%target_date, found = existing.is_some(), "Resolved target entry");

    if mode == EditMode::View {
        let entry = existing.ok_or_else(|| {
            StorageError::NotFound(format!("No entry for {}", target_date))
        })?;
        drop(db);
        // Edits made to the view buffer are deliberately thrown away
        editor.edit_text(&entry.text)?;
        return session.discard();
    }

    if existing.is_none() && mode == EditMode::Edit {
        return Err(StorageError::NotFound(format!("No entry for {}", target_date)).into());
    }

    let initial = existing.map(|e| e.text).unwrap_or_default();
    let edited = editor.edit_text(&initial)?;

    let modified = Local::now().naive_local();
    entries::upsert_entry(db.conn(), target_date, modified, &edited)?;
    drop(db);

    session.close(&passphrase)?;
    info!(%target_date, "Entry saved");
    Ok(())
}
