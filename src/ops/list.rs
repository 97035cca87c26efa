//! Print all entries in chronological order.

use crate::config::Config;
use crate::crypto::passphrase;
use crate::db::{entries, Database};
use crate::errors::AppResult;
use crate::session::Session;

/// First line of an entry, truncated for the listing.
fn preview(text: &str) -> String {
    const MAX_PREVIEW: usize = 60;
    let first_line = text.lines().next().unwrap_or("");
    let mut preview: String = first_line.chars().take(MAX_PREVIEW).collect();
    if first_line.chars().count() > MAX_PREVIEW {
        preview.push_str("...");
    }
    preview
}

/// Lists all entries ordered by `created` ascending.
///
/// Runs a read-only session: the store is decrypted, read, and discarded
/// without ever being rewritten.
pub fn run(config: &Config) -> AppResult<()> {
    super::require_store(config)?;

    let passphrase = passphrase::resolve(true)?;
    let session = Session::open(&config.store_path, &passphrase)?;

    let all = {
        let db = Database::open(session.plaintext_path())?;
        entries::list_entries(db.conn())?
    };
    session.discard()?;

    if all.is_empty() {
        println!("No journal entries yet. Create one with `daybook new`.");
        return Ok(());
    }

    for entry in &all {
        println!(
            "{}  {}  {}",
            entry.created,
            entry.modified.format("%Y-%m-%dT%H:%M:%S"),
            preview(&entry.text)
        );
    }
    Ok(())
}
