//! High-level journal operations dispatched from the CLI.
//!
//! Each operation runs one full session lifecycle: resolve the passphrase,
//! open the store, work against the transient plaintext, then re-seal or
//! discard.
//!
//! # Module Structure
//!
//! - `init`: Create a new empty encrypted journal
//! - `edit`: Create, edit, or view an entry through the editor bridge
//! - `list`: Print all entries in chronological order

pub mod edit;
pub mod init;
pub mod list;

pub use edit::EditMode;

use crate::config::Config;
use crate::errors::{AppError, AppResult};

/// Fails with a hint to run `daybook init` when the store doesn't exist yet.
fn require_store(config: &Config) -> AppResult<()> {
    if !config.store_path.is_file() {
        return Err(AppError::Journal(format!(
            "Journal store {} doesn't exist. Run `daybook init` to create one.",
            config.store_path.display()
        )));
    }
    Ok(())
}
