//! Create a new empty encrypted journal.

use crate::config::Config;
use crate::crypto::{envelope, passphrase, temp};
use crate::db::Database;
use crate::errors::{AppError, AppResult};
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::fs;
use tracing::info;

/// Ensures the directory holding the store exists with owner-only permissions.
fn ensure_store_directory_exists(config: &Config) -> AppResult<()> {
    let Some(dir) = config.store_path.parent() else {
        return Ok(());
    };
    if dir.as_os_str().is_empty() || dir.exists() {
        return Ok(());
    }

    fs::create_dir_all(dir)?;
    #[cfg(unix)]
    fs::set_permissions(dir, fs::Permissions::from_mode(0o700))?;
    Ok(())
}

/// Creates a fresh, empty, sealed journal store.
///
/// Builds an empty database in the secure temp directory, seals it to the
/// configured store path, and scrubs the plaintext. Refuses to overwrite an
/// existing store.
///
/// # Errors
///
/// Returns `AppError::Journal` if the store already exists, plus any
/// passphrase, crypto, or storage errors from the steps involved.
pub fn run(config: &Config) -> AppResult<()> {
    if config.store_path.exists() {
        return Err(AppError::Journal(format!(
            "Store {} already exists.",
            config.store_path.display()
        )));
    }

    ensure_store_directory_exists(config)?;

    let passphrase = passphrase::resolve(false)?;

    let plaintext_path = temp::transient_path("db")?;
    let _guard = temp::ScrubGuard::new(plaintext_path.clone());

    let db = Database::create(&plaintext_path)?;
    drop(db);

    envelope::seal_file(&plaintext_path, &config.store_path, &passphrase)?;

    info!(store_path = ?config.store_path, "Journal created");
    println!("Journal created successfully at {}", config.store_path.display());
    Ok(())
}
