//! Passphrase resolution from environment or interactive prompt.
//!
//! Passphrases are held as `SecretString` so the memory is zeroized on drop.
//! For non-interactive use (scripts, tests) the `DAYBOOK_PASSPHRASE`
//! environment variable bypasses prompting.

use crate::errors::{AppResult, CryptoError};
use age::secrecy::SecretString;
use tracing::debug;

/// Environment variable that supplies the passphrase non-interactively.
pub const PASSPHRASE_ENV: &str = "DAYBOOK_PASSPHRASE";

/// Prompts for a new passphrase with confirmation.
///
/// Used by `daybook init` when creating an encrypted journal.
///
/// # Errors
///
/// Returns `CryptoError::PassphraseMismatch` if the confirmation doesn't match,
/// `CryptoError::EmptyPassphrase` for an empty passphrase, or
/// `CryptoError::PassphrasePrompt` if stdin reading fails.
fn prompt_for_new_passphrase() -> AppResult<SecretString> {
    debug!("Prompting for new passphrase");

    println!("Creating a new encrypted journal.");
    println!("Choose a strong passphrase to protect your entries.");

    let passphrase = rpassword::prompt_password("Enter passphrase: ")
        .map_err(|e| CryptoError::PassphrasePrompt(e.to_string()))?;

    let confirmation = rpassword::prompt_password("Confirm passphrase: ")
        .map_err(|e| CryptoError::PassphrasePrompt(e.to_string()))?;

    if passphrase != confirmation {
        return Err(CryptoError::PassphraseMismatch.into());
    }

    if passphrase.is_empty() {
        return Err(CryptoError::EmptyPassphrase.into());
    }

    Ok(SecretString::new(passphrase))
}

/// Prompts for the passphrase of an existing journal.
fn prompt_for_existing_passphrase() -> AppResult<SecretString> {
    debug!("Prompting for existing passphrase");

    let passphrase = rpassword::prompt_password("Enter passphrase: ")
        .map_err(|e| CryptoError::PassphrasePrompt(e.to_string()))?;

    if passphrase.is_empty() {
        return Err(CryptoError::EmptyPassphrase.into());
    }

    Ok(SecretString::new(passphrase))
}

/// Resolves the passphrase for this invocation.
///
/// Checks `DAYBOOK_PASSPHRASE` first so scripts and tests can run without a
/// terminal. Otherwise prompts: once for an existing store, twice (with
/// confirmation) when creating a new one.
///
/// # Errors
///
/// Returns `CryptoError::EmptyPassphrase` if the resolved passphrase is empty,
/// plus the prompt errors described on the helpers above.
pub fn resolve(store_exists: bool) -> AppResult<SecretString> {
    if let Ok(passphrase) = std::env::var(PASSPHRASE_ENV) {
        debug!("Using passphrase from {}", PASSPHRASE_ENV);
        if passphrase.is_empty() {
            return Err(CryptoError::EmptyPassphrase.into());
        }
        return Ok(SecretString::new(passphrase));
    }

    if store_exists {
        prompt_for_existing_passphrase()
    } else {
        prompt_for_new_passphrase()
    }
}
