//! Age encryption envelope for the journal store.
//!
//! This module seals and opens the whole database file as one opaque blob using
//! the age crate's scrypt passphrase recipient. Every seal generates a fresh
//! salt, so sealing identical plaintext twice yields different ciphertext and
//! no content equality leaks across edits.

use crate::errors::{AppResult, CryptoError};
use age::secrecy::{ExposeSecret, SecretString};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Write};
#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;
use tracing::debug;

/// Rejects empty passphrases before any cryptographic work starts.
fn check_passphrase(passphrase: &SecretString) -> AppResult<()> {
    if passphrase.expose_secret().is_empty() {
        return Err(CryptoError::EmptyPassphrase.into());
    }
    Ok(())
}

/// Maps an age decryption error onto the crypto taxonomy.
///
/// A failed scrypt unwrap means the passphrase is wrong; everything else is
/// corrupt or truncated ciphertext.
fn classify_decrypt_error(err: age::DecryptError) -> CryptoError {
    match err {
        age::DecryptError::DecryptionFailed => CryptoError::InvalidPassphrase(err),
        _ => CryptoError::DecryptionFailed(err),
    }
}

/// Encrypt data using age with a passphrase.
///
/// # Errors
///
/// Returns `CryptoError::EmptyPassphrase` if the passphrase is empty, or
/// `CryptoError::EncryptionFailed` if the age envelope cannot be written.
///
/// # Example
///
/// ```
/// use daybook::crypto::encrypt_with_passphrase;
/// use age::secrecy::SecretString;
///
/// let passphrase = SecretString::new("my-secret-passphrase".to_string());
/// let encrypted = encrypt_with_passphrase(b"Secret data", &passphrase)?;
/// assert_ne!(encrypted, b"Secret data".to_vec());
/// # Ok::<(), daybook::errors::AppError>(())
/// ```
pub fn encrypt_with_passphrase(plaintext: &[u8], passphrase: &SecretString) -> AppResult<Vec<u8>> {
    check_passphrase(passphrase)?;

    let encryptor = age::Encryptor::with_user_passphrase(passphrase.clone());
    let mut ciphertext = Vec::new();
    let mut writer = encryptor
        .wrap_output(&mut ciphertext)
        .map_err(CryptoError::EncryptionFailed)?;
    writer.write_all(plaintext)?;
    writer.finish()?;

    Ok(ciphertext)
}

/// Decrypt age-encrypted data with a passphrase.
///
/// # Errors
///
/// Returns `CryptoError::InvalidPassphrase` on a wrong passphrase,
/// `CryptoError::UnsupportedFormat` if the data was not sealed with a
/// passphrase, or `CryptoError::DecryptionFailed` on corrupt ciphertext.
///
/// # Example
///
/// ```
/// use daybook::crypto::{encrypt_with_passphrase, decrypt_with_passphrase};
/// use age::secrecy::SecretString;
///
/// let passphrase = SecretString::new("my-secret-passphrase".to_string());
/// let encrypted = encrypt_with_passphrase(b"Secret data", &passphrase)?;
/// let decrypted = decrypt_with_passphrase(&encrypted, &passphrase)?;
/// assert_eq!(decrypted, b"Secret data".to_vec());
/// # Ok::<(), daybook::errors::AppError>(())
/// ```
pub fn decrypt_with_passphrase(ciphertext: &[u8], passphrase: &SecretString) -> AppResult<Vec<u8>> {
    check_passphrase(passphrase)?;

    let decryptor = match age::Decryptor::new(ciphertext).map_err(classify_decrypt_error)? {
        age::Decryptor::Passphrase(d) => d,
        _ => return Err(CryptoError::UnsupportedFormat.into()),
    };

    let mut reader = decryptor
        .decrypt(passphrase, None)
        .map_err(classify_decrypt_error)?;
    let mut plaintext = Vec::new();
    reader.read_to_end(&mut plaintext)?;

    Ok(plaintext)
}

/// Seal a plaintext file into an age ciphertext file.
///
/// The output file is created (or truncated) and populated with streaming
/// encryption to avoid holding the whole database in memory. On any failure
/// the partially written output is removed, so a bad seal never leaves a
/// half-written ciphertext behind.
///
/// # Errors
///
/// Returns `CryptoError::EmptyPassphrase` for an empty passphrase,
/// `CryptoError::EncryptionFailed` on envelope errors, or `AppError::Io` when
/// the input cannot be read or the output cannot be written.
pub fn seal_file(
    plaintext_path: &Path,
    ciphertext_path: &Path,
    passphrase: &SecretString,
) -> AppResult<()> {
    check_passphrase(passphrase)?;
    debug!(?plaintext_path, ?ciphertext_path, "Sealing store");

    let result = (|| -> AppResult<()> {
        let mut input = BufReader::new(File::open(plaintext_path)?);
        let output = BufWriter::new(File::create(ciphertext_path)?);

        let encryptor = age::Encryptor::with_user_passphrase(passphrase.clone());
        let mut writer = encryptor
            .wrap_output(output)
            .map_err(CryptoError::EncryptionFailed)?;
        io::copy(&mut input, &mut writer)?;
        writer.finish()?.into_inner().map_err(|e| e.into_error())?;
        Ok(())
    })();

    if result.is_err() {
        let _ = fs::remove_file(ciphertext_path);
    }
    result
}

/// Open an age ciphertext file into a plaintext file.
///
/// The output target is created exclusively with owner-only permissions
/// (0o600 on Unix) and only populated on full success; on any failure the
/// partial output is removed so no fragment of plaintext survives a failed
/// decrypt.
///
/// # Errors
///
/// Returns `CryptoError::InvalidPassphrase` on a wrong passphrase,
/// `CryptoError::DecryptionFailed` on truncated or corrupt ciphertext, or
/// `AppError::Io` when the source is unreadable.
pub fn open_file(
    ciphertext_path: &Path,
    plaintext_path: &Path,
    passphrase: &SecretString,
) -> AppResult<()> {
    check_passphrase(passphrase)?;
    debug!(?ciphertext_path, ?plaintext_path, "Opening store");

    let result = (|| -> AppResult<()> {
        let input = BufReader::new(File::open(ciphertext_path)?);

        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        options.mode(0o600);
        let output = options.open(plaintext_path)?;

        let decryptor = match age::Decryptor::new(input).map_err(classify_decrypt_error)? {
            age::Decryptor::Passphrase(d) => d,
            _ => return Err(CryptoError::UnsupportedFormat.into()),
        };
        let mut reader = decryptor
            .decrypt(passphrase, None)
            .map_err(classify_decrypt_error)?;

        let mut writer = BufWriter::new(output);
        io::copy(&mut reader, &mut writer)?;
        writer.flush()?;
        Ok(())
    })();

    if result.is_err() {
        let _ = fs::remove_file(plaintext_path);
    }
    result
}
