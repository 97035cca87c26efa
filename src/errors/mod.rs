//! Error handling utilities for the daybook application.
//!
//! This module provides the central error type `AppError` which represents all
//! possible error conditions that might occur in the application, as well as the
//! convenience type alias `AppResult` for functions that can return these errors.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Represents specific error cases that can occur when interacting with external editors.
///
/// This enum provides detailed, contextual error information for different failure modes
/// when launching or interacting with external text editors. Each variant captures
/// relevant information such as the editor command and underlying IO errors.
///
/// # Examples
///
/// ```
/// use daybook::errors::EditorError;
///
/// let error = EditorError::NonZeroExit {
///     command: "vim".to_string(),
///     status_code: 1,
/// };
///
/// assert!(format!("{}", error).contains("non-zero status code"));
/// assert!(format!("{}", error).contains("vim"));
/// ```
#[derive(Debug, Error)]
pub enum EditorError {
    /// Error when the specified editor command cannot be found.
    #[error("Editor command '{command}' not found: {source}. Please check that the editor is installed and available in your PATH.")]
    CommandNotFound {
        /// The editor command that was not found
        command: String,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Error when permission is denied to execute the editor command.
    #[error("Permission denied when trying to execute editor '{command}': {source}. Please check file permissions or try running with appropriate access rights.")]
    PermissionDenied {
        /// The editor command that had permission denied
        command: String,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Error when the editor command fails to execute due to other I/O errors.
    #[error("Failed to execute editor '{command}': {source}. Please check system resources, disk space, or editor installation.")]
    ExecutionFailed {
        /// The editor command that failed to execute
        command: String,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Error when the editor exits with a non-zero status code.
    #[error("Editor '{command}' exited with non-zero status code: {status_code}. The entry was not saved.")]
    NonZeroExit {
        /// The editor command that exited with a non-zero status
        command: String,
        /// The exit status code
        status_code: i32,
    },
}

/// Represents errors that can occur when attempting to lock the encrypted store.
///
/// A session holds an exclusive advisory lock on the store for its whole
/// lifetime, so a second concurrent invocation fails fast instead of racing
/// on the ciphertext.
///
/// # Examples
///
/// ```
/// use daybook::errors::LockError;
/// use std::path::PathBuf;
///
/// let error = LockError::FileBusy {
///     path: PathBuf::from("/path/to/daybook.age"),
/// };
///
/// assert!(format!("{}", error).contains("another process"));
/// ```
#[derive(Debug, Error)]
pub enum LockError {
    /// Error when the store is already locked by another process.
    #[error("Journal store is currently open in another process: {path}. Please wait for the other session to close or check for existing daybook processes.")]
    FileBusy {
        /// The path to the store that is locked
        path: PathBuf,
    },

    /// Error when acquiring the lock fails for a technical reason.
    #[error("Failed to acquire lock for journal store {path}: {source}. Please check file permissions and ensure the directory is accessible.")]
    AcquisitionFailed {
        /// The path to the store that couldn't be locked
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Represents specific error cases that can occur during cryptographic operations.
///
/// This enum provides detailed, contextual error information for different failure modes
/// when sealing or opening the encrypted store.
///
/// # Examples
///
/// ```
/// use daybook::errors::CryptoError;
///
/// let error = CryptoError::EmptyPassphrase;
/// assert!(format!("{}", error).contains("empty"));
/// ```
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Passphrase must not be empty.
    #[error("Passphrase cannot be empty.")]
    EmptyPassphrase,

    /// Passphrase confirmation did not match during journal creation.
    #[error("Passphrases don't match. The journal was not created.")]
    PassphraseMismatch,

    /// Reading the passphrase from the terminal failed.
    #[error("Failed to read passphrase: {0}")]
    PassphrasePrompt(String),

    /// Incorrect passphrase provided for decryption.
    #[error("Incorrect passphrase. Please try again with the passphrase used to encrypt your journal.")]
    InvalidPassphrase(#[source] age::DecryptError),

    /// Encrypted data uses an unsupported encryption format.
    #[error("Unsupported encryption format. The store was not sealed with a passphrase.")]
    UnsupportedFormat,

    /// Error during encryption operation.
    #[error("Encryption failed: {0}")]
    EncryptionFailed(#[source] age::EncryptError),

    /// Error during decryption operation (truncated or corrupt ciphertext).
    #[error("Decryption failed: {0}")]
    DecryptionFailed(#[source] age::DecryptError),
}

/// Represents specific error cases that can occur during storage operations.
///
/// This enum provides detailed, contextual error information for different failure modes
/// when interacting with the transient plaintext database.
///
/// # Examples
///
/// ```
/// use daybook::errors::StorageError;
///
/// let error = StorageError::NotFound("No entry for 2024-01-01".to_string());
/// assert!(format!("{}", error).contains("not found"));
/// ```
#[derive(Debug, Error)]
pub enum StorageError {
    /// SQLite database error.
    #[error("Database error: {0}\n\nIf you're seeing 'file is not a database', the decrypted store may be corrupt or was not created with `daybook init`.")]
    Sqlite(#[from] rusqlite::Error),

    /// Requested entry not found in the journal.
    #[error("Entry not found: {0}")]
    NotFound(String),

    /// Custom storage error with detailed message.
    #[error("Storage error: {0}")]
    Custom(String),
}

/// Represents all possible errors that can occur in the daybook application.
///
/// This enum is the central error type used across the application, with variants
/// for different error categories. It uses `thiserror` for deriving the `Error` trait
/// implementation and formatted error messages.
///
/// Note: This type does not implement `Clone` to avoid losing error context when
/// cloning `std::io::Error` values.
///
/// # Examples
///
/// Converting from an IO error:
/// ```
/// use daybook::errors::AppError;
/// use std::io::{self, ErrorKind};
///
/// let io_error = io::Error::new(ErrorKind::NotFound, "file not found");
/// let app_error: AppError = io_error.into();
///
/// match app_error {
///     AppError::Io(inner) => assert_eq!(inner.kind(), ErrorKind::NotFound),
///     _ => panic!("Expected Io variant"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Errors related to configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input/output errors from filesystem operations.
    ///
    /// This variant automatically converts from `std::io::Error` through the `From` trait.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors in journal logic (e.g., invalid date formats, session misuse).
    #[error("Journal error: {0}")]
    Journal(String),

    /// Errors when interacting with the text editor.
    #[error("Editor error: {0}")]
    Editor(#[from] EditorError),

    /// Errors related to store locking.
    #[error("Locking error: {0}")]
    Lock(#[from] LockError),

    /// Errors related to cryptographic operations.
    #[error("Cryptographic error: {0}")]
    Crypto(#[from] CryptoError),

    /// Errors related to database operations on the transient plaintext.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// A type alias for `Result<T, AppError>` to simplify function signatures.
///
/// # Examples
///
/// ```
/// use daybook::errors::{AppResult, AppError};
///
/// fn might_fail() -> AppResult<String> {
///     if false {
///         return Err(AppError::Journal("Something went wrong".to_string()));
///     }
///     Ok("Operation succeeded".to_string())
/// }
/// ```
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_app_error_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let app_error: AppError = io_error.into();

        match app_error {
            AppError::Io(inner) => {
                assert_eq!(inner.kind(), io::ErrorKind::NotFound);
            }
            _ => panic!("Expected AppError::Io variant"),
        }
    }

    #[test]
    fn test_app_error_from_crypto_error() {
        let app_error: AppError = CryptoError::EmptyPassphrase.into();
        match app_error {
            AppError::Crypto(CryptoError::EmptyPassphrase) => {}
            _ => panic!("Expected AppError::Crypto variant"),
        }
    }

    #[test]
    fn test_app_error_from_storage_error() {
        let app_error: AppError = StorageError::NotFound("entry".to_string()).into();
        assert!(format!("{}", app_error).contains("not found"));
    }

    #[test]
    fn test_lock_error_messages() {
        let busy = LockError::FileBusy {
            path: PathBuf::from("/tmp/daybook.age"),
        };
        assert!(format!("{}", busy).contains("another process"));

        let failed = LockError::AcquisitionFailed {
            path: PathBuf::from("/tmp/daybook.age"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        };
        assert!(format!("{}", failed).contains("Failed to acquire lock"));
    }

    #[test]
    fn test_editor_error_messages() {
        let error = EditorError::NonZeroExit {
            command: "vim".to_string(),
            status_code: 2,
        };
        let message = format!("{}", error);
        assert!(message.contains("vim"));
        assert!(message.contains("2"));
    }
}
