//! Session lifecycle for the encrypted store.
//!
//! A `Session` owns the only window in which plaintext exists on disk. It
//! moves through `Closed -> Decrypting -> Open -> Encrypting -> Closed`, with
//! every error path collapsing back to `Closed` through forced cleanup:
//!
//! - `open` takes an exclusive lock on the store, then decrypts it into a
//!   fresh owner-only temporary file.
//! - While open, the transient plaintext is handed to the storage layer and
//!   the editor bridge; no encryption activity happens in this state.
//! - `close` re-seals the plaintext over the store atomically (sibling temp
//!   file + rename) and then scrubs the plaintext.
//! - Dropping an open session scrubs the plaintext, so an editor crash or an
//!   early `?` return cannot leave decrypted data behind.
//!
//! The one deliberate exception: if `close` itself fails, the plaintext is
//! preserved and its path logged, so the user's edits survive for a retry
//! instead of being silently discarded.

use crate::crypto::{envelope, temp};
use crate::errors::{AppError, AppResult, LockError};
use age::secrecy::SecretString;
use fs2::FileExt;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Transient plaintext exists and is usable.
    Open,
    /// The store has been re-sealed (or the session discarded) and the
    /// plaintext scrubbed.
    Closed,
    /// A `close` attempt failed; the plaintext is intentionally kept so the
    /// user's edits are not lost.
    Preserved,
}

/// One decrypt-edit-reencrypt lifecycle over the encrypted store.
///
/// The session holds an exclusive advisory lock on the store for its whole
/// lifetime, so two concurrent invocations cannot race on the ciphertext.
///
/// # Example
///
/// ```no_run
/// use daybook::session::Session;
/// use age::secrecy::SecretString;
/// use std::path::Path;
///
/// let passphrase = SecretString::new("my-secret".to_string());
/// let mut session = Session::open(Path::new("daybook.age"), &passphrase)?;
/// // ... operate on session.plaintext_path() ...
/// session.close(&passphrase)?;
/// # Ok::<(), daybook::errors::AppError>(())
/// ```
pub struct Session {
    store_path: PathBuf,
    plaintext_path: PathBuf,
    lock_path: PathBuf,
    lock_file: Option<File>,
    state: State,
}

/// Builds the sibling path `<store>.lock`.
fn lock_path_for(store_path: &Path) -> PathBuf {
    let mut os: OsString = store_path.as_os_str().to_os_string();
    os.push(".lock");
    PathBuf::from(os)
}

/// Builds the sibling path `<store>.tmp` used for the atomic re-seal.
///
/// It must live in the same directory as the store so the final rename stays
/// on one filesystem.
fn staging_path_for(store_path: &Path) -> PathBuf {
    let mut os: OsString = store_path.as_os_str().to_os_string();
    os.push(".tmp");
    PathBuf::from(os)
}

/// Acquires an exclusive advisory lock on a sibling lock file.
fn acquire_lock(store_path: &Path, lock_path: &Path) -> AppResult<File> {
    let lock_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(lock_path)
        .map_err(|source| LockError::AcquisitionFailed {
            path: store_path.to_path_buf(),
            source,
        })?;

    lock_file.try_lock_exclusive().map_err(|e| {
        if e.kind() == fs2::lock_contended_error().kind() {
            LockError::FileBusy {
                path: store_path.to_path_buf(),
            }
        } else {
            LockError::AcquisitionFailed {
                path: store_path.to_path_buf(),
                source: e,
            }
        }
    })?;

    Ok(lock_file)
}

impl Session {
    /// Opens a session: locks the store and decrypts it into a fresh
    /// owner-only temporary file.
    ///
    /// # Errors
    ///
    /// Returns `LockError::FileBusy` if another session holds the store,
    /// `CryptoError::InvalidPassphrase` / `DecryptionFailed` if the
    /// passphrase is wrong or the store is corrupt, and `AppError::Io` if the
    /// store is missing or unreadable. On any failure no plaintext survives
    /// and the store is untouched.
    pub fn open(store_path: &Path, passphrase: &SecretString) -> AppResult<Self> {
        debug!(?store_path, "Opening session");

        let lock_path = lock_path_for(store_path);
        let lock_file = acquire_lock(store_path, &lock_path)?;

        let plaintext_path = temp::transient_path("db")?;
        if let Err(e) = envelope::open_file(store_path, &plaintext_path, passphrase) {
            // envelope::open_file already removed any partial plaintext
            drop(lock_file);
            let _ = fs::remove_file(&lock_path);
            return Err(e);
        }

        info!(?store_path, "Session open");
        Ok(Session {
            store_path: store_path.to_path_buf(),
            plaintext_path,
            lock_path,
            lock_file: Some(lock_file),
            state: State::Open,
        })
    }

    /// Path of the transient plaintext database.
    ///
    /// Valid only while the session is open; the file is gone once the
    /// session is closed or discarded.
    pub fn plaintext_path(&self) -> &Path {
        &self.plaintext_path
    }

    /// Whether the session is still open (plaintext present, close possible).
    pub fn is_open(&self) -> bool {
        matches!(self.state, State::Open | State::Preserved)
    }

    /// Re-seals the plaintext over the store, then scrubs the plaintext.
    ///
    /// The ciphertext is written to a sibling temp file and renamed over the
    /// store, so a crash mid-seal never leaves a half-written store. A
    /// session whose previous `close` failed may retry.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::EncryptionFailed` (or `EmptyPassphrase`) if the
    /// re-seal fails. In that case the transient plaintext is preserved so
    /// the caller can retry; its path is logged on drop. Scrub failures after
    /// a successful seal are logged and do not fail the close.
    pub fn close(&mut self, passphrase: &SecretString) -> AppResult<()> {
        if !self.is_open() {
            return Err(AppError::Journal(
                "Session is already closed".to_string(),
            ));
        }

        debug!(store_path = ?self.store_path, "Re-sealing store");
        let staging = staging_path_for(&self.store_path);

        if let Err(e) = envelope::seal_file(&self.plaintext_path, &staging, passphrase) {
            // seal_file removed the partial staging file; keep the plaintext
            // so the edits survive for a retry
            self.state = State::Preserved;
            return Err(e);
        }

        if let Err(e) = fs::rename(&staging, &self.store_path) {
            let _ = fs::remove_file(&staging);
            self.state = State::Preserved;
            return Err(e.into());
        }
        info!(store_path = ?self.store_path, "Store re-sealed");

        self.scrub_plaintext();
        self.release_lock();
        self.state = State::Closed;
        Ok(())
    }

    /// Scrubs the plaintext without writing the store (read-only sessions).
    ///
    /// The store is byte-identical to its pre-session state afterwards.
    pub fn discard(mut self) -> AppResult<()> {
        if !self.is_open() {
            return Ok(());
        }
        debug!(store_path = ?self.store_path, "Discarding session");
        self.scrub_plaintext();
        self.release_lock();
        self.state = State::Closed;
        Ok(())
    }

    fn scrub_plaintext(&self) {
        if let Err(e) = temp::secure_delete(&self.plaintext_path) {
            // Never mask the caller's error with a cleanup failure
            warn!(
                path = ?self.plaintext_path,
                error = %e,
                "Failed to scrub transient plaintext"
            );
        }
    }

    fn release_lock(&mut self) {
        if self.lock_file.take().is_some() {
            let _ = fs::remove_file(&self.lock_path);
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        match self.state {
            State::Open => {
                self.scrub_plaintext();
                self.release_lock();
            }
            State::Preserved => {
                warn!(
                    path = ?self.plaintext_path,
                    "Re-encryption failed; transient plaintext preserved so your edits are not lost. \
                     Re-run the command to retry, then delete the file."
                );
                self.release_lock();
            }
            State::Closed => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::envelope;
    use std::fs;
    use tempfile::TempDir;

    fn test_passphrase() -> SecretString {
        SecretString::new("session-unit-test".to_string())
    }

    fn make_store(dir: &TempDir, contents: &[u8]) -> PathBuf {
        let store = dir.path().join("store.age");
        let plain = dir.path().join("plain.tmp");
        fs::write(&plain, contents).unwrap();
        envelope::seal_file(&plain, &store, &test_passphrase()).unwrap();
        fs::remove_file(&plain).unwrap();
        store
    }

    #[test]
    fn test_open_close_lifecycle() {
        let dir = TempDir::new().unwrap();
        let store = make_store(&dir, b"payload");

        let mut session = Session::open(&store, &test_passphrase()).unwrap();
        assert!(session.is_open());
        let plaintext = session.plaintext_path().to_path_buf();
        assert_eq!(fs::read(&plaintext).unwrap(), b"payload");

        session.close(&test_passphrase()).unwrap();
        assert!(!session.is_open());
        assert!(!plaintext.exists());
    }

    #[test]
    fn test_drop_scrubs_plaintext() {
        let dir = TempDir::new().unwrap();
        let store = make_store(&dir, b"payload");
        let before = fs::read(&store).unwrap();

        let plaintext = {
            let session = Session::open(&store, &test_passphrase()).unwrap();
            session.plaintext_path().to_path_buf()
        };
        assert!(!plaintext.exists());
        // Abandoned session leaves the store untouched
        assert_eq!(fs::read(&store).unwrap(), before);
    }

    #[test]
    fn test_wrong_passphrase_leaves_nothing_behind() {
        let dir = TempDir::new().unwrap();
        let store = make_store(&dir, b"payload");
        let before = fs::read(&store).unwrap();

        let wrong = SecretString::new("not-the-passphrase".to_string());
        let result = Session::open(&store, &wrong);
        assert!(result.is_err());
        assert_eq!(fs::read(&store).unwrap(), before);

        // The lock must have been released for the next attempt
        let session = Session::open(&store, &test_passphrase()).unwrap();
        session.discard().unwrap();
    }

    #[test]
    fn test_concurrent_session_is_rejected() {
        let dir = TempDir::new().unwrap();
        let store = make_store(&dir, b"payload");

        let first = Session::open(&store, &test_passphrase()).unwrap();
        let second = Session::open(&store, &test_passphrase());
        assert!(matches!(
            second,
            Err(AppError::Lock(LockError::FileBusy { .. }))
        ));
        first.discard().unwrap();
    }

    #[test]
    fn test_failed_close_preserves_edits_and_allows_retry() {
        let dir = TempDir::new().unwrap();
        let store = make_store(&dir, b"payload");

        let mut session = Session::open(&store, &test_passphrase()).unwrap();
        let plaintext = session.plaintext_path().to_path_buf();
        fs::write(&plaintext, b"edited payload").unwrap();

        // Empty passphrase makes the seal fail deterministically
        let empty = SecretString::new(String::new());
        assert!(session.close(&empty).is_err());
        assert!(plaintext.exists(), "edits must survive a failed close");

        session.close(&test_passphrase()).unwrap();
        assert!(!plaintext.exists());

        // Reopen and verify the edit round-tripped
        let reopened = Session::open(&store, &test_passphrase()).unwrap();
        assert_eq!(fs::read(reopened.plaintext_path()).unwrap(), b"edited payload");
        reopened.discard().unwrap();
    }

    #[test]
    fn test_discard_leaves_store_byte_identical() {
        let dir = TempDir::new().unwrap();
        let store = make_store(&dir, b"payload");
        let before = fs::read(&store).unwrap();

        let session = Session::open(&store, &test_passphrase()).unwrap();
        let plaintext = session.plaintext_path().to_path_buf();
        fs::write(&plaintext, b"scratch edits").unwrap();
        session.discard().unwrap();

        assert!(!plaintext.exists());
        assert_eq!(fs::read(&store).unwrap(), before);
    }

    #[cfg(unix)]
    #[test]
    fn test_plaintext_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let store = make_store(&dir, b"payload");

        let session = Session::open(&store, &test_passphrase()).unwrap();
        let mode = fs::metadata(session.plaintext_path())
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
        session.discard().unwrap();
    }
}
