//! Secure temporary file handling with tmpfs preference.
//!
//! The transient plaintext database must never outlive a session, so this
//! module prefers RAM-backed tmpfs filesystems when available and provides
//! overwrite-then-unlink deletion for the fallback case where the plaintext
//! landed on a real disk.

use crate::errors::AppResult;
use std::fs::{self, OpenOptions};
use std::io::Write;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// Temporary filesystem paths to check for RAM-based storage.
const TMPFS_PATHS: &[&str] = &["/dev/shm", "/run/shm"];

/// Get a secure temporary directory, preferring tmpfs when available.
///
/// On Linux/BSD systems this prefers RAM-based tmpfs filesystems (`/dev/shm`
/// or `/run/shm`), so decrypted content never touches persistent storage. If
/// tmpfs is not available it falls back to the system temp directory with a
/// warning.
///
/// The returned directory has restricted permissions (0o700 on Unix).
///
/// # Example
///
/// ```
/// use daybook::crypto::get_secure_temp_dir;
///
/// let temp_dir = get_secure_temp_dir()?;
/// assert!(temp_dir.is_dir());
/// # Ok::<(), daybook::errors::AppError>(())
/// ```
pub fn get_secure_temp_dir() -> AppResult<PathBuf> {
    let base = TMPFS_PATHS
        .iter()
        .map(Path::new)
        .find(|p| p.is_dir())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| {
            warn!("No tmpfs available; falling back to the system temp directory");
            std::env::temp_dir()
        });

    let dir = base.join("daybook");
    fs::create_dir_all(&dir)?;

    #[cfg(unix)]
    fs::set_permissions(&dir, fs::Permissions::from_mode(0o700))?;

    Ok(dir)
}

/// Generates a unique path for a transient plaintext file inside the secure
/// temp directory. The file itself is not created here.
pub fn transient_path(prefix: &str) -> AppResult<PathBuf> {
    let dir = get_secure_temp_dir()?;
    Ok(dir.join(format!("{}-{}", prefix, Uuid::new_v4())))
}

/// Best-effort secure file deletion (overwrite + remove).
///
/// Overwrites the file with zeros before removing it. This is not
/// cryptographically secure (SSD wear leveling, filesystem journals),
/// but better than direct deletion, and a no-op concern on tmpfs.
pub fn secure_delete(path: &Path) -> AppResult<()> {
    debug!(?path, "Scrubbing transient file");

    let len = fs::metadata(path)?.len();
    {
        let mut file = OpenOptions::new().write(true).open(path)?;
        let zeros = [0u8; 8192];
        let mut remaining = len;
        while remaining > 0 {
            let chunk = remaining.min(zeros.len() as u64) as usize;
            file.write_all(&zeros[..chunk])?;
            remaining -= chunk as u64;
        }
        file.sync_all()?;
    }
    fs::remove_file(path)?;
    Ok(())
}

/// Drop guard that scrubs a transient file unless disarmed.
///
/// Used by operations that materialize plaintext outside a `Session`, so an
/// early error return still removes the file.
pub struct ScrubGuard {
    path: PathBuf,
    armed: bool,
}

impl ScrubGuard {
    /// Registers `path` for scrubbing when the guard is dropped.
    pub fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    /// Disarms the guard so the file is kept.
    pub fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for ScrubGuard {
    fn drop(&mut self) {
        if self.armed && self.path.exists() {
            if let Err(e) = secure_delete(&self.path) {
                warn!(path = ?self.path, error = %e, "Failed to scrub transient file");
            }
        }
    }
}
