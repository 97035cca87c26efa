//! Editor bridge between an entry's text and an external editing process.
//!
//! This module provides an abstraction for editing a text buffer in an
//! external editor, allowing the application to work with different editors
//! and to be testable by mocking the editor functionality. The buffer is a
//! real temporary file handed to the subprocess by path; the editor blocks
//! until it exits, and the file is read back and scrubbed afterwards.

use crate::crypto::temp;
use crate::errors::{AppResult, EditorError};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;
use std::process::Command;
use tracing::{debug, warn};

/// Trait defining the interface for the editor bridge.
///
/// # Examples
///
/// ```
/// use daybook::editor::Editor;
/// use daybook::errors::AppResult;
///
/// struct UppercaseEditor;
///
/// impl Editor for UppercaseEditor {
///     fn edit_text(&self, initial_text: &str) -> AppResult<String> {
///         Ok(initial_text.to_uppercase())
///     }
/// }
///
/// let edited = UppercaseEditor.edit_text("hello").unwrap();
/// assert_eq!(edited, "HELLO");
/// ```
pub trait Editor {
    /// Presents `initial_text` to the user for editing and returns the
    /// edited result.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Editor` if the editing process cannot be launched
    /// or exits unsuccessfully. On failure the caller's original text is
    /// untouched and no database mutation should occur.
    fn edit_text(&self, initial_text: &str) -> AppResult<String>;
}

/// An implementation of the Editor trait that launches an external process.
///
/// The initial text is written to an owner-only temporary buffer in the
/// secure temp directory, the configured editor command is invoked with the
/// buffer path as its single argument, and the buffer is read back once the
/// editor exits with status zero.
pub struct SystemEditor {
    /// The command to use for editing (e.g., "vim", "nano").
    pub editor_cmd: String,
}

impl SystemEditor {
    fn classify_spawn_error(&self, source: io::Error) -> EditorError {
        match source.kind() {
            io::ErrorKind::NotFound => EditorError::CommandNotFound {
                command: self.editor_cmd.clone(),
                source,
            },
            io::ErrorKind::PermissionDenied => EditorError::PermissionDenied {
                command: self.editor_cmd.clone(),
                source,
            },
            _ => EditorError::ExecutionFailed {
                command: self.editor_cmd.clone(),
                source,
            },
        }
    }

    fn write_buffer(&self, path: &Path, initial_text: &str) -> AppResult<()> {
        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        options.mode(0o600);
        let mut buffer = options.open(path)?;
        buffer.write_all(initial_text.as_bytes())?;
        buffer.flush()?;
        Ok(())
    }

    fn scrub_buffer(path: &Path) {
        if let Err(e) = temp::secure_delete(path) {
            warn!(?path, error = %e, "Failed to scrub editor buffer");
        }
    }
}

impl Editor for SystemEditor {
    fn edit_text(&self, initial_text: &str) -> AppResult<String> {
        let buffer_path = temp::transient_path("entry")?;
        self.write_buffer(&buffer_path, initial_text)?;

        debug!(command = %self.editor_cmd, "Launching editor");
        let status = Command::new(&self.editor_cmd)
            .arg(&buffer_path)
            .status()
            .map_err(|e| {
                let err = self.classify_spawn_error(e);
                Self::scrub_buffer(&buffer_path);
                err
            })?;

        if !status.success() {
            Self::scrub_buffer(&buffer_path);
            return Err(EditorError::NonZeroExit {
                command: self.editor_cmd.clone(),
                status_code: status.code().unwrap_or(-1),
            }
            .into());
        }

        let edited = fs::read_to_string(&buffer_path)?;
        Self::scrub_buffer(&buffer_path);
        Ok(edited)
    }
}
