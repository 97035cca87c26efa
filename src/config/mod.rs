//! Configuration management for the daybook application.
//!
//! This module handles loading and validating configuration settings from environment
//! variables, with sensible defaults. It supports configuring the encrypted store
//! location and the editor command used to write journal entries.
//!
//! # Environment Variables
//!
//! - `DAYBOOK_STORE`: Path to the encrypted store file (defaults to ~/Documents/daybook.age)
//! - `DAYBOOK_EDITOR`: Editor to use for journal entries
//! - `EDITOR`: Fallback editor if DAYBOOK_EDITOR is not set (defaults to "vim")
//! - `HOME`: Used for expanding the default store path

use crate::errors::{AppError, AppResult};
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Configuration for the daybook application.
///
/// This struct holds the settings needed for one invocation: the editor command
/// used to write entries and the path of the encrypted store. It is built once
/// in `main` and passed explicitly into operations, so tests can construct their
/// own instances without touching process-wide state.
///
/// # Examples
///
/// Creating a configuration manually:
/// ```
/// use daybook::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     editor: "nano".to_string(),
///     store_path: PathBuf::from("/path/to/daybook.age"),
/// };
/// ```
pub struct Config {
    /// Editor command to use for writing journal entries.
    ///
    /// This is loaded from environment variables in the following order of precedence:
    /// 1. DAYBOOK_EDITOR
    /// 2. EDITOR
    /// 3. Defaults to "vim" if neither is set
    pub editor: String,

    /// Path of the encrypted store file.
    ///
    /// Resolved from the `--store` flag if given, else the DAYBOOK_STORE
    /// environment variable, with a fallback to ~/Documents/daybook.age.
    pub store_path: PathBuf,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("editor", &"[REDACTED_COMMAND]")
            .field("store_path", &"[REDACTED_PATH]")
            .finish()
    }
}

impl Config {
    /// Validates an editor command string for security.
    ///
    /// The editor command is handed to `std::process::Command` directly, so it
    /// must be a single executable name or path: not empty, no spaces, no shell
    /// metacharacters.
    fn validate_editor_command(editor_cmd: &str) -> AppResult<&str> {
        if editor_cmd.is_empty() {
            return Err(AppError::Config(
                "Editor command cannot be empty".to_string(),
            ));
        }

        if editor_cmd.contains(' ') {
            return Err(AppError::Config(
                "Editor command cannot contain spaces. Use a wrapper script or shell alias for editors requiring arguments".to_string(),
            ));
        }

        const FORBIDDEN_CHARS: &[char] =
            &['|', '&', ';', '$', '(', ')', '`', '\\', '<', '>', '\'', '"'];

        for &ch in FORBIDDEN_CHARS.iter() {
            if editor_cmd.contains(ch) {
                return Err(AppError::Config(format!(
                    "Editor command cannot contain shell metacharacters: '{}'. Use a wrapper script or shell alias instead",
                    ch
                )));
            }
        }

        Ok(editor_cmd)
    }

    /// Loads configuration from environment variables with sensible defaults.
    ///
    /// The store path precedence is `store_override` (the `--store` CLI flag),
    /// then `DAYBOOK_STORE`, then `~/Documents/daybook.age`. Paths are expanded
    /// with `shellexpand` so `~` and environment variable references work.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if:
    /// - The store path expansion fails or resolves to an empty path
    /// - The editor command fails validation (empty, contains spaces or shell metacharacters)
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use daybook::Config;
    ///
    /// match Config::load(None) {
    ///     Ok(config) => println!("Loaded config with editor: {}", config.editor),
    ///     Err(err) => eprintln!("Failed to load config: {}", err),
    /// }
    /// ```
    pub fn load(store_override: Option<&str>) -> AppResult<Self> {
        let editor_raw = env::var("DAYBOOK_EDITOR")
            .or_else(|_| env::var("EDITOR"))
            .unwrap_or_else(|_| "vim".to_string());

        let editor = Config::validate_editor_command(&editor_raw)?;

        let store_path_str = match store_override {
            Some(path) => path.to_string(),
            None => env::var("DAYBOOK_STORE").unwrap_or_else(|_| {
                let home = env::var("HOME").unwrap_or_else(|_| "".to_string());
                format!("{}/Documents/daybook.age", home)
            }),
        };

        let expanded_path = shellexpand::full(&store_path_str)
            .map_err(|e| AppError::Config(format!("Failed to expand store path: {}", e)))?;

        let store_path = PathBuf::from(expanded_path.into_owned());

        if store_path.as_os_str().is_empty() {
            return Err(AppError::Config("Store path is empty".to_string()));
        }

        Ok(Config {
            editor: editor.to_string(),
            store_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_editor_rejects_empty() {
        let result = Config::validate_editor_command("");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_editor_rejects_spaces() {
        let result = Config::validate_editor_command("vim -u NONE");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_editor_rejects_metacharacters() {
        for cmd in ["vim;rm", "vim|cat", "$(evil)", "vim`x`"] {
            assert!(
                Config::validate_editor_command(cmd).is_err(),
                "expected '{}' to be rejected",
                cmd
            );
        }
    }

    #[test]
    fn test_validate_editor_accepts_plain_commands() {
        assert!(Config::validate_editor_command("vim").is_ok());
        assert!(Config::validate_editor_command("/usr/bin/nano").is_ok());
        assert!(Config::validate_editor_command("code-wrapper.sh").is_ok());
    }

    #[test]
    #[serial_test::serial]
    fn test_store_override_takes_precedence() {
        env::set_var("DAYBOOK_EDITOR", "vim");
        let config = Config::load(Some("/tmp/override.age")).unwrap();
        assert_eq!(config.store_path, PathBuf::from("/tmp/override.age"));
        env::remove_var("DAYBOOK_EDITOR");
    }

    #[test]
    fn test_debug_redacts_fields() {
        let config = Config {
            editor: "vim".to_string(),
            store_path: PathBuf::from("/secret/location.age"),
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("/secret/location.age"));
        assert!(debug.contains("REDACTED"));
    }
}
