/*!
# Daybook

Daybook is an encrypted personal journal: a single passphrase-protected
store of dated free-text entries, edited with your own text editor. The
entire store is one age-encrypted SQLite file; plaintext only exists inside
a short-lived session and is scrubbed on every exit path.

## Core Features

- Create and edit dated journal entries with any external editor
- Whole-store symmetric encryption at rest (age, passphrase-based)
- Atomic re-seal: a crash never leaves a half-written store
- Guaranteed cleanup of the decrypted temporary database
- View and list past entries without rewriting the store

## Architecture

The codebase follows a modular architecture with clear separation of concerns:

- `cli`: Command-line interface handling using clap
- `config`: Configuration loading and validation
- `crypto`: Age envelope, passphrase handling, secure temp files
- `session`: The decrypt-edit-reencrypt-scrub lifecycle (the core)
- `db`: The entries table inside the transient plaintext database
- `editor`: Bridge to the external editor process
- `ops`: One function per CLI operation
- `errors`: Error handling infrastructure

## Usage Example

```rust,no_run
use daybook::{Config, ops};
use daybook::editor::SystemEditor;

fn main() -> daybook::AppResult<()> {
    let config = Config::load(None)?;
    let editor = SystemEditor { editor_cmd: config.editor.clone() };

    // Open today's entry for editing
    ops::edit::run(&config, &editor, None, ops::EditMode::Create)
}
```
*/

/// Command-line interface for parsing and handling user arguments
pub mod cli;
/// Configuration loading and management
pub mod config;
/// Encryption envelope, passphrase handling, and secure temp files
pub mod crypto;
/// Journal entry storage in the transient plaintext database
pub mod db;
/// Bridge to the external editor process
pub mod editor;
/// Error types and utilities for error handling
pub mod errors;
/// High-level journal operations
pub mod ops;
/// Session lifecycle for the encrypted store
pub mod session;

// Re-export important types for convenience
pub use cli::CliArgs;
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use session::Session;
