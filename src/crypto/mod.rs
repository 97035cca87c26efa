//! Cryptographic operations for journal encryption.
//!
//! This module provides whole-file encryption, passphrase handling, and secure
//! temporary file handling for the daybook journaling system. It uses the age
//! encryption format with passphrase-based encryption for simplicity and security.
//!
//! # Module Structure
//!
//! - `envelope`: Seal/open operations on the encrypted store using the age crate
//! - `passphrase`: Passphrase resolution from environment or interactive prompt
//! - `temp`: Secure temporary file handling with tmpfs preference

pub mod envelope;
pub mod passphrase;
pub mod temp;

// Re-export commonly used functions
pub use self::envelope::{
    decrypt_with_passphrase, encrypt_with_passphrase, open_file, seal_file,
};
pub use self::temp::{get_secure_temp_dir, secure_delete};
