//! Integration tests for the session lifecycle.
//!
//! These exercise the full decrypt-edit-reencrypt-scrub path across the
//! session, crypto, and db modules, including the cleanup guarantees the
//! session makes on abnormal exit.

use age::secrecy::SecretString;
use daybook::crypto::seal_file;
use daybook::db::{entries, Database};
use daybook::session::Session;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn passphrase(s: &str) -> SecretString {
    SecretString::new(s.to_string())
}

/// Seals a fresh empty journal database to `store.age` inside the temp dir.
fn seal_empty_journal(dir: &TempDir, pass: &SecretString) -> PathBuf {
    let plain = dir.path().join("fresh.db");
    let store = dir.path().join("store.age");
    let db = Database::create(&plain).expect("create database");
    drop(db);
    seal_file(&plain, &store, pass).expect("seal fresh journal");
    fs::remove_file(&plain).unwrap();
    store
}

#[test]
fn test_end_to_end_entry_roundtrip() {
    let pass = passphrase("abc123");
    let dir = TempDir::new().unwrap();
    let store = seal_empty_journal(&dir, &pass);

    let created = chrono::NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let modified = created.and_hms_opt(21, 15, 0).unwrap();

    // First session: write the entry and re-seal
    {
        let mut session = Session::open(&store, &pass).unwrap();
        let plaintext = session.plaintext_path().to_path_buf();
        {
            let db = Database::open(&plaintext).unwrap();
            entries::upsert_entry(db.conn(), created, modified, "hello").unwrap();
        }
        session.close(&pass).unwrap();
        assert!(!plaintext.exists(), "plaintext must be scrubbed after close");
    }

    // Second session: the entry survives the seal/open cycle
    {
        let session = Session::open(&store, &pass).unwrap();
        let db = Database::open(session.plaintext_path()).unwrap();
        let entry = entries::get_entry_for(db.conn(), created).unwrap().unwrap();
        assert_eq!(entry.text, "hello");
        assert_eq!(entry.created, created);
        assert!(entry.created.and_hms_opt(0, 0, 0).unwrap() <= entry.modified);
        drop(db);
        session.discard().unwrap();
    }
}

#[test]
fn test_aborted_session_scrubs_and_preserves_store() {
    let pass = passphrase("abort-test");
    let dir = TempDir::new().unwrap();
    let store = seal_empty_journal(&dir, &pass);
    let before = fs::read(&store).unwrap();

    // Simulates an editor failure mid-session: the session is dropped
    // without close ever being attempted
    let plaintext = {
        let session = Session::open(&store, &pass).unwrap();
        let path = session.plaintext_path().to_path_buf();
        assert!(path.exists());
        path
    };

    assert!(!plaintext.exists(), "drop must scrub the transient plaintext");
    assert_eq!(
        fs::read(&store).unwrap(),
        before,
        "an aborted session must leave the store byte-identical"
    );
}

#[test]
fn test_close_is_atomic_no_staging_residue() {
    let pass = passphrase("atomic-test");
    let dir = TempDir::new().unwrap();
    let store = seal_empty_journal(&dir, &pass);

    let mut session = Session::open(&store, &pass).unwrap();
    session.close(&pass).unwrap();

    // Neither the staging sibling nor the lock file may remain
    let residue: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .filter(|name| name != "store.age")
        .collect();
    assert!(residue.is_empty(), "unexpected residue: {:?}", residue);
}

#[test]
fn test_failed_close_then_retry() {
    let pass = passphrase("retry-test");
    let dir = TempDir::new().unwrap();
    let store = seal_empty_journal(&dir, &pass);

    let created = chrono::NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
    let modified = created.and_hms_opt(9, 0, 0).unwrap();

    let mut session = Session::open(&store, &pass).unwrap();
    let plaintext = session.plaintext_path().to_path_buf();
    {
        let db = Database::open(&plaintext).unwrap();
        entries::upsert_entry(db.conn(), created, modified, "precious edits").unwrap();
    }

    // An empty passphrase makes the re-seal fail deterministically
    assert!(session.close(&passphrase("")).is_err());
    assert!(
        plaintext.exists(),
        "a failed close must preserve the user's edits"
    );

    // Retrying with the real passphrase completes the session
    session.close(&pass).unwrap();
    assert!(!plaintext.exists());

    let reopened = Session::open(&store, &pass).unwrap();
    let db = Database::open(reopened.plaintext_path()).unwrap();
    let entry = entries::get_entry_for(db.conn(), created).unwrap().unwrap();
    assert_eq!(entry.text, "precious edits");
    drop(db);
    reopened.discard().unwrap();
}

#[test]
fn test_second_session_rejected_while_first_open() {
    let pass = passphrase("lock-test");
    let dir = TempDir::new().unwrap();
    let store = seal_empty_journal(&dir, &pass);

    let first = Session::open(&store, &pass).unwrap();
    assert!(Session::open(&store, &pass).is_err());
    first.discard().unwrap();

    // Lock released: a fresh session succeeds
    let next = Session::open(&store, &pass).unwrap();
    next.discard().unwrap();
}

#[test]
fn test_missing_store_fails_cleanly() {
    let pass = passphrase("missing-test");
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("does-not-exist.age");

    assert!(Session::open(&store, &pass).is_err());
    // No lock file may linger after the failed open
    assert!(!dir.path().join("does-not-exist.age.lock").exists());
}
