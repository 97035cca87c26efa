#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};

pub const TEST_PASSPHRASE: &str = "test-passphrase";

/// Creates a `Command` for the `daybook` binary with a clean, non-interactive
/// environment pointed at the given store. Additional environment variables
/// or arguments can be configured by the caller.
pub fn base_daybook_command(store: &Path) -> Command {
    let mut cmd = Command::cargo_bin("daybook").expect("daybook binary not built");
    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
        cmd.env("PATH", path);
    }
    if let Ok(tmpdir) = std::env::var("TMPDIR") {
        cmd.env("TMPDIR", tmpdir);
    }
    cmd.env("DAYBOOK_PASSPHRASE", TEST_PASSPHRASE);
    cmd.env("DAYBOOK_STORE", store);
    cmd
}

/// Writes an executable shell script to use as a fake editor. The script
/// receives the buffer path as `$1`.
pub fn write_editor_script(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("editor.sh");
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("write editor script");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .expect("make editor script executable");
    }

    path
}

/// Runs `daybook init` against the given store and asserts success.
pub fn init_store(store: &Path) {
    base_daybook_command(store).arg("init").assert().success();
}
