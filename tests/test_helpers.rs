#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

pub const TEST_PASSPHRASE: &str = "test-passphrase";

/// Creates a `Command` for the `diary` binary with a clean, non-interactive environment.
/// Additional environment variables or arguments can be configured by the caller.
pub fn base_diary_command() -> Command {
    let mut cmd = Command::cargo_bin("diary").expect("diary binary not built");
    configure_diary_command(&mut cmd);
    cmd
}

/// Applies the standard non-interactive environment to an existing `Command`.
pub fn configure_diary_command(cmd: &mut Command) {
    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
        cmd.env("PATH", path);
    }
    if let Ok(tmpdir) = std::env::var("TMPDIR") {
        cmd.env("TMPDIR", tmpdir);
    }
    cmd.env("DIARY_TEST_PASSPHRASE", TEST_PASSPHRASE);
}

/// Writes an executable shell script to `dir/name` and returns its path.
///
/// Used as a stand-in editor: the script receives the working copy path as `$1`.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("write script");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod script");
    path
}

/// Writes a `settings.yml` in `dir` and returns its path.
pub fn write_settings(dir: &Path, date_format: &str, editor_cmd: &str, encrypt: bool) -> PathBuf {
    let path = dir.join("settings.yml");
    fs::write(
        &path,
        format!(
            "DateFormat: \"{}\"\nEditorCmd: \"{}\"\nEncrypt: {}\n",
            date_format, editor_cmd, encrypt
        ),
    )
    .expect("write settings");
    path
}
