//! Tests for the real process runner
//!
//! These spawn real processes and are Unix only.

#![cfg(unix)]

use anyhow::Result;
use backup_hooks::backup::{InitiationSource, Username};
use backup_hooks::hooks::PostBackupScript;
use backup_hooks::process::{
    CommandLine, CommandRunner, RealCommandRunner, ScriptExecutionFailure,
};
use serial_test::serial;
use std::collections::BTreeMap;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

mod common;
use common::{capture_logs, sample_backup};

const LABEL: &str = "Test Script";

fn write_script(dir: &Path, name: &str, body: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n"))?;
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
    Ok(path)
}

#[test]
#[serial]
fn test_zero_exit_is_success() {
    let output = RealCommandRunner::new()
        .run(&CommandLine::new("/bin/true"), LABEL)
        .unwrap();
    assert_eq!(output.exit_code, Some(0));
}

#[test]
#[serial]
fn test_non_zero_exit_is_failure() {
    let err = RealCommandRunner::new()
        .run(&CommandLine::new("/bin/false"), LABEL)
        .unwrap_err();

    assert!(matches!(err, ScriptExecutionFailure::NonZeroExit { .. }));
    assert_eq!(err.exit_code(), Some(1));
    assert_eq!(err.label(), LABEL);
}

#[test]
#[serial]
fn test_missing_executable_is_spawn_failure() {
    let err = RealCommandRunner::new()
        .run(&CommandLine::new("/nonexistent/post-backup-hook"), LABEL)
        .unwrap_err();

    match err {
        ScriptExecutionFailure::Spawn { source, command, .. } => {
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            assert_eq!(command, "/nonexistent/post-backup-hook");
        }
        other => panic!("expected spawn failure, got {other:?}"),
    }
}

#[test]
#[serial]
fn test_env_is_layered_over_inherited_environment() {
    let mut env = BTreeMap::new();
    env.insert("BACKUP_HOOKS_TEST_VAR".to_string(), "layered".to_string());

    let output = RealCommandRunner::new()
        .run(&CommandLine::new("/usr/bin/env").with_env(env), LABEL)
        .unwrap();

    assert!(output.stdout.lines().any(|l| l == "BACKUP_HOOKS_TEST_VAR=layered"));
    assert!(output.stdout.lines().any(|l| l.starts_with("PATH=")));
}

#[test]
#[serial]
fn test_failure_captures_output() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let script = write_script(
        temp_dir.path(),
        "noisy.sh",
        "echo 'to stdout'\necho 'to stderr' >&2\nexit 7",
    )?;

    let err = RealCommandRunner::new()
        .run(&CommandLine::new(script.to_string_lossy()), LABEL)
        .unwrap_err();

    assert_eq!(err.exit_code(), Some(7));
    let description = err.describe();
    assert!(description.contains("to stdout"));
    assert!(description.contains("to stderr"));
    assert!(description.contains("exited with code 7"));
    Ok(())
}

#[test]
#[serial]
fn test_post_backup_script_receives_environment() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let dump = temp_dir.path().join("env.txt");
    let script = write_script(
        temp_dir.path(),
        "dump-env.sh",
        &format!("env | grep '^GOCD_BACKUP_' | sort > '{}'", dump.display()),
    )?;

    let hook = PostBackupScript::new(
        script.to_string_lossy(),
        InitiationSource::Scheduled,
        None,
        Some(sample_backup()),
        "/backups",
    );
    assert!(hook.execute());

    let dumped = fs::read_to_string(&dump)?;
    let lines: Vec<&str> = dumped.lines().collect();
    assert_eq!(
        lines,
        vec![
            "GOCD_BACKUP_BASE_DIR=/backups",
            "GOCD_BACKUP_INITIATED_VIA=TIMER",
            "GOCD_BACKUP_PATH=/backups/20180405",
            "GOCD_BACKUP_STATUS=success",
            "GOCD_BACKUP_TIMESTAMP=2018-04-05T00:00:00Z",
        ]
    );
    Ok(())
}

#[test]
#[serial]
fn test_post_backup_script_exit_one_returns_false_with_one_error() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let script = write_script(temp_dir.path(), "fail.sh", "exit 1")?;

    let hook = PostBackupScript::new(
        script.to_string_lossy(),
        InitiationSource::UserInitiated,
        Some(Username::new("alice")),
        None,
        "/backups",
    );
    let (result, logs) = capture_logs(|| hook.execute());

    assert!(!result);
    assert_eq!(logs.count("ERROR"), 1);
    Ok(())
}

#[test]
#[serial]
fn test_post_backup_script_missing_executable_returns_false() {
    let hook = PostBackupScript::new(
        "/nonexistent/post-backup-hook",
        InitiationSource::Scheduled,
        None,
        None,
        "/backups",
    );
    let (result, logs) = capture_logs(|| hook.execute());

    assert!(!result);
    assert_eq!(logs.count("ERROR"), 1);
}

#[test]
#[serial]
fn test_non_executable_script_returns_false() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let script = write_script(temp_dir.path(), "hook.sh", "exit 0")?;
    fs::set_permissions(&script, fs::Permissions::from_mode(0o644))?;

    let err = RealCommandRunner::new()
        .run(&CommandLine::new(script.to_string_lossy()), LABEL)
        .unwrap_err();
    match &err {
        ScriptExecutionFailure::Spawn { source, .. } => {
            assert_eq!(source.kind(), std::io::ErrorKind::PermissionDenied);
        }
        other => panic!("expected spawn failure, got {other:?}"),
    }

    let hook = PostBackupScript::new(
        script.to_string_lossy(),
        InitiationSource::Scheduled,
        None,
        Some(sample_backup()),
        "/backups",
    );
    let (result, logs) = capture_logs(|| hook.execute());

    assert!(!result);
    assert_eq!(logs.count("ERROR"), 1);
    assert!(logs.contents().contains("GOCD_BACKUP_STATUS=success"));
    Ok(())
}

#[test]
#[serial]
fn test_non_utf8_output_is_decoded_lossily() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let script = write_script(temp_dir.path(), "bytes.sh", "printf 'ok\\377\\n'\nexit 2")?;

    let err = RealCommandRunner::new()
        .run(&CommandLine::new(script.to_string_lossy()), LABEL)
        .unwrap_err();

    match err {
        ScriptExecutionFailure::NonZeroExit { stdout, .. } => {
            assert_eq!(stdout, "ok\u{FFFD}\n");
        }
        other => panic!("expected non-zero exit, got {other:?}"),
    }
    Ok(())
}
