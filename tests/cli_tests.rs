#![cfg(unix)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn create_test_environment() -> (PathBuf, PathBuf, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let backup_dir = temp_dir.path().join("backup");
    fs::create_dir_all(&backup_dir).unwrap();

    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        r#"
tool_timeout_secs = 30

[dump]
program = "sh"
args = ["-c", "exit 0", "db-tool"]

[restore]
program = "sh"
args = ["-c", "exit 0", "db-tool"]
"#,
    )
    .unwrap();

    (backup_dir, config_path, temp_dir)
}

fn run(config: &Path, backup_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_backup-catalog"))
        .arg("--config")
        .arg(config)
        .arg("--backup-dir")
        .arg(backup_dir)
        .args(args)
        .output()
        .unwrap()
}

fn stdout_json(output: &Output) -> serde_json::Value {
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_json_restore_prints_only_ack() {
    let (backup_dir, config, _temp) = create_test_environment();
    fs::write(backup_dir.join("backup_01-02-2023_10-00-00.gz"), b"dump").unwrap();

    let output = run(
        &config,
        &backup_dir,
        &["--format", "json", "restore", "backup_01-02-2023_10-00-00.gz"],
    );

    assert_eq!(
        stdout_json(&output),
        serde_json::json!({ "filename": "backup_01-02-2023_10-00-00.gz" })
    );
}

#[test]
fn test_json_restore_latest() {
    let (backup_dir, config, _temp) = create_test_environment();
    fs::write(backup_dir.join("backup_01-02-2023_10-00-00.gz"), b"dump").unwrap();
    fs::write(backup_dir.join("backup_05-02-2023_08-30-00.gz"), b"dump").unwrap();

    let output = run(&config, &backup_dir, &["--format", "json", "restore", "--latest"]);

    assert_eq!(
        stdout_json(&output),
        serde_json::json!({ "filename": "backup_05-02-2023_08-30-00.gz" })
    );
}

#[test]
fn test_json_delete_prints_only_ack() {
    let (backup_dir, config, _temp) = create_test_environment();
    fs::write(backup_dir.join("backup_01-02-2023_10-00-00.gz"), b"dump").unwrap();

    let output = run(
        &config,
        &backup_dir,
        &["--format", "json", "delete", "backup_01-02-2023_10-00-00.gz"],
    );

    assert_eq!(
        stdout_json(&output),
        serde_json::json!({ "filename": "backup_01-02-2023_10-00-00.gz" })
    );
    assert!(!backup_dir.join("backup_01-02-2023_10-00-00.gz").exists());
}

#[test]
fn test_delete_missing_fails() {
    let (backup_dir, config, _temp) = create_test_environment();

    let output = run(
        &config,
        &backup_dir,
        &["--format", "json", "delete", "backup_01-02-2023_10-00-00.gz"],
    );

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}
