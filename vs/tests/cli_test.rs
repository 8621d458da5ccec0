//! CLI tests for the `vs` binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn original() -> (TempDir, PathBuf) {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let image = temp.path().join("photo.jpg");
    fs::write(&image, b"not really a jpeg").unwrap();
    (temp, image)
}

fn vs() -> Command {
    Command::cargo_bin("vs").unwrap()
}

#[test]
fn test_init_creates_version_dir() {
    let (temp, image) = original();
    vs().arg("init").arg(&image).assert().success();

    let stored = temp.path().join("photo").join("original.png");
    assert_eq!(fs::read(stored).unwrap(), b"not really a jpeg");
}

#[test]
fn test_delete_original_fails() {
    let (temp, image) = original();
    vs().arg("delete")
        .arg(&image)
        .arg("0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid version number 0"));
    assert!(temp.path().join("photo").join("original.png").is_file());
}

#[test]
fn test_delete_missing_version_is_noop() {
    let (_temp, image) = original();
    vs().arg("delete").arg(&image).arg("3").assert().success();
}

#[test]
fn test_count_and_path() {
    let (_temp, image) = original();
    vs().arg("count").arg(&image).assert().success().stdout("0\n");
    vs().arg("path")
        .arg(&image)
        .arg("0")
        .assert()
        .success()
        .stdout(predicate::str::ends_with("original.png\n"));
    vs().arg("path")
        .arg(&image)
        .arg("2")
        .assert()
        .success()
        .stdout(predicate::str::ends_with("v2.png\n"));
}

#[test]
fn test_list_json() {
    let (_temp, image) = original();
    vs().args(["list", "--format", "json"])
        .arg(&image)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"versions\"").and(predicate::str::contains("original.png")));
}

#[test]
fn test_missing_original_fails() {
    let temp = TempDir::new().unwrap();
    vs().arg("count")
        .arg(temp.path().join("missing.png"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Original image not found"));
}
