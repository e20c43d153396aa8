//! CLI integration tests for pixmask-cli.
//!
//! These tests verify the CLI behavior by running the actual binary
//! and checking outputs, exit codes, and file artifacts.

use assert_cmd::Command;
use image::{Rgb, RgbImage};
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Get a Command for the pixmask binary, isolated from the caller's env.
fn pixmask() -> Command {
    let mut cmd = Command::cargo_bin("pixmask").unwrap();
    cmd.env_remove("PIXMASK_INPUT_PATH")
        .env_remove("PIXMASK_OUTPUT_PATH")
        .env_remove("PIXMASK_SEED")
        .env_remove("RUST_LOG");
    cmd
}

fn write_photo(dir: &Path, name: &str) {
    let img = RgbImage::from_fn(160, 140, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 80]));
    img.save(dir.join(name)).unwrap();
}

// ============================================================================
// Help and Version Tests
// ============================================================================

#[test]
fn test_help_displays_usage() {
    pixmask()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Photo hash masking"))
        .stdout(predicate::str::contains("modify"))
        .stdout(predicate::str::contains("delete"))
        .stdout(predicate::str::contains("inspect"));
}

#[test]
fn test_version_displays_version() {
    pixmask()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pixmask"));
}

#[test]
fn test_help_shows_exit_codes() {
    pixmask()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Exit codes:"))
        .stdout(predicate::str::contains("65"))
        .stdout(predicate::str::contains("66"));
}

#[test]
fn test_modify_help_shows_options() {
    pixmask()
        .args(["modify", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--pixel-frequency"))
        .stdout(predicate::str::contains("--pixel-intensity"))
        .stdout(predicate::str::contains("--crop-percentage"))
        .stdout(predicate::str::contains("--color-enhancement"))
        .stdout(predicate::str::contains("--aggressive"))
        .stdout(predicate::str::contains("--seed"))
        .stdout(predicate::str::contains("--verify"));
}

// ============================================================================
// Exit Code Tests
// ============================================================================

#[test]
fn test_missing_input_returns_input_error() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("nope");

    // Exit code 66 = EX_NOINPUT
    pixmask()
        .arg("modify")
        .arg(&missing)
        .arg(temp.path().join("out"))
        .assert()
        .code(66)
        .stderr(predicate::str::contains("Input directory not found"));
}

#[test]
fn test_invalid_crop_returns_usage_error() {
    let temp = TempDir::new().unwrap();

    // Exit code 64 = EX_USAGE
    pixmask()
        .arg("modify")
        .arg(temp.path())
        .arg(temp.path().join("out"))
        .args(["--crop-percentage", "0.6"])
        .assert()
        .code(64)
        .stderr(predicate::str::contains("crop_percentage"));
}

#[test]
fn test_delete_missing_directory_returns_input_error() {
    pixmask()
        .args(["delete", "definitely_not_a_directory_here"])
        .assert()
        .code(66)
        .stderr(predicate::str::contains("Directory not found"));
}

#[test]
fn test_unknown_subcommand_fails() {
    pixmask().arg("frobnicate").assert().failure();
}

// ============================================================================
// Modify Workflow
// ============================================================================

#[test]
fn test_modify_empty_directory() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("photos");
    let output = temp.path().join("modified");
    fs::create_dir(&input).unwrap();
    fs::write(input.join("notes.txt"), "not an image").unwrap();

    pixmask()
        .arg("modify")
        .arg(&input)
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("No supported images found"));

    assert!(!output.exists());
}

#[test]
fn test_modify_and_verify() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("photos");
    let output = temp.path().join("modified");
    fs::create_dir(&input).unwrap();
    write_photo(&input, "a.png");
    write_photo(&input, "b.jpg");

    pixmask()
        .arg("modify")
        .arg(&input)
        .arg(&output)
        .args(["--seed", "42", "--verify"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 photo(s) modified"))
        .stdout(predicate::str::contains("Hash comparison"))
        .stdout(predicate::str::contains("PASSED"));

    assert!(output.join("modified_photo_1.png").is_file());
    assert!(output.join("modified_photo_2.png").is_file());
}

#[test]
fn test_modify_json_output() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("photos");
    let output = temp.path().join("modified");
    fs::create_dir(&input).unwrap();
    write_photo(&input, "only.png");

    let assert = pixmask()
        .arg("modify")
        .arg(&input)
        .arg(&output)
        .args(["--seed", "7", "--json", "--verify"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["summary"]["discovered"], 1);
    assert_eq!(json["summary"]["persisted"], 1);
    assert_eq!(json["seed"]["Fixed"], 7);
    assert!(json["hashes"]["pairs"].is_array());
}

#[test]
fn test_modify_uses_environment_paths() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("env_in");
    let output = temp.path().join("env_out");
    fs::create_dir(&input).unwrap();
    write_photo(&input, "photo.bmp");

    pixmask()
        .arg("modify")
        .env("PIXMASK_INPUT_PATH", &input)
        .env("PIXMASK_OUTPUT_PATH", &output)
        .env("PIXMASK_SEED", "3")
        .assert()
        .success();

    assert!(output.join("modified_photo_1.png").is_file());
}

#[test]
fn test_modify_reads_dotenv_in_working_directory() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("dot_in")).unwrap();
    write_photo(&temp.path().join("dot_in"), "photo.png");
    fs::write(
        temp.path().join(".env"),
        "PIXMASK_INPUT_PATH=dot_in\nPIXMASK_OUTPUT_PATH=dot_out\nPIXMASK_SEED=8\n",
    )
    .unwrap();

    pixmask()
        .current_dir(temp.path())
        .arg("modify")
        .assert()
        .success();

    assert!(temp.path().join("dot_out/modified_photo_1.png").is_file());
}

#[test]
fn test_seeded_runs_are_identical() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("photos");
    fs::create_dir(&input).unwrap();
    write_photo(&input, "a.png");

    for out in ["first", "second"] {
        pixmask()
            .arg("modify")
            .arg(&input)
            .arg(temp.path().join(out))
            .args(["--seed", "99", "-q"])
            .assert()
            .success();
    }

    let first = fs::read(temp.path().join("first/modified_photo_1.png")).unwrap();
    let second = fs::read(temp.path().join("second/modified_photo_1.png")).unwrap();
    assert_eq!(first, second);
}

// ============================================================================
// Delete and Inspect
// ============================================================================

#[test]
fn test_delete_clears_files_keeps_directory() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("one.png"), b"1").unwrap();
    fs::write(temp.path().join("two.png"), b"2").unwrap();

    pixmask()
        .arg("delete")
        .arg(temp.path())
        .arg("-v")
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted: one.png"))
        .stdout(predicate::str::contains("Deleted 2 file(s)"));

    assert!(temp.path().is_dir());
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[test]
fn test_delete_empty_directory() {
    let temp = TempDir::new().unwrap();
    pixmask()
        .arg("delete")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No files found to delete"));
}

#[test]
fn test_inspect_shows_forged_metadata() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("photos");
    let output = temp.path().join("modified");
    fs::create_dir(&input).unwrap();
    write_photo(&input, "a.png");

    pixmask()
        .arg("modify")
        .arg(&input)
        .arg(&output)
        .args(["--seed", "5", "-q"])
        .assert()
        .success();

    pixmask()
        .arg("inspect")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("modified_photo_1.png"))
        .stdout(predicate::str::contains("Metadata found"))
        .stdout(predicate::str::contains("pixels remember nothing"))
        .stdout(predicate::str::contains("Format:"));
}
