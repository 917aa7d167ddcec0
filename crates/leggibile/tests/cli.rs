//! End-to-end CLI integration tests
//!
//! These tests invoke the compiled binary as a subprocess to verify
//! that the CLI behaves correctly from a user's perspective.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

const TEXT: &str = "Il gatto nero dorme sul divano. Il gatto nero gioca con il filo.";

/// Returns a Command configured to run our binary.
///
/// Note: `cargo_bin` is marked deprecated for edge cases involving custom
/// cargo build directories, but works correctly for standard project layouts.
#[allow(deprecated)]
fn cmd() -> Command {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
    cmd.env_remove("GEMINI_API_KEY")
        .env_remove("LEGGIBILE_MIN_WORD_LENGTH")
        .env_remove("LEGGIBILE_FILTER_SHORT_WORDS");
    cmd
}

/// A scratch directory holding `testo.txt`.
fn workspace(contents: &str) -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("testo.txt"), contents).unwrap();
    tmp
}

fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_shows_usage() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("analyze"))
        .stdout(predicate::str::contains("compare"))
        .stdout(predicate::str::contains("GEMINI_API_KEY"));
}

#[test]
fn version_flag_shows_version() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn version_only_prints_bare_version() {
    cmd()
        .arg("--version-only")
        .assert()
        .success()
        .stdout(predicate::str::diff(format!(
            "{}\n",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn no_subcommand_shows_help() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn invalid_subcommand_shows_error() {
    cmd()
        .arg("leggi-tutto")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

// =============================================================================
// Info Command
// =============================================================================

#[test]
fn info_shows_sections() {
    let tmp = TempDir::new().unwrap();
    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "info"])
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_NAME")))
        .stdout(predicate::str::contains("Analysis"))
        .stdout(predicate::str::contains("Semantic Analysis"))
        .stdout(predicate::str::contains("not set"));
}

#[test]
fn info_json_contains_expected_fields() {
    let tmp = TempDir::new().unwrap();
    let json = stdout_json(cmd().args(["-C", tmp.path().to_str().unwrap(), "info", "--json"]));

    assert_eq!(json["name"], env!("CARGO_PKG_NAME"));
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(json["config"]["gemini_model"], "gemini-flash-latest");
}

// =============================================================================
// Analyze Command
// =============================================================================

#[test]
fn analyze_prints_human_report() {
    let tmp = workspace(TEXT);
    cmd()
        .current_dir(tmp.path())
        .args(["--color", "never", "analyze", "testo.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("testo.txt"))
        .stdout(predicate::str::contains("Gulpease:"))
        .stdout(predicate::str::contains("Molto Semplice"))
        .stdout(predicate::str::contains("13 words, 2 sentences"));
}

#[test]
fn analyze_json_reports_metrics() {
    let tmp = workspace(TEXT);
    let json = stdout_json(
        cmd()
            .current_dir(tmp.path())
            .args(["analyze", "testo.txt", "--json"]),
    );

    assert_eq!(json["success"], true);
    assert_eq!(json["statistics"]["total_words"], 13);
    assert_eq!(json["statistics"]["total_sentences"], 2);
    assert_eq!(json["statistics"]["unique_words"], 9);
    assert_eq!(json["gulpease"], 96.69);
    assert_eq!(json["ttr"], 0.692);
    assert_eq!(json["sentence_complexity"]["short"], 2);
    assert_eq!(json["complexity_score"]["category"], "Molto Semplice");
    assert_eq!(json["filter_applied"]["enabled"], true);
    assert_eq!(json["filter_applied"]["min_length"], 4);
    // Default filter keeps words of four letters or more.
    assert_eq!(json["most_common_words"][0], serde_json::json!(["gatto", 2]));
    assert_eq!(json["most_common_words"][1], serde_json::json!(["nero", 2]));
}

#[test]
fn analyze_reads_stdin() {
    let json = stdout_json(cmd().args(["analyze", "-", "--json"]).write_stdin(TEXT));
    assert_eq!(json["statistics"]["total_sentences"], 2);
}

#[test]
fn no_filter_counts_short_words() {
    let tmp = workspace(TEXT);
    let json = stdout_json(
        cmd()
            .current_dir(tmp.path())
            .args(["analyze", "testo.txt", "--no-filter", "--json"]),
    );

    assert!(json["filter_applied"]["min_length"].is_null());
    assert_eq!(json["most_common_words"][0], serde_json::json!(["il", 3]));
}

#[test]
fn min_word_length_is_clamped() {
    let tmp = workspace(TEXT);
    let json = stdout_json(cmd().current_dir(tmp.path()).args([
        "analyze",
        "testo.txt",
        "--min-word-length",
        "50",
        "--json",
    ]));

    assert_eq!(json["filter_applied"]["min_length"], 10);
    assert_eq!(json["most_common_words"], serde_json::json!([]));
}

#[test]
fn blank_file_fails_with_empty_text() {
    let tmp = workspace("   \n\t ");
    cmd()
        .current_dir(tmp.path())
        .args(["analyze", "testo.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("empty text"));
}

#[test]
fn text_without_words_fails() {
    let tmp = workspace("123 456... 789!");
    cmd()
        .current_dir(tmp.path())
        .args(["analyze", "testo.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid text"));
}

#[test]
fn missing_file_fails() {
    let tmp = TempDir::new().unwrap();
    cmd()
        .current_dir(tmp.path())
        .args(["analyze", "assente.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("assente.txt"));
}

#[test]
fn stdin_over_limit_fails() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("leggibile.toml"), "max_input_bytes = 8\n").unwrap();

    cmd()
        .current_dir(tmp.path())
        .args(["analyze", "-"])
        .write_stdin(TEXT)
        .assert()
        .failure()
        .stderr(predicate::str::contains("input too large"));
}

// =============================================================================
// Compare Command
// =============================================================================

#[test]
fn compare_without_key_keeps_local_result() {
    let tmp = workspace(TEXT);
    let json = stdout_json(
        cmd()
            .current_dir(tmp.path())
            .args(["compare", "testo.txt", "--json"]),
    );

    assert_eq!(json["success"], true);
    assert_eq!(json["local"]["success"], true);
    assert_eq!(json["local"]["gulpease"], 96.69);
    assert_eq!(json["semantic"]["kind"], "configuration_error");
    assert!(json["semantic"]["error"].as_str().unwrap().contains("not configured"));
    assert!(json.get("differences").is_none());
}

#[test]
fn compare_without_key_prints_unavailable() {
    let tmp = workspace(TEXT);
    cmd()
        .current_dir(tmp.path())
        .args(["--color", "never", "compare", "testo.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Local"))
        .stdout(predicate::str::contains("Unavailable:"));
}

#[test]
fn compare_blank_input_fails() {
    let tmp = workspace("");
    cmd()
        .current_dir(tmp.path())
        .args(["compare", "testo.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("empty text"));
}

// =============================================================================
// Global Flags
// =============================================================================

#[test]
fn quiet_and_verbose_flags_accepted() {
    let tmp = TempDir::new().unwrap();
    for flag in ["-q", "-v", "-vv", "--color=always"] {
        cmd()
            .args([flag, "-C", tmp.path().to_str().unwrap(), "info"])
            .assert()
            .success();
    }
}

#[test]
fn chdir_flag_changes_directory() {
    let tmp = workspace(TEXT);
    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "analyze", "testo.txt", "--json"])
        .assert()
        .success();
}

#[test]
fn chdir_nonexistent_fails() {
    cmd()
        .args(["-C", "/nonexistent/path/that/does/not/exist", "info"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to change directory"));
}
