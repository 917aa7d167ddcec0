//! Configuration integration tests.
//!
//! These tests run the compiled binary and check that discovered settings
//! reach the commands: `info --json` reports the effective values, and
//! `analyze --json` shows them applied to the frequency table.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const TEXT: &str = "Il gatto nero dorme sul divano. Il gatto nero gioca con il filo.";

/// Returns a Command configured to run our binary, isolated from the caller's env.
#[allow(deprecated)]
fn cmd() -> Command {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
    cmd.env_remove("GEMINI_API_KEY")
        .env_remove("LEGGIBILE_MIN_WORD_LENGTH")
        .env_remove("LEGGIBILE_FILTER_SHORT_WORDS")
        .env_remove("RUST_LOG");
    cmd
}

fn run_json(dir: &Path, args: &[&str]) -> Value {
    let output = cmd()
        .args(["-C", dir.to_str().unwrap()])
        .args(args)
        .arg("--json")
        .output()
        .expect("failed to run command");
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("invalid JSON output")
}

fn info_json(dir: &Path) -> Value {
    run_json(dir, &["info"])
}

// =============================================================================
// Discovery
// =============================================================================

#[test]
fn runs_without_config_file() {
    let tmp = TempDir::new().unwrap();
    let json = info_json(tmp.path());

    assert_eq!(json["config"]["log_level"], "info");
    assert_eq!(json["config"]["filter_short_words"], true);
    assert_eq!(json["config"]["min_word_length"], 4);
    assert_eq!(json["config"]["max_input_bytes"], 5 * 1024 * 1024);
    assert_eq!(json["config"]["gemini_configured"], false);
    assert!(json["config"]["config_file"].is_null());
}

#[test]
fn discovers_config_in_parent_directory() {
    let tmp = TempDir::new().unwrap();
    let sub_dir = tmp.path().join("capitoli").join("uno");
    fs::create_dir_all(&sub_dir).unwrap();
    fs::write(tmp.path().join(".leggibile.toml"), "min_word_length = 6\n").unwrap();

    let json = info_json(&sub_dir);

    assert_eq!(json["config"]["min_word_length"], 6);
    let reported = json["config"]["config_file"].as_str().unwrap();
    assert!(reported.ends_with(".leggibile.toml"), "reported: {reported}");
}

#[test]
fn regular_name_overrides_dotfile() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".leggibile.toml"), "min_word_length = 3\n").unwrap();
    fs::write(tmp.path().join("leggibile.yaml"), "min_word_length: 7\n").unwrap();

    let json = info_json(tmp.path());
    assert_eq!(json["config"]["min_word_length"], 7);
}

#[test]
fn git_boundary_stops_config_search() {
    let tmp = TempDir::new().unwrap();
    let repo = tmp.path().join("repo");
    let src = repo.join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(tmp.path().join(".leggibile.toml"), r#"log_level = "error""#).unwrap();
    fs::create_dir(repo.join(".git")).unwrap();

    let json = info_json(&src);

    assert_eq!(json["config"]["log_level"], "info");
    assert!(json["config"]["config_file"].is_null());
}

#[test]
fn explicit_config_overrides_discovered() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".leggibile.toml"), "filter_short_words = true\n").unwrap();
    let explicit = tmp.path().join("override.json");
    fs::write(&explicit, r#"{"filter_short_words": false}"#).unwrap();

    let json = run_json(tmp.path(), &["--config", explicit.to_str().unwrap(), "info"]);

    assert_eq!(json["config"]["filter_short_words"], false);
    let reported = json["config"]["config_file"].as_str().unwrap();
    assert!(reported.ends_with("override.json"), "reported: {reported}");
}

// =============================================================================
// Values
// =============================================================================

#[test]
fn out_of_range_min_word_length_is_clamped() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("leggibile.toml"), "min_word_length = 99\n").unwrap();

    let json = info_json(tmp.path());
    assert_eq!(json["config"]["min_word_length"], 10);
}

#[test]
fn disable_input_limit_is_reported() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("leggibile.toml"),
        "max_input_bytes = 10\ndisable_input_limit = true\n",
    )
    .unwrap();

    let json = info_json(tmp.path());
    assert!(json["config"]["max_input_bytes"].is_null());
}

#[test]
fn gemini_key_from_environment_is_detected_but_not_printed() {
    let tmp = TempDir::new().unwrap();
    let output = cmd()
        .env("GEMINI_API_KEY", "key-from-env")
        .args(["-C", tmp.path().to_str().unwrap(), "info", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("key-from-env"));
    let json: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["config"]["gemini_configured"], true);
}

#[test]
fn env_var_overrides_file() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("leggibile.toml"), "min_word_length = 3\n").unwrap();

    let output = cmd()
        .env("LEGGIBILE_MIN_WORD_LENGTH", "8")
        .args(["-C", tmp.path().to_str().unwrap(), "info", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["config"]["min_word_length"], 8);
}

// =============================================================================
// Config reaches the analysis
// =============================================================================

#[test]
fn configured_filter_shapes_frequency_table() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("testo.txt"), TEXT).unwrap();
    fs::write(tmp.path().join("leggibile.toml"), "filter_short_words = false\n").unwrap();

    let json = run_json(tmp.path(), &["analyze", "testo.txt"]);

    assert_eq!(json["filter_applied"]["enabled"], false);
    assert!(json["filter_applied"]["min_length"].is_null());
    // "il" appears three times and wins once short words count.
    assert_eq!(json["most_common_words"][0][0], "il");
    assert_eq!(json["most_common_words"][0][1], 3);
}

#[test]
fn flag_overrides_configured_min_word_length() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("testo.txt"), TEXT).unwrap();
    fs::write(tmp.path().join("leggibile.toml"), "min_word_length = 8\n").unwrap();

    let json = run_json(
        tmp.path(),
        &["analyze", "testo.txt", "--min-word-length", "5"],
    );
    assert_eq!(json["filter_applied"]["min_length"], 5);
    assert_eq!(json["most_common_words"][0][0], "gatto");
}

#[test]
fn configured_input_limit_rejects_large_files() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("testo.txt"), TEXT).unwrap();
    fs::write(tmp.path().join("leggibile.toml"), "max_input_bytes = 16\n").unwrap();

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "analyze", "testo.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("input too large"));
}

// =============================================================================
// Error Cases
// =============================================================================

#[test]
fn invalid_toml_config_shows_error() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".leggibile.toml"), "this is not valid toml [[[").unwrap();

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "info"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration"));
}

#[test]
fn wrongly_typed_value_shows_error() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".leggibile.json"), r#"{"min_word_length": "tanti"}"#).unwrap();

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "info"])
        .assert()
        .failure();
}
