//! Integration tests for the lift binary.
//!
//! These tests verify end-to-end behavior including:
//! - Adding templates from presets
//! - Logging sets and receiving suggestions
//! - Completing workouts and accepting progressions
//! - Data persistence across invocations

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the CLI with config isolated to the test directory
fn cli(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("lift"));
    cmd.env("XDG_CONFIG_HOME", dir.join("config"))
        .arg("--data-dir")
        .arg(dir.join("data"));
    cmd
}

fn read_record(dir: &Path, key: &str) -> serde_json::Value {
    let path = dir.join("data").join(format!("{}.json", key));
    let contents = fs::read_to_string(&path).expect("Failed to read record");
    let value: serde_json::Value = serde_json::from_str(&contents).expect("Invalid JSON");
    value["data"].clone()
}

/// Add the 5x5 preset and return (workout id, first squat exercise id)
fn add_five_by_five(dir: &Path) -> (String, String) {
    cli(dir).args(["add-preset", "Full Body 5x5"]).assert().success();

    let workouts = read_record(dir, "workouts");
    let workout = &workouts[0];
    let exercise = &workout["days"][0]["exercises"][0];
    assert_eq!(exercise["name"], "Squat");
    (
        workout["id"].as_str().unwrap().to_string(),
        exercise["id"].as_str().unwrap().to_string(),
    )
}

fn log_set(dir: &Path, exercise: &str, weight: &str, reps: &str) -> assert_cmd::assert::Assert {
    cli(dir)
        .args(["log", "--exercise", exercise, "--weight", weight, "--reps", reps])
        .assert()
        .success()
}

#[test]
fn test_cli_help() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("progressive overload"));
}

#[test]
fn test_presets_listed() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .arg("presets")
        .assert()
        .success()
        .stdout(predicate::str::contains("Full Body 5x5"))
        .stdout(predicate::str::contains("Push Pull Legs"));
}

#[test]
fn test_add_preset_persists_template() {
    let temp_dir = setup_test_dir();
    let (workout_id, _) = add_five_by_five(temp_dir.path());

    cli(temp_dir.path())
        .arg("workouts")
        .assert()
        .success()
        .stdout(predicate::str::contains(workout_id))
        .stdout(predicate::str::contains("Overhead Press"));
}

#[test]
fn test_unknown_preset_fails() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .args(["add-preset", "Bro Split"])
        .assert()
        .failure();

    assert!(!temp_dir.path().join("data/workouts.json").exists());
}

#[test]
fn test_full_session_produces_suggestion() {
    let temp_dir = setup_test_dir();
    let (_, squat) = add_five_by_five(temp_dir.path());

    for _ in 0..4 {
        log_set(temp_dir.path(), &squat, "100", "5")
            .stdout(predicate::str::contains("Increase weight").not());
    }
    log_set(temp_dir.path(), &squat, "100", "5")
        .stdout(predicate::str::contains("Increase weight by 5 lbs"));

    let history = read_record(temp_dir.path(), "previousSets");
    assert_eq!(history[&squat].as_array().unwrap().len(), 5);

    let suggestions = read_record(temp_dir.path(), "progressionSuggestions");
    assert_eq!(suggestions[&squat]["suggested_weight"], 105.0);
    assert_eq!(suggestions[&squat]["suggested_reps"], 5);

    cli(temp_dir.path())
        .arg("suggestions")
        .assert()
        .success()
        .stdout(predicate::str::contains("Squat: 105 x 5"));
}

#[test]
fn test_accept_starts_cooldown() {
    let temp_dir = setup_test_dir();
    let (_, squat) = add_five_by_five(temp_dir.path());

    for _ in 0..5 {
        log_set(temp_dir.path(), &squat, "100", "5");
    }

    cli(temp_dir.path())
        .args(["accept", &squat])
        .assert()
        .success()
        .stdout(predicate::str::contains("Next target: 105 x 5"));

    let workouts = read_record(temp_dir.path(), "workouts");
    assert!(!workouts[0]["days"][0]["exercises"][0]["last_progression_date"].is_null());

    // Another qualifying set today stays inside the cooldown
    log_set(temp_dir.path(), &squat, "105", "5");
    cli(temp_dir.path())
        .arg("suggestions")
        .assert()
        .success()
        .stdout(predicate::str::contains("No suggestions yet."));
}

#[test]
fn test_complete_workout_snapshot() {
    let temp_dir = setup_test_dir();
    let (workout_id, _) = add_five_by_five(temp_dir.path());

    cli(temp_dir.path())
        .args(["complete", &workout_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("completed"));

    let completed = read_record(temp_dir.path(), "completedWorkouts");
    assert_eq!(completed.as_array().unwrap().len(), 1);
    assert!(!completed[0]["completion_date"].is_null());
    assert_eq!(completed[0]["template_id"], workout_id.as_str());

    let workouts = read_record(temp_dir.path(), "workouts");
    assert!(workouts[0]["completion_date"].is_null());
}

#[test]
fn test_past_lists_completed_workouts() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .arg("past")
        .assert()
        .success()
        .stdout(predicate::str::contains("No completed workouts"));

    let (workout_id, _) = add_five_by_five(temp_dir.path());
    cli(temp_dir.path())
        .args(["complete", &workout_id])
        .assert()
        .success();

    cli(temp_dir.path())
        .arg("past")
        .assert()
        .success()
        .stdout(predicate::str::contains("This Week"))
        .stdout(predicate::str::contains("Full Body 5x5"))
        .stdout(predicate::str::contains("Older").not());
}

#[test]
fn test_configure_exercise_settings() {
    let temp_dir = setup_test_dir();
    let (_, squat) = add_five_by_five(temp_dir.path());

    cli(temp_dir.path())
        .args([
            "configure",
            &squat,
            "--target-reps",
            "6",
            "--strategy",
            "both",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Squat: 6 reps"));

    let workouts = read_record(temp_dir.path(), "workouts");
    let exercise = &workouts[0]["days"][0]["exercises"][0];
    assert_eq!(exercise["target_reps"], 6);
    assert_eq!(exercise["strategy"], "both");
    // Left alone when not given
    assert_eq!(exercise["weight_increment"], 5.0);

    // Six reps per set now meets the target
    for _ in 0..5 {
        log_set(temp_dir.path(), &squat, "100", "6");
    }
    cli(temp_dir.path())
        .arg("suggestions")
        .assert()
        .success()
        .stdout(predicate::str::contains("105 x 7"));
}

#[test]
fn test_configure_unknown_exercise_fails() {
    let temp_dir = setup_test_dir();
    add_five_by_five(temp_dir.path());

    cli(temp_dir.path())
        .args(["configure", "00000000-0000-0000-0000-000000000001", "--target-reps", "6"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No exercise with id"));
}

#[test]
fn test_history_and_export() {
    let temp_dir = setup_test_dir();
    let (_, squat) = add_five_by_five(temp_dir.path());

    log_set(temp_dir.path(), &squat, "95", "5");
    log_set(temp_dir.path(), &squat, "97.5", "4");

    cli(temp_dir.path())
        .args(["history", &squat])
        .assert()
        .success()
        .stdout(predicate::str::contains("95 x 5"))
        .stdout(predicate::str::contains("97.5 x 4"));

    let csv_path = temp_dir.path().join("export/sets.csv");
    cli(temp_dir.path())
        .arg("export")
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 2 sets"));

    let contents = fs::read_to_string(&csv_path).unwrap();
    assert!(contents.starts_with("exercise_id,exercise_name"));
    assert_eq!(contents.lines().count(), 3);
}
