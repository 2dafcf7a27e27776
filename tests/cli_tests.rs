// CLI acceptance tests
// Drive the stagesync binary end to end against a temp-dir database.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use std::fs;

fn setup_test_env() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let config_dir = temp_dir.path().join(".stagesync");
    fs::create_dir_all(&config_dir).unwrap();
    let config_file = config_dir.join("rc");
    fs::write(&config_file, format!("data.location={}\n", db_path.display())).unwrap();
    temp_dir
}

fn cmd(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("stagesync").unwrap();
    cmd.env("HOME", temp_dir.path());
    cmd
}

fn seed_workflow_and_project(temp_dir: &TempDir) {
    cmd(temp_dir)
        .args(["workflow", "add", "onboarding", "--stages", "Intake,Review,Filing,Signoff,Completed"])
        .assert()
        .success();
    cmd(temp_dir)
        .args(["project", "add", "acme", "--workflow", "onboarding"])
        .assert()
        .success();
}

#[test]
fn test_workflow_add_and_list() {
    let temp_dir = setup_test_env();

    cmd(&temp_dir)
        .args(["workflow", "add", "onboarding", "--stages", "Intake,Review,Completed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 stages"));

    cmd(&temp_dir)
        .args(["workflow", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Intake -> Review -> Completed"));
}

#[test]
fn test_move_reports_progress() {
    let temp_dir = setup_test_env();
    seed_workflow_and_project(&temp_dir);

    // 5 stages, 5 default tasks; position 3 means 3 completed, 60%
    cmd(&temp_dir)
        .args(["move", "acme", "Signoff"])
        .assert()
        .success()
        .stdout(predicate::str::contains("60% (3/5 tasks completed)"));
}

#[test]
fn test_move_json_payload() {
    let temp_dir = setup_test_env();
    seed_workflow_and_project(&temp_dir);

    cmd(&temp_dir)
        .args(["move", "acme", "Signoff", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"success\":true"))
        .stdout(predicate::str::contains("\"progress_percentage\":60"))
        .stdout(predicate::str::contains("\"completed_tasks\":3"))
        .stdout(predicate::str::contains("\"total_tasks\":5"));
}

#[test]
fn test_progress_query() {
    let temp_dir = setup_test_env();
    seed_workflow_and_project(&temp_dir);

    cmd(&temp_dir)
        .args(["move", "acme", "Completed"])
        .assert()
        .success();

    cmd(&temp_dir)
        .args(["progress", "acme", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"progress_percentage\":100"));
}

#[test]
fn test_board_groups_projects_by_stage() {
    let temp_dir = setup_test_env();
    seed_workflow_and_project(&temp_dir);
    cmd(&temp_dir)
        .args(["project", "add", "globex", "--workflow", "onboarding"])
        .assert()
        .success();

    cmd(&temp_dir)
        .args(["move", "acme", "Review"])
        .assert()
        .success();

    cmd(&temp_dir)
        .args(["board", "onboarding"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[Review] acme"))
        .stdout(predicate::str::contains("[Intake] globex"));
}

#[test]
fn test_manual_task_toggle_feeds_progress() {
    let temp_dir = setup_test_env();
    cmd(&temp_dir)
        .args(["workflow", "add", "onboarding", "--stages", "Intake,Review,Completed"])
        .assert()
        .success();
    cmd(&temp_dir)
        .args(["project", "add", "acme", "--workflow", "onboarding", "--tasks", "a,b,c,d", "--manual"])
        .assert()
        .success();

    // Task ids start at 1 in a fresh database
    cmd(&temp_dir)
        .args(["task", "1", "completed"])
        .assert()
        .success();

    cmd(&temp_dir)
        .args(["progress", "acme"])
        .assert()
        .success()
        .stdout(predicate::str::contains("25% (1/4 tasks completed)"));

    // Moving a manual project changes the stage only
    cmd(&temp_dir)
        .args(["move", "acme", "Review"])
        .assert()
        .success()
        .stdout(predicate::str::contains("25% (1/4 tasks completed)"));
}

#[test]
fn test_unknown_stage_is_a_user_error() {
    let temp_dir = setup_test_env();
    seed_workflow_and_project(&temp_dir);

    cmd(&temp_dir)
        .args(["move", "acme", "Nonexistent"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_unknown_project_is_a_user_error() {
    let temp_dir = setup_test_env();
    seed_workflow_and_project(&temp_dir);

    cmd(&temp_dir)
        .args(["progress", "nope"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_invalid_task_state_is_rejected() {
    let temp_dir = setup_test_env();
    seed_workflow_and_project(&temp_dir);

    cmd(&temp_dir)
        .args(["task", "1", "Done"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid state"));
}
