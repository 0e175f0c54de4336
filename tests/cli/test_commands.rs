use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/forms")
}

/// `triage` running in an empty directory against the fixture forms.
fn triage(workdir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("triage").unwrap();
    cmd.current_dir(workdir.path())
        .env_remove("TRIAGE_FORMS_DIR")
        .env_remove("TRIAGE_LOG_LEVEL")
        .env_remove("RUST_LOG")
        .arg("--forms-dir")
        .arg(fixtures());
    cmd
}

#[test]
fn test_help_lists_commands() {
    let mut cmd = Command::cargo_bin("triage").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("TRIAGE COMMANDS"))
        .stdout(predicate::str::contains("step"))
        .stdout(predicate::str::contains("dot"));
}

#[test]
fn test_version_command() {
    let mut cmd = Command::cargo_bin("triage").unwrap();
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_list_prints_numbered_menu() {
    let workdir = TempDir::new().unwrap();
    triage(&workdir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("1: Headache\n2: Stalls"));
}

#[test]
fn test_run_reaches_result() {
    let workdir = TempDir::new().unwrap();
    triage(&workdir)
        .args(["run", "Headache"])
        .write_stdin("2\n1,2\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Options: 1: Under 18, 2: 18 or over"))
        .stdout(predicate::str::contains("Question: Which symptoms do you have?"))
        .stdout(predicate::str::contains("Result: Seek emergency care now."));
}

#[test]
fn test_run_by_menu_number() {
    let workdir = TempDir::new().unwrap();
    triage(&workdir)
        .args(["run", "1"])
        .write_stdin("2\n1,2\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Question: How old are you?"))
        .stdout(predicate::str::contains("Result: Seek emergency care now."));
}

#[test]
fn test_run_without_form_reads_menu_selection() {
    let workdir = TempDir::new().unwrap();
    triage(&workdir)
        .arg("run")
        .write_stdin("2\n3\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Select a form to run:\n1: Headache\n2: Stalls"))
        .stdout(predicate::str::contains("Question: Pick a number"))
        .stdout(predicate::str::contains("Result: Three it is"));
}

#[test]
fn test_run_rejects_unlisted_selection() {
    let workdir = TempDir::new().unwrap();
    triage(&workdir)
        .arg("run")
        .write_stdin("9\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid selection."))
        .stdout(predicate::str::contains("Question:").not());
}

#[test]
fn test_numbered_form_out_of_range_fails() {
    let workdir = TempDir::new().unwrap();
    triage(&workdir)
        .args(["dot", "7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no form numbered 7"));
}

#[test]
fn test_step_and_dot_accept_menu_numbers() {
    let workdir = TempDir::new().unwrap();
    let output = triage(&workdir).args(["step", "1"]).output().unwrap();
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["formId"], "Headache");

    triage(&workdir)
        .args(["dot", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Three it is"));
}

#[test]
fn test_run_reprompts_on_file_upload() {
    let workdir = TempDir::new().unwrap();
    triage(&workdir)
        .args(["run", "Stalls", "--state", r#"{"questionId": 2}"#])
        .write_stdin("scan.png\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Cannot answer here: file upload questions are not supported",
        ))
        .stdout(predicate::str::contains(
            r#"Resume with --state '{"questionId":2,"resultId":null}'"#,
        ));
}

#[test]
fn test_run_reprompts_after_invalid_answer() {
    let workdir = TempDir::new().unwrap();
    triage(&workdir)
        .args(["run", "Headache"])
        .write_stdin("seven\n1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid answer:"))
        .stdout(predicate::str::contains("Result: Please contact your pediatrician."));
}

#[test]
fn test_run_asks_again_when_no_transition() {
    let workdir = TempDir::new().unwrap();
    triage(&workdir)
        .args(["run", "Stalls"])
        .write_stdin("1\n3\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("No transition for that answer"))
        .stdout(predicate::str::contains("Result: Three it is"));
}

#[test]
fn test_run_pauses_on_end_of_input() {
    let workdir = TempDir::new().unwrap();
    triage(&workdir)
        .args(["run", "Headache"])
        .write_stdin("2\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"Resume with --state '{"questionId":2,"resultId":null}'"#,
        ));
}

#[test]
fn test_run_resumes_from_state() {
    let workdir = TempDir::new().unwrap();
    triage(&workdir)
        .args(["run", "Headache", "--state", r#"{"questionId": 3}"#])
        .write_stdin("sudden onset\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Question: Describe the pain"))
        .stdout(predicate::str::contains("Result: Seek emergency care now."));
}

#[test]
fn test_step_without_answer_reports_initial_state() {
    let workdir = TempDir::new().unwrap();
    let output = triage(&workdir)
        .args(["step", "Headache"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["formId"], "Headache");
    assert_eq!(report["question"]["id"], 1);
    assert_eq!(report["question"]["type"], "SingleChoice");
    assert_eq!(report["question"]["options"]["2"], "18 or over");
    assert_eq!(report["complete"], false);
    assert_eq!(report["transitioned"], false);
    assert_eq!(report["state"]["questionId"], 1);
}

#[test]
fn test_step_chain_through_state() {
    let workdir = TempDir::new().unwrap();
    let first = triage(&workdir)
        .args(["step", "Headache", "--answer", "2"])
        .output()
        .unwrap();
    let report: serde_json::Value = serde_json::from_slice(&first.stdout).unwrap();
    assert_eq!(report["nextQuestion"]["id"], 2);
    assert_eq!(report["transitioned"], true);
    let state = report["state"].to_string();

    let second = triage(&workdir)
        .args(["step", "Headache", "--answer", "1, 2", "--state", &state])
        .output()
        .unwrap();
    let report: serde_json::Value = serde_json::from_slice(&second.stdout).unwrap();
    assert_eq!(report["question"]["id"], 2);
    assert_eq!(report["complete"], true);
    assert_eq!(report["result"]["id"], 11);
    assert_eq!(report["state"]["resultId"], 11);
}

#[test]
fn test_step_invalid_answer_fails_with_code() {
    let workdir = TempDir::new().unwrap();
    triage(&workdir)
        .args(["step", "Headache", "--answer", "9"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("TRG-ANS-001"));
}

#[test]
fn test_step_bad_state_fails_with_code() {
    let workdir = TempDir::new().unwrap();
    triage(&workdir)
        .args(["step", "Headache", "--state", "{oops"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("TRG-STATE-001"));
}

#[test]
fn test_unknown_form_fails() {
    let workdir = TempDir::new().unwrap();
    triage(&workdir)
        .args(["run", "Missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("TRG-IO-001"));
}

#[test]
fn test_dot_prints_graph() {
    let workdir = TempDir::new().unwrap();
    triage(&workdir)
        .args(["dot", "Headache"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("digraph {"))
        .stdout(predicate::str::contains("->"));
}

#[test]
fn test_forms_dir_from_config_file() {
    let workdir = TempDir::new().unwrap();
    std::fs::write(
        workdir.path().join("triage.toml"),
        format!("forms_dir = {:?}\n", fixtures().display().to_string()),
    )
    .unwrap();
    let mut cmd = Command::cargo_bin("triage").unwrap();
    cmd.current_dir(workdir.path())
        .env_remove("TRIAGE_FORMS_DIR")
        .env_remove("RUST_LOG")
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("1: Headache"));
}

#[test]
fn test_malformed_config_fails_with_code() {
    let workdir = TempDir::new().unwrap();
    std::fs::write(workdir.path().join("triage.toml"), "forms_dir = [").unwrap();
    triage(&workdir)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("TRG-CFG-001"));
}

#[test]
fn test_file_sink_writes_log() {
    let workdir = TempDir::new().unwrap();
    std::fs::write(
        workdir.path().join("triage.toml"),
        "[logging]\nenable_file = true\nconsole_output = \"none\"\n",
    )
    .unwrap();
    triage(&workdir)
        .args(["run", "Headache"])
        .write_stdin("1\n")
        .assert()
        .success();

    let log = std::fs::read_to_string(workdir.path().join(".triage/logs/triage.log")).unwrap();
    assert!(log.contains("triage complete"));
}
