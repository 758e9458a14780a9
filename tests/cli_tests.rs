use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const DIFF: &str = "\
Root/A/cr.c | 5 +++++
Root/A/m1/Public/f1.c | 10 +++++-----
Root/A/m1/Public/f2.c | 4 ----
Root/B/m2/Public/f3.c | 20 ++++++++++++++++++++
";

/// Helper to lay out the fixed input lists under `data/`.
fn setup_data_dir() -> TempDir {
    let temp = tempfile::tempdir().unwrap();
    let data = temp.path().join("data");
    fs::create_dir(&data).unwrap();
    fs::write(data.join("Copyright-changes.txt"), "Root/A/cr.c | 5 +++++\n").unwrap();
    fs::write(data.join("todo-changes.txt"), "Root/A/m1/Public/f2.c\n").unwrap();
    fs::write(data.join("changed-source-files.txt"), DIFF).unwrap();
    temp
}

fn cmd() -> Command {
    Command::cargo_bin("diff-attention").unwrap()
}

#[test]
fn default_run_reads_data_dir_and_writes_reports() {
    let temp = setup_data_dir();

    cmd()
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("1 files in the todo list"))
        .stdout(predicate::str::contains("3 files in the diff list"));

    let summary = fs::read_to_string(temp.path().join("changes-functional-summary.csv")).unwrap();
    assert_eq!(
        summary,
        "Module,Layer,Changes,Plus,Minus,Todo,Score\n\
         m1,A,14,5,9,true,85.00\n\
         m2,B,20,20,0,false,15.00\n"
    );

    let detail = fs::read_to_string(temp.path().join("changes-detail.txt")).unwrap();
    assert!(detail.starts_with("A m1* | 14 +5,-9 | score 85.00\n"));
}

#[test]
fn default_run_fails_without_inputs_and_writes_nothing() {
    let temp = setup_data_dir();
    fs::remove_file(temp.path().join("data/todo-changes.txt")).unwrap();

    cmd()
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("todo-changes.txt"));

    assert!(!temp.path().join("changes-detail.txt").exists());
    assert!(!temp.path().join("changes-functional-summary.csv").exists());
}

#[test]
fn score_subcommand_with_explicit_files() {
    let temp = setup_data_dir();
    let out = temp.path().join("reports");

    cmd()
        .current_dir(temp.path())
        .args(["score", "--diff", "data/changed-source-files.txt", "-o"])
        .arg(&out)
        .assert()
        .success();

    // No copyright or todo list: every line counts, nothing is flagged.
    let summary = fs::read_to_string(out.join("changes-functional-summary.csv")).unwrap();
    assert_eq!(
        summary,
        "Module,Layer,Changes,Plus,Minus,Todo,Score\n\
         cr.c,A,5,5,0,false,0.00\n\
         m1,A,14,5,9,false,49.00\n\
         m2,B,20,20,0,false,15.00\n"
    );
}

#[test]
fn group_subcommand_writes_plain_summary() {
    let temp = setup_data_dir();

    cmd()
        .current_dir(temp.path())
        .args([
            "group",
            "data/changed-source-files.txt",
            "-c",
            "data/Copyright-changes.txt",
        ])
        .assert()
        .success();

    let summary = fs::read_to_string(temp.path().join("group-summary.csv")).unwrap();
    assert_eq!(
        summary,
        "Module,Layer,Changes,Plus,Minus\nm1,A,14,5,9\nm2,B,20,20,0\n"
    );

    let detail = fs::read_to_string(temp.path().join("group-detail.txt")).unwrap();
    assert!(detail.contains("A m1 | 14 +5,-9\n"));
    assert!(!detail.contains("score"));
}

#[test]
fn failed_summary_write_leaves_no_detail_report() {
    let temp = setup_data_dir();
    // A directory where the summary should go makes the final write fail.
    fs::create_dir(temp.path().join("group-summary.csv")).unwrap();

    cmd()
        .current_dir(temp.path())
        .args(["group", "data/changed-source-files.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("group-summary.csv"));

    assert!(!temp.path().join("group-detail.txt").exists());
    assert!(temp.path().join("group-summary.csv").is_dir());
}

#[test]
fn group_subcommand_requires_diff_list() {
    cmd()
        .arg("group")
        .assert()
        .failure()
        .stderr(predicate::str::contains("DIFF_LIST"));
}

#[test]
fn group_subcommand_reports_missing_file() {
    let temp = tempfile::tempdir().unwrap();

    cmd()
        .current_dir(temp.path())
        .args(["group", "missing.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.txt"));
}
