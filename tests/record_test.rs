use assert_cmd::cargo::cargo_bin_cmd;
use assert_fs::prelude::*;
use predicates::prelude::*;

/// Run focuslog with given args.
fn focuslog() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("focuslog");
    cmd.env_remove("FOCUSLOG_CONFIG").env_remove("RUST_LOG");
    cmd
}

const SEED_ROW: &str = "mr bear,2022-10-01T06:59:00-07:00,Doing it and doing it and doing it well.\n";

fn config(policy: &str, mode: &str) -> String {
    format!("[log]\npolicy = \"{policy}\"\n\n[live]\nmode = \"{mode}\"\n")
}

/// A project with three rows dated 2022-10-01 06:59 -07:00.
fn seeded_project(policy: &str, mode: &str) -> assert_fs::TempDir {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("focuslog.toml").write_str(&config(policy, mode)).unwrap();
    dir.child("focus.csv").write_str(&SEED_ROW.repeat(3)).unwrap();
    dir
}

fn row_count(path: &std::path::Path) -> usize {
    std::fs::read_to_string(path).unwrap().lines().count()
}

// ─── Rotation ────────────────────────────────────────────────────

#[test]
fn record_rotates_into_monthly_archive() {
    let dir = seeded_project("local_offset", "always");

    focuslog()
        .current_dir(dir.path())
        .args([
            "record",
            "mr bear's friend",
            "I represent Queens, she was raised out in Brooklyn.",
            "--at",
            "2022-10-01T07:01:00-07:00",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("focus_2022_09.csv"))
        .stdout(predicate::str::contains("mr bear's friend is focusing"));

    let archive = dir.path().join("focus_2022_09.csv");
    assert_eq!(std::fs::read_to_string(&archive).unwrap(), SEED_ROW.repeat(3));

    let current = std::fs::read_to_string(dir.path().join("focus.csv")).unwrap();
    assert_eq!(current.lines().count(), 1);
    assert!(current.starts_with("mr bear's friend,2022-10-01T07:01:00-07:00,"));

    let summary = std::fs::read_to_string(dir.path().join("summary_2022_09.csv")).unwrap();
    assert_eq!(summary, "mr bear,1\n");
}

#[test]
fn same_month_appends_without_rotation() {
    let dir = seeded_project("naive_or_utc", "always");

    focuslog()
        .current_dir(dir.path())
        .args(["record", "friend", "reading", "--at", "2022-10-01T07:01:00-07:00"])
        .assert()
        .success();

    assert_eq!(row_count(&dir.path().join("focus.csv")), 4);
    dir.child("focus_2022_09.csv").assert(predicate::path::missing());
    dir.child("focus_2022_10.csv").assert(predicate::path::missing());
}

#[test]
fn existing_archive_fails_loudly() {
    let dir = seeded_project("local_offset", "always");
    dir.child("focus_2022_09.csv").write_str("older\n").unwrap();

    focuslog()
        .current_dir(dir.path())
        .args(["record", "friend", "reading", "--at", "2022-10-01T07:01:00-07:00"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Archive already exists"));

    assert_eq!(row_count(&dir.path().join("focus.csv")), 3);
    dir.child("focus_2022_09.csv").assert("older\n");
    dir.child("summary_2022_09.csv").assert(predicate::path::missing());
}

#[test]
fn malformed_stored_timestamp_fails() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("focuslog.toml").write_str(&config("local_offset", "always")).unwrap();
    dir.child("focus.csv").write_str("mr bear,last tuesday,hi\n").unwrap();

    focuslog()
        .current_dir(dir.path())
        .args(["record", "friend", "reading", "--at", "2022-10-01T07:01:00-07:00"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed row 1"));

    assert_eq!(row_count(&dir.path().join("focus.csv")), 1);
}

// ─── Liveness gate ───────────────────────────────────────────────

#[test]
fn offline_stream_records_nothing() {
    let dir = seeded_project("local_offset", "never");

    focuslog()
        .current_dir(dir.path())
        .args(["record", "friend", "reading", "--at", "2022-10-01T07:01:00-07:00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("offline"));

    assert_eq!(row_count(&dir.path().join("focus.csv")), 3);
    dir.child("focus_2022_09.csv").assert(predicate::path::missing());
}

#[test]
fn twitch_mode_requires_credentials() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("focuslog.toml")
        .write_str("[live]\nmode = \"twitch\"\n\n[twitch]\nchannel = \"bedtimebear_808\"\n")
        .unwrap();

    focuslog()
        .current_dir(dir.path())
        .env_remove("ACCESS_TOKEN")
        .env_remove("CLIENT_ID")
        .args(["record", "friend", "reading"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ACCESS_TOKEN is not set"));

    dir.child("focus.csv").assert(predicate::path::missing());
}

// ─── Format ──────────────────────────────────────────────────────

#[test]
fn quoting_survives_in_stored_row() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("focuslog.toml").write_str(&config("local_offset", "always")).unwrap();

    focuslog()
        .current_dir(dir.path())
        .args([
            "record",
            "bear",
            "chapter 3, \"the hard one\"",
            "--at",
            "2022-10-05T10:00:00-07:00",
        ])
        .assert()
        .success();

    dir.child("focus.csv").assert(
        "bear,2022-10-05T10:00:00-07:00,\"chapter 3, \"\"the hard one\"\"\"\n",
    );
}

#[test]
fn invalid_timestamp_is_rejected() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("focuslog.toml").write_str(&config("local_offset", "always")).unwrap();

    focuslog()
        .current_dir(dir.path())
        .args(["record", "bear", "reading", "--at", "tomorrow"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid timestamp"));

    dir.child("focus.csv").assert(predicate::path::missing());
}
