//! Integration tests for the Durin CLI.
//!
//! These tests exercise the binary end-to-end using `assert_cmd`.  The
//! unlock password comes from `DURIN_PASSWORD` and record passwords are
//! piped on stdin, so nothing waits on a terminal prompt.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

const PASSWORD: &str = "correct-horse-battery";

/// Helper: get a Command pointing at the durin binary.
fn durin() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("durin").expect("binary should exist");
    cmd.env_remove("DURIN_DIR").env_remove("DURIN_PASSWORD");
    cmd
}

/// A temp store directory pre-seeded with cheap Argon2 settings.
fn store() -> TempDir {
    let tmp = TempDir::new().unwrap();
    tmp.child("config.toml")
        .write_str("argon2_memory_kib = 8192\nargon2_iterations = 1\nargon2_parallelism = 1\n")
        .unwrap();
    tmp
}

/// A command against `dir`, unlocked with `password`.
fn durin_in(dir: &TempDir, password: &str) -> Command {
    let mut cmd = durin();
    cmd.arg("--dir").arg(dir.path()).env("DURIN_PASSWORD", password);
    cmd
}

#[test]
fn help_flag_shows_usage() {
    durin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Local encrypted password store"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("get"))
        .stdout(predicate::str::contains("put"))
        .stdout(predicate::str::contains("delete"))
        .stdout(predicate::str::contains("passwd"));
}

#[test]
fn version_flag_shows_version() {
    durin()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("durin"));
}

#[test]
fn no_args_shows_help() {
    durin()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn put_list_get_delete_session() {
    let dir = store();

    durin_in(&dir, PASSWORD)
        .args(["put", "github", "--username", "alice"])
        .write_stdin("p1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Record 'github' added"));

    durin_in(&dir, PASSWORD)
        .args(["put", "aws", "-u", "root", "-n", "hardware token"])
        .write_stdin("p2")
        .assert()
        .success();

    durin_in(&dir, PASSWORD)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::eq("aws\ngithub\n"));

    durin_in(&dir, PASSWORD)
        .args(["get", "github", "--show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alice"))
        .stdout(predicate::str::contains("p1"));

    durin_in(&dir, PASSWORD)
        .args(["get", "aws"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hardware token"))
        .stdout(predicate::str::contains("p2").not());

    durin_in(&dir, PASSWORD)
        .args(["delete", "aws", "--force"])
        .assert()
        .success();

    durin_in(&dir, PASSWORD)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::eq("github\n"));
}

#[test]
fn empty_store_lists_nothing_on_stdout() {
    let dir = store();

    durin_in(&dir, PASSWORD)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("No records"));
}

#[test]
fn get_show_prints_password_below_the_table() {
    let dir = store();

    durin_in(&dir, PASSWORD)
        .args(["put", "github", "-u", "alice"])
        .write_stdin("hunter2-secret\n")
        .assert()
        .success();

    durin_in(&dir, PASSWORD)
        .args(["get", "github", "--show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("password: hunter2-secret"))
        .stdout(predicate::str::contains("********").not());
}

#[test]
fn get_missing_record_fails() {
    let dir = store();

    durin_in(&dir, PASSWORD)
        .args(["get", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Record 'missing' not found"));
}

#[test]
fn wrong_password_is_rejected() {
    let dir = store();

    durin_in(&dir, PASSWORD).arg("list").assert().success();

    durin_in(&dir, "not-the-password")
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Authentication failed"));
}

#[test]
fn short_password_cannot_create_a_store() {
    let dir = store();

    durin_in(&dir, "short")
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 8 characters"));

    dir.child("master").assert(predicate::path::missing());
}

#[test]
fn completions_generate_a_script() {
    durin()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("durin"));
}
