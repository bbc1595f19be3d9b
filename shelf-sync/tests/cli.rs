use assert_cmd::Command;
use predicates::prelude::*;
use std::fs::write;
use tempfile::tempdir;

#[test]
fn help_lists_subcommands() {
    let mut cmd = Command::cargo_bin("shelf-sync").expect("Binary exists");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("watch").and(predicate::str::contains("once")));
}

#[test]
fn missing_config_file_fails() {
    let dir = tempdir().unwrap();
    let mut cmd = Command::cargo_bin("shelf-sync").expect("Binary exists");
    cmd.current_dir(dir.path())
        .arg("once")
        .arg("--config")
        .arg(dir.path().join("absent.yaml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}

#[test]
fn missing_credentials_fail_before_any_request() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("sync.yaml");
    write(
        &config,
        format!(
            "sync:\n  watch_folder: {}\n  store:\n    customer_code: eastwest\n    store_code: teststore\napi:\n  base_url: http://127.0.0.1:1\n",
            dir.path().join("incoming").display()
        ),
    )
    .expect("Writing temp config failed");

    let mut cmd = Command::cargo_bin("shelf-sync").expect("Binary exists");
    cmd.current_dir(dir.path())
        .env_remove("ESL_BASIC_USER")
        .env_remove("ESL_BASIC_PASSWORD")
        .arg("once")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("ESL_BASIC_USER"));
}
