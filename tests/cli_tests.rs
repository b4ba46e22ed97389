//! CLI integration tests.

mod support;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;

use support::{write_config, VALID_CONFIG};

/// Binary under test, isolated from any ambient `.env` and credentials.
fn yieldsweep(dir: &std::path::Path) -> Command {
    let mut cmd = cargo_bin_cmd!("yieldsweep");
    cmd.current_dir(dir)
        .env_remove("BINANCE_API_KEY")
        .env_remove("BINANCE_API_SECRET");
    cmd
}

#[test]
fn test_help() {
    let dir = tempfile::tempdir().unwrap();
    yieldsweep(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("balances"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_version() {
    let dir = tempfile::tempdir().unwrap();
    yieldsweep(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("yieldsweep"));
}

#[test]
fn config_validate_accepts_valid_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), VALID_CONFIG);

    yieldsweep(dir.path())
        .args(["config", "validate", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Config file is valid"));
}

#[test]
fn config_validate_reports_invalid_field() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        "[allocation]\ntracked_currencies = [\"FDUSD\"]\nbase_currency = \"USDT\"\n",
    );

    yieldsweep(dir.path())
        .args(["config", "validate", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("allocation.base_currency"));
}

#[test]
fn json_failure_is_a_single_document_on_stdout() {
    let dir = tempfile::tempdir().unwrap();

    let output = yieldsweep(dir.path())
        .args(["--json", "config", "validate", "--config", "absent.toml"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["success"], false);
    assert!(value["error"]
        .as_str()
        .is_some_and(|message| message.contains("failed to read config file")));
}

#[test]
fn json_validate_success_payload() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), VALID_CONFIG);

    let output = yieldsweep(dir.path())
        .args(["--json", "config", "validate", "--config"])
        .arg(&path)
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["success"], true);
}

#[test]
fn config_init_writes_template_and_refuses_overwrite() {
    let dir = tempfile::tempdir().unwrap();

    yieldsweep(dir.path())
        .args(["config", "init", "generated.toml"])
        .assert()
        .success();
    let written = std::fs::read_to_string(dir.path().join("generated.toml")).unwrap();
    assert!(written.contains("[allocation]"));

    yieldsweep(dir.path())
        .args(["config", "init", "generated.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    yieldsweep(dir.path())
        .args(["config", "init", "generated.toml", "--force"])
        .assert()
        .success();
}

#[test]
fn config_show_reports_missing_credentials() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), VALID_CONFIG);

    let output = yieldsweep(dir.path())
        .args(["--json", "config", "show", "--config"])
        .arg(&path)
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["allocation"]["base_currency"], "USDT");
    assert_eq!(value["exchange"]["credentials_loaded"], false);
}

#[test]
fn run_without_credentials_fails_before_touching_the_exchange() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), VALID_CONFIG);

    let output = yieldsweep(dir.path())
        .args(["--json", "run", "--config"])
        .arg(&path)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["success"], false);
    assert!(value["error"]
        .as_str()
        .is_some_and(|message| message.contains("BINANCE_API_KEY")));
}

#[test]
fn locked_flags_conflict() {
    let dir = tempfile::tempdir().unwrap();
    yieldsweep(dir.path())
        .args(["plan", "--locked", "--no-locked"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}
