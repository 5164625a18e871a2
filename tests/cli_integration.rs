//! Integration tests for the Cerbero CLI.
//!
//! These tests run the binary end-to-end using `assert_cmd`.  The master
//! password is supplied through `CERBERO_PASSWORD` so no test ever waits
//! on an interactive prompt.

use assert_cmd::Command;
use assert_fs::TempDir;
use predicates::prelude::*;

const MASTER: &str = "longenough1";

/// Helper: a `cerbero` command rooted in `dir`, clipboard off.
fn cerbero(dir: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("cerbero").expect("binary should exist");
    cmd.current_dir(dir.path())
        .env_remove("CERBERO_VAULT_DIR")
        .env_remove("CERBERO_LOG")
        .env("CERBERO_PASSWORD", MASTER)
        .arg("--no-clipboard")
        .arg("--vault-dir")
        .arg(dir.path());
    cmd
}

fn set_up(dir: &TempDir) {
    cerbero(dir).arg("setup").assert().success();
}

#[test]
fn help_flag_lists_commands() {
    let tmp = TempDir::new().unwrap();
    cerbero(&tmp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Local encrypted password manager"))
        .stdout(predicate::str::contains("setup"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("get"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("delete"))
        .stdout(predicate::str::contains("shell"));
}

#[test]
fn version_flag_shows_version() {
    let tmp = TempDir::new().unwrap();
    cerbero(&tmp)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cerbero"));
}

#[test]
fn get_on_missing_vault_fails() {
    let tmp = TempDir::new().unwrap();
    cerbero(&tmp)
        .args(["get", "gmail"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not configured"));
}

#[test]
fn setup_creates_salt_and_vault() {
    let tmp = TempDir::new().unwrap();
    set_up(&tmp);

    let salt = std::fs::read(tmp.path().join("salt.key")).unwrap();
    assert_eq!(salt.len(), 16);
    assert!(tmp.path().join("vault.enc").exists());
}

#[test]
fn setup_rejects_short_master_password() {
    let tmp = TempDir::new().unwrap();
    cerbero(&tmp)
        .env("CERBERO_PASSWORD", "short")
        .arg("setup")
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 8"));
    assert!(!tmp.path().join("vault.enc").exists());
}

#[test]
fn add_get_list_delete_flow() {
    let tmp = TempDir::new().unwrap();
    set_up(&tmp);

    cerbero(&tmp)
        .args(["add", "example.com", "alice", "p@ss", "home"])
        .assert()
        .success()
        .stdout(predicate::str::contains("added"));

    cerbero(&tmp)
        .args(["get", "example.com", "home", "--show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alice"))
        .stdout(predicate::str::contains("p@ss"));

    cerbero(&tmp)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("example.com"))
        .stdout(predicate::str::contains("home"))
        .stdout(predicate::str::contains("p@ss").not());

    cerbero(&tmp)
        .args(["delete", "example.com", "--force"])
        .assert()
        .success();

    cerbero(&tmp)
        .args(["get", "example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No credential found"));
}

#[test]
fn wrong_password_is_rejected() {
    let tmp = TempDir::new().unwrap();
    set_up(&tmp);
    let before = std::fs::read(tmp.path().join("vault.enc")).unwrap();

    cerbero(&tmp)
        .env("CERBERO_PASSWORD", "notthepassword")
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Incorrect password"));

    assert_eq!(std::fs::read(tmp.path().join("vault.enc")).unwrap(), before);
}

#[test]
fn config_file_renames_vault_files() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join(".cerbero.toml"),
        "salt_file = \"my.salt\"\nvault_file = \"my.vault\"\n",
    )
    .unwrap();
    set_up(&tmp);

    assert!(tmp.path().join("my.salt").exists());
    assert!(tmp.path().join("my.vault").exists());
    assert!(!tmp.path().join("vault.enc").exists());
}
