//! Integration test: the `unb` binary
//!
//! Runs the compiled binary inside temporary project directories.

use std::{fs, path::Path, process::Command};

use assert_cmd::prelude::*;
use tempfile::tempdir;

fn unb(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("unb"));
    cmd.current_dir(dir).env_remove("UNB_LOG");
    cmd
}

fn stdout(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).unwrap()
}

/// Test: running without arguments prints the command listing and succeeds
#[test]
fn test_no_args_shows_help() {
    let dir = tempdir().unwrap();
    let text = stdout(&mut unb(dir.path()));
    assert!(text.contains("Project management utilities."), "{text}");
    for name in ["install-requirements", "version", "bump", "heroku", "dj"] {
        assert!(text.contains(name), "{name} missing from:\n{text}");
    }
}

/// Test: a nested group without arguments prints its own help
#[test]
fn test_nested_group_help() {
    let dir = tempdir().unwrap();
    let text = stdout(unb(dir.path()).arg("dj"));
    assert!(text.contains("unb dj"), "{text}");
    assert!(text.contains("Django commands"), "{text}");
    assert!(text.contains("clear-cache"), "{text}");
}

/// Test: unknown commands are usage errors
#[test]
fn test_unknown_command_exits_with_usage_error() {
    let dir = tempdir().unwrap();
    unb(dir.path()).arg("bogus").assert().failure().code(2);
}

/// Test: `version` prints the version file and `bump` rewrites it
#[test]
fn test_version_and_bump() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("unb.toml"), "").unwrap();
    fs::write(dir.path().join("VERSION"), "1.2.3\n").unwrap();

    assert_eq!(stdout(unb(dir.path()).arg("version")), "1.2.3\n");
    assert_eq!(stdout(unb(dir.path()).args(["bump", "minor"])), "1.3.0\n");
    assert_eq!(stdout(unb(dir.path()).arg("bump")), "1.3.1\n");
    assert_eq!(
        fs::read_to_string(dir.path().join("VERSION")).unwrap(),
        "1.3.1\n"
    );

    unb(dir.path())
        .args(["bump", "micro"])
        .assert()
        .failure()
        .code(2);
}

/// Test: the project is found from a subdirectory
#[test]
fn test_project_found_from_subdirectory() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("unb.toml"), "version_file = \"VERSION.txt\"\n").unwrap();
    fs::write(dir.path().join("VERSION.txt"), "0.4.0\n").unwrap();
    let nested = dir.path().join("src").join("app");
    fs::create_dir_all(&nested).unwrap();

    assert_eq!(stdout(unb(&nested).arg("version")), "0.4.0\n");
}

/// Test: `b` without scripts reports and succeeds
#[test]
fn test_build_without_scripts() {
    let dir = tempdir().unwrap();
    unb(dir.path()).arg("b").assert().success();
}

/// Test: `b <name>` runs the named script with extra arguments
#[cfg(unix)]
#[test]
fn test_build_runs_named_script() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("unb.toml"),
        "[scripts]\ngreet = \"echo hello\"\nfail = \"sh -c 'exit 4'\"\n",
    )
    .unwrap();

    assert_eq!(
        stdout(unb(dir.path()).args(["b", "greet", "world", "--loud"])),
        "hello world --loud\n"
    );
    unb(dir.path())
        .args(["b", "fail"])
        .assert()
        .failure()
        .code(4);
}

/// Test: a malformed config is reported as an initialization failure
#[test]
fn test_malformed_config_fails() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("unb.toml"), "scripts = 3\n").unwrap();
    let output = unb(dir.path()).arg("lint").assert().failure().code(1);
    let stderr = String::from_utf8(output.get_output().stderr.clone()).unwrap();
    assert!(stderr.contains("initialization failed"), "{stderr}");
}

/// Test: Django commands outside a Django project do nothing
#[test]
fn test_django_outside_project() {
    let dir = tempdir().unwrap();
    let text = stdout(unb(dir.path()).args(["dj", "migrate"]));
    assert!(
        text.contains("Not in a Django project. Did not run command: makemigrations migrate"),
        "{text}"
    );
}
