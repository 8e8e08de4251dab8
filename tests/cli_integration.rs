//! CLI Integration Tests
//!
//! Tests the command-line interface end-to-end.

use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;

/// Get the binary to test.
fn playrun() -> Command {
    let mut cmd = Command::cargo_bin("playrun").unwrap();
    cmd.env_remove("PLAYRUN_CONFIG").env_remove("RUST_LOG");
    cmd
}

/// Temp project with the default playbook path and an empty config.
fn project() -> assert_fs::TempDir {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("ansible/playbooks/deploy.yml").write_str("- hosts: all\n  tasks: []\n").unwrap();
    temp.child(".playrun.toml").write_str("").unwrap();
    temp
}

// ============================================================================
// Help & Version Tests
// ============================================================================

#[test]
fn test_help_flag() {
    playrun()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Run Ansible deployment playbooks"));
}

#[test]
fn test_version_flag() {
    playrun()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_deploy_help() {
    playrun()
        .args(["deploy", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--extra-var"))
        .stdout(predicate::str::contains("--dry-run"));
}

// ============================================================================
// Missing Playbook Tests
// ============================================================================

#[test]
fn test_missing_default_playbook_exits_1() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child(".playrun.toml").write_str("").unwrap();

    playrun()
        .current_dir(temp.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("playbook not found"));

    temp.close().unwrap();
}

#[cfg(unix)]
#[test]
fn test_missing_playbook_never_launches_tool() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child(".playrun.toml").write_str("").unwrap();
    // `tee absent.yml -i localhost` would create a file named "localhost".
    playrun()
        .current_dir(temp.path())
        .args(["deploy", "--playbook", "absent.yml", "--tool", "tee"])
        .assert()
        .code(1);

    temp.child("localhost").assert(predicate::path::missing());
    temp.close().unwrap();
}

// ============================================================================
// Dry Run Tests
// ============================================================================

#[test]
fn test_dry_run_prints_command_line() {
    let temp = project();

    playrun()
        .current_dir(temp.path())
        .args(["deploy", "--dry-run", "-e", "namespace=test", "-e", "replicas=3"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "ansible-playbook ansible/playbooks/deploy.yml -i localhost -e namespace=test -e replicas=3",
        ));

    temp.close().unwrap();
}

#[test]
fn test_dry_run_json() {
    let temp = project();

    let output = playrun()
        .current_dir(temp.path())
        .args(["deploy", "--dry-run", "--format", "json", "--host", "k8s-nodes"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let tokens: Vec<String> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        tokens,
        ["ansible-playbook", "ansible/playbooks/deploy.yml", "-i", "k8s-nodes"]
    );

    temp.close().unwrap();
}

#[test]
fn test_config_vars_merge_with_cli_vars() {
    let temp = project();
    temp.child(".playrun.toml")
        .write_str("[deploy]\nhost = \"cluster\"\n\n[vars]\nnamespace = \"prod\"\nreplicas = \"2\"\n")
        .unwrap();

    playrun()
        .current_dir(temp.path())
        .args(["deploy", "--dry-run", "-e", "replicas=5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-i cluster -e namespace=prod -e replicas=5"));

    temp.close().unwrap();
}

#[test]
fn test_config_flag_overrides_local_file() {
    let temp = project();
    let other = temp.child("other.toml");
    other.write_str("[deploy]\nhost = \"from-flag\"\n").unwrap();

    playrun()
        .current_dir(temp.path())
        .args(["deploy", "--dry-run", "--config"])
        .arg(other.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("-i from-flag"));

    temp.close().unwrap();
}

// ============================================================================
// Usage Error Tests
// ============================================================================

#[test]
fn test_bad_extra_var_is_usage_error() {
    let temp = project();

    playrun()
        .current_dir(temp.path())
        .args(["deploy", "-e", "novalue"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("expected key=value"));

    temp.close().unwrap();
}

#[test]
fn test_invalid_config_is_usage_error() {
    let temp = project();
    temp.child(".playrun.toml").write_str("[deploy\n").unwrap();

    playrun()
        .current_dir(temp.path())
        .arg("deploy")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid config file"));

    temp.close().unwrap();
}

#[test]
fn test_empty_host_rejected() {
    let temp = project();

    playrun()
        .current_dir(temp.path())
        .args(["deploy", "--host", " "])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("host must not be empty"));

    temp.close().unwrap();
}

// ============================================================================
// Execution Tests (stand-in tools)
// ============================================================================

#[cfg(unix)]
#[test]
fn test_successful_tool_exits_0() {
    let temp = project();

    playrun().current_dir(temp.path()).args(["deploy", "--tool", "true"]).assert().success();

    temp.close().unwrap();
}

#[cfg(unix)]
#[test]
fn test_failing_tool_exit_code_passed_through() {
    let temp = project();

    playrun().current_dir(temp.path()).args(["deploy", "--tool", "false"]).assert().code(1);

    temp.close().unwrap();
}

#[cfg(unix)]
#[test]
fn test_tool_output_forwarded() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child(".playrun.toml").write_str("").unwrap();
    // Run with `sh` as the tool so the "playbook" is a script.
    temp.child("deploy.sh")
        .write_str("echo \"deploying to $2\"\necho 'Playbook failed' >&2\nexit 3\n")
        .unwrap();

    playrun()
        .current_dir(temp.path())
        .args(["deploy", "--tool", "sh", "--playbook", "deploy.sh", "--host", "web"])
        .assert()
        .code(3)
        .stdout(predicate::str::contains("deploying to web"))
        .stderr(predicate::str::contains("Playbook failed"));

    temp.close().unwrap();
}

#[test]
fn test_missing_tool_exits_127() {
    let temp = project();

    playrun()
        .current_dir(temp.path())
        .args(["deploy", "--tool", "playrun-no-such-playbook-runner"])
        .assert()
        .code(127)
        .stderr(predicate::str::contains("not found"));

    temp.close().unwrap();
}

// ============================================================================
// Config & Completions Tests
// ============================================================================

#[test]
fn test_config_shows_defaults() {
    let temp = assert_fs::TempDir::new().unwrap();
    let config = temp.child("playrun.toml");
    config.write_str("[vars]\nnamespace = \"todo-app\"\n").unwrap();

    playrun()
        .args(["config", "--config"])
        .arg(config.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("host = \"localhost\""))
        .stdout(predicate::str::contains("namespace = \"todo-app\""));

    temp.close().unwrap();
}

#[test]
fn test_config_path_flag() {
    playrun()
        .args(["config", "--path", "--config", "/tmp/custom-playrun.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("custom-playrun.toml"));
}

#[test]
fn test_completions_bash() {
    playrun()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("playrun"));
}
