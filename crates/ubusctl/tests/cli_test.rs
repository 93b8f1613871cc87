//! Integration tests for the `ubusctl` CLI binary.
//!
//! Argument parsing, help output, shell completions and error handling run
//! without a router. A few tests drive the binary against a mocked ubus
//! bridge to check the end-to-end path.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use wiremock::matchers::method;
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `ubusctl` binary with env isolation.
///
/// Clears all `UBUSCTL_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn ubusctl_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("ubusctl");
    cmd.env("HOME", "/tmp/ubusctl-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/ubusctl-cli-test-nonexistent")
        .env_remove("UBUSCTL_PROFILE")
        .env_remove("UBUSCTL_HOST")
        .env_remove("UBUSCTL_USERNAME")
        .env_remove("UBUSCTL_PASSWORD")
        .env_remove("UBUSCTL_OUTPUT")
        .env_remove("UBUSCTL_INSECURE")
        .env_remove("UBUSCTL_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

struct UbusCall(&'static str, &'static str);

impl Match for UbusCall {
    fn matches(&self, request: &Request) -> bool {
        serde_json::from_slice::<Value>(&request.body)
            .is_ok_and(|body| body["params"][1] == self.0 && body["params"][2] == self.1)
    }
}

fn ok(payload: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "result": [0, payload],
    }))
}

/// A router that answers login and the system calls; everything else is an
/// unknown object, which the refresh cycle tolerates.
async fn mock_router() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(UbusCall("session", "login"))
        .respond_with(ok(json!({ "ubus_rpc_session": "tok" })))
        .mount(&server)
        .await;
    Mock::given(UbusCall("system", "board"))
        .respond_with(ok(json!({
            "hostname": "gw",
            "model": "Linksys E8450",
            "kernel": "5.15.167",
        })))
        .mount(&server)
        .await;
    Mock::given(UbusCall("system", "info"))
        .respond_with(ok(json!({ "uptime": 7200, "load": [0, 0, 0] })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": -32000, "message": "Object not found" },
        })))
        .with_priority(10)
        .mount(&server)
        .await;
    server
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = ubusctl_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    ubusctl_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("OpenWrt")
            .and(predicate::str::contains("devices"))
            .and(predicate::str::contains("services"))
            .and(predicate::str::contains("kick")),
    );
}

#[test]
fn test_version_flag() {
    ubusctl_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ubusctl"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    ubusctl_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    ubusctl_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = ubusctl_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success(), "Expected failure for invalid subcommand");
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_devices_list_without_config() {
    ubusctl_cmd()
        .args(["devices", "list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("config"));
}

#[test]
fn test_unknown_profile() {
    ubusctl_cmd()
        .args(["--profile", "attic", "status"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("attic"));
}

#[test]
fn test_invalid_output_format() {
    let output = ubusctl_cmd()
        .args(["--output", "invalid", "devices", "list"])
        .output()
        .unwrap();
    assert!(!output.status.success(), "Expected failure for invalid output format");
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("possible values"),
        "Expected error about valid output formats:\n{text}"
    );
}

#[test]
fn test_unmanaged_service_is_rejected_offline() {
    // Rejected before any request, so the unreachable host never matters.
    ubusctl_cmd()
        .args([
            "--host",
            "http://127.0.0.1:9",
            "--password",
            "x",
            "services",
            "restart",
            "dnsmasq",
        ])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("dnsmasq"));
}

#[test]
fn test_unreachable_router_exits_with_connection_code() {
    ubusctl_cmd()
        .args(["--host", "127.0.0.1:1", "--password", "x", "--timeout", "5", "status"])
        .assert()
        .code(7)
        .stderr(predicate::str::contains("Could not reach router"));
}

// ── Config commands ─────────────────────────────────────────────────

#[test]
fn test_config_show_no_config() {
    ubusctl_cmd().args(["config", "show"]).assert().success();
}

#[test]
fn test_config_path() {
    ubusctl_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_use_unknown_profile() {
    ubusctl_cmd()
        .args(["config", "use", "nowhere"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("nowhere"));
}

#[test]
fn test_config_set_then_show() {
    let home = tempfile::tempdir().unwrap();
    let run = |args: &[&str]| {
        let mut cmd = ubusctl_cmd();
        cmd.env("HOME", home.path())
            .env("XDG_CONFIG_HOME", home.path())
            .args(args);
        cmd
    };

    run(&["config", "set", "host", "192.168.8.1"]).assert().success();
    run(&["config", "set", "managed_services", "dnsmasq,firewall"])
        .assert()
        .success();
    run(&["config", "set", "wireless_backend", "bogus"])
        .assert()
        .code(2);

    run(&["config", "show", "-o", "json"]).assert().success().stdout(
        predicate::str::contains("192.168.8.1").and(predicate::str::contains("firewall")),
    );
    run(&["config", "profiles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default *"));
}

// ── Subcommand help discovery ───────────────────────────────────────

#[test]
fn test_services_subcommands_exist() {
    ubusctl_cmd()
        .args(["services", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("list")
                .and(predicate::str::contains("available"))
                .and(predicate::str::contains("start"))
                .and(predicate::str::contains("stop"))
                .and(predicate::str::contains("restart")),
        );
}

#[test]
fn test_config_subcommands_exist() {
    ubusctl_cmd()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("init")
                .and(predicate::str::contains("show"))
                .and(predicate::str::contains("profiles"))
                .and(predicate::str::contains("set-password")),
        );
}

// ── Against a mocked router ─────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_status_json_against_mock_router() {
    let server = mock_router().await;

    ubusctl_cmd()
        .args(["--host", &server.uri(), "--password", "x", "-o", "json", "status"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("\"hostname\": \"gw\"")
                .and(predicate::str::contains("Linksys E8450")),
        );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_login_exits_with_auth_code() {
    let server = MockServer::start().await;
    Mock::given(UbusCall("session", "login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": [6],
            })),
        )
        .mount(&server)
        .await;

    ubusctl_cmd()
        .args(["--host", &server.uri(), "--password", "wrong", "status"])
        .assert()
        .code(3);
}
