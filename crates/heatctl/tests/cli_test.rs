//! Integration tests for the `heatctl` binary.
//!
//! Argument parsing, help output, completions and config handling run
//! without a device; the device commands run against a wiremock heater.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `heatctl` binary with env isolation.
///
/// Clears all `HEATCTL_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn heatctl_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("heatctl");
    cmd.env("HOME", "/tmp/heatctl-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/heatctl-cli-test-nonexistent")
        .env_remove("HEATCTL_PROFILE")
        .env_remove("HEATCTL_HOST")
        .env_remove("HEATCTL_CONFIG")
        .env_remove("HEATCTL_OUTPUT")
        .env_remove("HEATCTL_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// Same as [`heatctl_cmd`], reading and writing `config`.
fn heatctl_with_config(config: &Path) -> assert_cmd::Command {
    let mut cmd = heatctl_cmd();
    cmd.env("HEATCTL_CONFIG", config);
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn api_path(suffix: &str) -> String {
    format!("/21control/{suffix}")
}

/// Mount a running heater answering every read endpoint.
async fn mount_heater(server: &MockServer) {
    let text = [
        ("heater/status/fan", "2150"),
        ("heater/powerTarget", "2"),
        ("heater/powerTarget/watt", "1200W"),
        ("heater/status/temperature", "41.46"),
    ];
    for (endpoint, body) in text {
        Mock::given(method("GET"))
            .and(path(api_path(endpoint)))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }

    let json_bodies = [
        (
            "status/system",
            json!({
                "model": "Heater S1",
                "isPaired": true,
                "productId": "HX-0042",
                "version": "2.1.0"
            }),
        ),
        ("status", json!({ "operational": true })),
        (
            "heater/status/summary",
            json!({
                "foundBlocks": 0,
                "poolStatus": "Alive",
                "tunerStatus": "Stable",
                "power": { "limitW": 1500, "approxConsumptionW": 1320 },
                "realHashrate": {
                    "mhs5S": 81_000.5, "mhs1M": 80_900.25, "mhs5M": 80_800.0,
                    "mhs15M": 80_700.0, "mhs24H": 80_000.0, "mhsAv": 80_500.0
                }
            }),
        ),
        (
            "heater/networkStatus",
            json!({
                "interface": "wlan0",
                "essid": "MyNet",
                "min_quality": 40,
                "maxQuality": 70,
                "signalLevel": -55
            }),
        ),
        (
            "heater/poolConfig",
            json!({
                "poolUrl1": "pool.example:3333",
                "username1": "worker1",
                "poolUrl2": "",
                "username2": ""
            }),
        ),
    ];
    for (endpoint, body) in json_bodies {
        Mock::given(method("GET"))
            .and(path(api_path(endpoint)))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }
}

/// Run the binary off the async runtime so the mock server keeps serving.
async fn run(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = heatctl_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    heatctl_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("21energy")
            .and(predicate::str::contains("status"))
            .and(predicate::str::contains("watch"))
            .and(predicate::str::contains("power")),
    );
}

#[test]
fn test_version_flag() {
    heatctl_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("heatctl"));
}

#[test]
fn test_completions_bash() {
    heatctl_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("heatctl"));
}

#[test]
fn test_unknown_output_format_is_usage_error() {
    heatctl_cmd()
        .args(["--output", "xml", "status"])
        .assert()
        .code(2);
}

// ── Validation ──────────────────────────────────────────────────────

#[test]
fn test_power_out_of_range_is_usage_error() {
    // Validation happens before any request, so the host is never contacted.
    let output = heatctl_cmd()
        .args(["--host", "127.0.0.1:9", "power", "7"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("power target"));

    let output = heatctl_cmd()
        .args(["--host", "127.0.0.1:9", "power", "-1"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_device_command_without_config_explains_setup() {
    let output = heatctl_cmd().arg("status").output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(combined_output(&output).contains("config init"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_honours_override() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("heatctl.toml");

    heatctl_with_config(&config)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("heatctl.toml"));
}

#[test]
fn test_config_init_then_show() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");

    heatctl_with_config(&config)
        .args(["config", "init", "--host", "192.168.1.40", "--poll-interval", "15"])
        .assert()
        .success();
    assert!(config.exists());

    heatctl_with_config(&config)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("192.168.1.40")
                .and(predicate::str::contains("poll_interval = 15")),
        );

    // A second init with the same name needs --force.
    heatctl_with_config(&config)
        .args(["config", "init", "--host", "10.0.0.9"])
        .assert()
        .code(2);
    heatctl_with_config(&config)
        .args(["config", "init", "--host", "10.0.0.9", "--force"])
        .assert()
        .success();
}

#[test]
fn test_config_use_unknown_profile_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");

    heatctl_with_config(&config)
        .args(["config", "use", "attic"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("attic"));
}

// ── Device commands ─────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_status_json_against_device() {
    let server = MockServer::start().await;
    mount_heater(&server).await;

    let mut cmd = heatctl_cmd();
    cmd.args(["--host", &server.uri(), "-o", "json", "status", "--all"]);
    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["health"], "healthy");
    assert_eq!(report["running"], true);

    let fields = report["fields"].as_array().unwrap();
    let field = |key: &str| fields.iter().find(|f| f["key"] == key).unwrap().clone();
    assert_eq!(field("network_name")["value"], "MyNet");
    assert_eq!(field("network_quality")["value"], "40/70");
    assert_eq!(field("pool_1")["value"], "worker1\npool.example:3333");
    assert_eq!(field("status_temperature")["entity_id"], "HX-0042_status_temperature");
    assert_eq!(field("hashrate_av")["available"], true);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_status_plain_hides_advanced_fields() {
    let server = MockServer::start().await;
    mount_heater(&server).await;

    let mut cmd = heatctl_cmd();
    cmd.args(["--host", &server.uri(), "-o", "plain", "status"]);
    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("status_temperature=41.5 °C"), "{stdout}");
    assert!(stdout.contains("powertarget_watt=1200 W"), "{stdout}");
    assert!(!stdout.contains("hashrate_av="), "{stdout}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_info_prints_identity() {
    let server = MockServer::start().await;
    mount_heater(&server).await;

    let mut cmd = heatctl_cmd();
    cmd.args(["--host", &server.uri(), "info"]);
    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("21energy Heater S1"), "{stdout}");
    assert!(stdout.contains("HX-0042"), "{stdout}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_credentials_exit_with_auth_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let mut cmd = heatctl_cmd();
    cmd.args(["--host", &server.uri(), "status"]);
    let output = run(cmd).await;
    assert_eq!(output.status.code(), Some(3), "{}", combined_output(&output));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_endpoint_exits_with_unsupported_code() {
    let server = MockServer::start().await;
    mount_heater(&server).await;
    Mock::given(method("GET"))
        .and(path(api_path("heater/poolConfig")))
        .respond_with(ResponseTemplate::new(404))
        .with_priority(1)
        .mount(&server)
        .await;

    let mut cmd = heatctl_cmd();
    cmd.args(["--host", &server.uri(), "status"]);
    let output = run(cmd).await;
    assert_eq!(output.status.code(), Some(4), "{}", combined_output(&output));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_disable_posts_flag() {
    let server = MockServer::start().await;
    mount_heater(&server).await;
    Mock::given(method("POST"))
        .and(path(api_path("heater/enable")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = heatctl_cmd();
    cmd.args(["--host", &server.uri(), "disable"]);
    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(combined_output(&output).contains("Heater disabled"));
}
