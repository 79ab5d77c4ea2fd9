//! Integration tests for the `fass` CLI binary.
//!
//! Settings go to a temp directory; hub-bound commands run against a
//! wiremock hub.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `fass` binary with env isolation.
fn fass_cmd(data_dir: &std::path::Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("fass");
    cmd.env("HOME", "/tmp/fass-cli-test-nonexistent")
        .env("XDG_DATA_HOME", "/tmp/fass-cli-test-nonexistent")
        .env("NO_COLOR", "1")
        .env("FASS_DATA_DIR", data_dir)
        .env_remove("FASS_URL")
        .env_remove("FASS_TOKEN")
        .env_remove("FASS_CA_CERT")
        .env_remove("RUST_LOG");
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

async fn mock_hub() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "API running."})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/states"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"entity_id": "light.kitchen", "state": "on",
             "attributes": {"friendly_name": "Kitchen"}},
            {"entity_id": "switch.fan", "state": "off", "attributes": {}},
            {"entity_id": "light.porch", "state": "unavailable", "attributes": {}}
        ])))
        .mount(&server)
        .await;
    server
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let dir = tempfile::tempdir().unwrap();
    let output = fass_cmd(dir.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_flag() {
    let dir = tempfile::tempdir().unwrap();
    fass_cmd(dir.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("lights and switches")
            .and(predicate::str::contains("list"))
            .and(predicate::str::contains("toggle"))
            .and(predicate::str::contains("config")),
    );
}

#[test]
fn test_version_flag() {
    let dir = tempfile::tempdir().unwrap();
    fass_cmd(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("fass"));
}

#[test]
fn test_invalid_output_format() {
    let dir = tempfile::tempdir().unwrap();
    fass_cmd(dir.path())
        .args(["list", "-o", "yaml"])
        .assert()
        .code(2);
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_follows_data_dir() {
    let dir = tempfile::tempdir().unwrap();
    fass_cmd(dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(dir.path().to_string_lossy().as_ref()));
}

#[test]
fn test_config_set_writes_every_key() {
    let dir = tempfile::tempdir().unwrap();
    fass_cmd(dir.path())
        .args(["config", "set", "--url", "https://hub.local", "--token", "abc"])
        .assert()
        .success();

    assert_eq!(
        std::fs::read_to_string(dir.path().join("haurl")).unwrap(),
        "https://hub.local"
    );
    assert_eq!(std::fs::read_to_string(dir.path().join("hatoken")).unwrap(), "abc");
    assert_eq!(std::fs::read_to_string(dir.path().join("haCAcert")).unwrap(), "");
}

#[test]
fn test_config_set_token_from_stdin() {
    let dir = tempfile::tempdir().unwrap();
    fass_cmd(dir.path())
        .args(["config", "set", "--token-stdin"])
        .write_stdin("piped-token\n")
        .assert()
        .success();

    assert_eq!(
        std::fs::read_to_string(dir.path().join("hatoken")).unwrap(),
        "piped-token"
    );
}

#[test]
fn test_config_show_redacts_token() {
    let dir = tempfile::tempdir().unwrap();
    fass_cmd(dir.path())
        .args(["config", "set", "--url", "https://hub.local", "--token", "sekrit"])
        .assert()
        .success();

    fass_cmd(dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("https://hub.local")
                .and(predicate::str::contains("****"))
                .and(predicate::str::contains("sekrit").not()),
        );
}

#[test]
fn test_config_set_without_flags_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    fass_cmd(dir.path())
        .args(["config", "set"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("nothing to change"));
}

#[test]
fn test_clear_ca_cert_conflicts_with_ca_cert() {
    let dir = tempfile::tempdir().unwrap();
    fass_cmd(dir.path())
        .args(["config", "set", "--ca-cert", "ca.pem", "--clear-ca-cert"])
        .assert()
        .code(2);
}

// ── Hub-bound commands ──────────────────────────────────────────────

#[test]
fn test_list_unconfigured() {
    let dir = tempfile::tempdir().unwrap();
    let output = fass_cmd(dir.path()).arg("list").output().unwrap();
    assert_eq!(output.status.code(), Some(6));
    assert!(combined_output(&output).contains("Not configured"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_json_shows_binary_entities_only() {
    let server = mock_hub().await;
    let dir = tempfile::tempdir().unwrap();

    let output = fass_cmd(dir.path())
        .env("FASS_URL", server.uri())
        .env("FASS_TOKEN", "abc")
        .args(["list", "-o", "json"])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    let cards: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let cards = cards.as_array().unwrap();
    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0]["entity_id"], "light.kitchen");
    assert_eq!(cards[0]["display_name"], "Kitchen");
    assert_eq!(cards[0]["is_on"], true);
    assert_eq!(cards[1]["entity_id"], "switch.fan");
    assert_eq!(cards[1]["is_on"], false);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_domain_filter() {
    let server = mock_hub().await;
    let dir = tempfile::tempdir().unwrap();

    fass_cmd(dir.path())
        .env("FASS_URL", server.uri())
        .env("FASS_TOKEN", "abc")
        .args(["list", "--domain", "switch"])
        .assert()
        .success()
        .stdout(predicate::str::contains("switch.fan").and(predicate::str::contains("light.kitchen").not()));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_off_sends_turn_off() {
    let server = mock_hub().await;
    Mock::given(method("GET"))
        .and(path("/api/states/light.kitchen"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"entity_id": "light.kitchen", "state": "on", "attributes": {}}),
        ))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/services/light/turn_off"))
        .and(body_json(json!({"entity_id": "light.kitchen"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();

    fass_cmd(dir.path())
        .env("FASS_URL", server.uri())
        .env("FASS_TOKEN", "abc")
        .args(["off", "light.kitchen"])
        .assert()
        .success()
        .stdout(predicate::str::contains("light.kitchen: turn_off"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_on_missing_entity_is_not_found() {
    let server = mock_hub().await;
    Mock::given(method("GET"))
        .and(path("/api/states/light.gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();

    fass_cmd(dir.path())
        .env("FASS_URL", server.uri())
        .env("FASS_TOKEN", "abc")
        .args(["on", "light.gone"])
        .assert()
        .code(4);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_token_exits_with_auth_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();

    fass_cmd(dir.path())
        .env("FASS_URL", server.uri())
        .env("FASS_TOKEN", "wrong")
        .arg("check")
        .assert()
        .code(3);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_malformed_ca_warns_but_works() {
    let server = mock_hub().await;
    let dir = tempfile::tempdir().unwrap();

    fass_cmd(dir.path())
        .env("FASS_URL", server.uri())
        .env("FASS_TOKEN", "abc")
        .env("FASS_CA_CERT", "garbage")
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("Lights:   1"))
        .stderr(predicate::str::contains("warning:"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_check_reports_reachable_hub_with_failing_states() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "API running."})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/states"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();

    fass_cmd(dir.path())
        .env("FASS_URL", server.uri())
        .env("FASS_TOKEN", "abc")
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("(reachable)").and(predicate::str::contains("Lights:   -")))
        .stderr(predicate::str::contains("could not be loaded"));

    fass_cmd(dir.path())
        .env("FASS_URL", server.uri())
        .env("FASS_TOKEN", "abc")
        .arg("list")
        .assert()
        .failure();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_numeric_env_token_is_accepted() {
    let server = mock_hub().await;
    let dir = tempfile::tempdir().unwrap();

    fass_cmd(dir.path())
        .env("FASS_URL", server.uri())
        .env("FASS_TOKEN", "1234567890")
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("Lights:   1"));
}
