//! Integration tests for the `protect` CLI binary.
//!
//! Argument parsing, completions, and config errors run without a network.
//! Vendor-facing commands run against a wiremock server configured through
//! a temporary config file.
#![allow(clippy::unwrap_used)]

use std::io::Write;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `protect` binary with env isolation.
///
/// Clears all `PROTECT_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn protect_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("protect");
    cmd.env("HOME", "/tmp/protect-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/protect-cli-test-nonexistent")
        .env_remove("PROTECT_CONFIG")
        .env_remove("PROTECT_OUTPUT")
        .env_remove("PROTECT_USERNAME")
        .env_remove("PROTECT_PASSWORD")
        .env_remove("PROTECT_NAME")
        .env_remove("PROTECT_SITE_ID")
        .env_remove("PROTECT_LOG_USER_CHANGES")
        .env_remove("PROTECT_AUTH_URL")
        .env_remove("PROTECT_API_URL")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn mock_config(server: &MockServer) -> tempfile::NamedTempFile {
    write_config(&format!(
        r#"
name = "Alarm"
username = "user@example.com"
password = "hunter2"
authUrl = "{uri}/oauth/oauth"
apiUrl = "{uri}"
"#,
        uri = server.uri()
    ))
}

async fn mock_vendor() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/oauth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "a1",
            "token_type": "Bearer",
            "expires_in": 3600,
            "refresh_token": "r1"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/client/site"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "site_id": "A", "label": "Home" },
            { "site_id": "B", "label": "Cabin" }
        ])))
        .mount(&server)
        .await;
    server
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = protect_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_lists_commands() {
    protect_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("status")
            .and(predicate::str::contains("set"))
            .and(predicate::str::contains("history"))
            .and(predicate::str::contains("check")),
    );
}

#[test]
fn test_completions_zsh() {
    protect_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_target_state() {
    let output = protect_cmd().args(["set", "vacation"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("vacation"));
}

#[test]
fn test_status_without_config_reports_missing_username() {
    let output = protect_cmd().arg("status").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(
        combined_output(&output).contains("username"),
        "unexpected output:\n{}",
        combined_output(&output)
    );
}

#[test]
fn test_invalid_username_is_rejected() {
    let config = write_config("username = \"not-an-email\"\npassword = \"pw\"\n");
    let output = protect_cmd()
        .arg("--config")
        .arg(config.path())
        .arg("status")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("not an email address"));
}

// ── Vendor-facing commands ──────────────────────────────────────────

#[tokio::test]
async fn test_sites_plain_lists_ids() {
    let server = mock_vendor().await;
    let config = mock_config(&server);

    protect_cmd()
        .arg("--config")
        .arg(config.path())
        .args(["--output", "plain", "sites"])
        .assert()
        .success()
        .stdout("A\nB\n");
}

#[tokio::test]
async fn test_status_json_maps_vendor_state() {
    let server = mock_vendor().await;
    Mock::given(method("GET"))
        .and(path("/v2/client/site/B/security"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "partial",
            "last_action": { "user_name": "Alice", "timestamp": "2024-03-01T10:00:00Z" }
        })))
        .mount(&server)
        .await;
    let config = mock_config(&server);

    let output = protect_cmd()
        .arg("--config")
        .arg(config.path())
        .args(["--site", "B", "--output", "json-compact", "status"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));
    let view: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(view["state"], "STAY_ARM");
    assert_eq!(view["vendor_status"], "partial");
    assert_eq!(view["last_action"]["user_name"], "Alice");
}

#[tokio::test]
async fn test_set_night_writes_partial() {
    let server = mock_vendor().await;
    Mock::given(method("PUT"))
        .and(path("/v2/client/site/A/security"))
        .and(body_json(json!({ "status": "partial" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    let config = mock_config(&server);

    protect_cmd()
        .arg("--config")
        .arg(config.path())
        .args(["set", "night"])
        .assert()
        .success()
        .stderr(predicate::str::contains("NIGHT_ARM"));
}

#[tokio::test]
async fn test_set_runs_post_write_attribution_check() {
    let server = mock_vendor().await;
    Mock::given(method("PUT"))
        .and(path("/v2/client/site/A/security"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/client/site/A/history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "timestamp": "2024-03-01T10:00:00Z",
                "type": "alarm_arm",
                "user": { "id": "u1", "name": "Alice" }
            }
        ])))
        .mount(&server)
        .await;
    let config = mock_config(&server);

    protect_cmd()
        .arg("--config")
        .arg(config.path())
        .args(["-v", "set", "away"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Action performed by user: Alice"));

    let history_requests = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.url.path() == "/v2/client/site/A/history")
        .count();
    assert_eq!(history_requests, 1);
}

#[tokio::test]
async fn test_unknown_site_exits_not_found() {
    let server = mock_vendor().await;
    let config = mock_config(&server);

    let output = protect_cmd()
        .arg("--config")
        .arg(config.path())
        .args(["--site", "Z", "status"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("Home (A)"));
}

#[tokio::test]
async fn test_bad_credentials_exit_auth() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/oauth"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid_grant"))
        .mount(&server)
        .await;
    let config = mock_config(&server);

    let output = protect_cmd()
        .arg("--config")
        .arg(config.path())
        .arg("check")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(combined_output(&output).contains("authenticate"));
}

#[tokio::test]
async fn test_check_walks_every_step() {
    let server = mock_vendor().await;
    Mock::given(method("GET"))
        .and(path("/v2/client/site/A/security"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "armed" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/client/site/A/history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "timestamp": "2024-03-01T10:00:00Z",
                "type": "alarm_arm",
                "user": { "id": "u1", "name": "Alice" }
            }
        ])))
        .mount(&server)
        .await;
    let config = mock_config(&server);

    protect_cmd()
        .arg("--config")
        .arg(config.path())
        .args(["--color", "never", "check"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("ok read status: armed (AWAY_ARM)")
                .and(predicate::str::contains("Last change: Alice at 2024-03-01T10:00:00Z")),
        );
}
