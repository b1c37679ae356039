#![allow(clippy::unwrap_used)]
// Integration tests for the token guard, site resolution, and accessory
// facade against a wiremock vendor.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use protect_core::{
    Accessory, AccessoryConfig, CallbackAdapter, CoreError, Endpoints, HostBridge, HostError,
    SecurityState, Session,
};

// ── Helpers ─────────────────────────────────────────────────────────

#[derive(Default)]
struct RecordingHost {
    pushed: Mutex<Vec<SecurityState>>,
}

impl RecordingHost {
    fn pushed(&self) -> Vec<SecurityState> {
        self.pushed.lock().unwrap().clone()
    }
}

impl HostBridge for RecordingHost {
    fn update_current_state(&self, state: SecurityState) {
        self.pushed.lock().unwrap().push(state);
    }
}

fn config(server: &MockServer) -> AccessoryConfig {
    let mut config = AccessoryConfig::new(
        "Alarm",
        "user@example.com",
        SecretString::from("hunter2".to_owned()),
    );
    config.endpoints = Endpoints {
        token_url: Url::parse(&format!("{}/oauth/oauth", server.uri())).unwrap(),
        api_url: Url::parse(&server.uri()).unwrap(),
        client_id: "test-client".into(),
    };
    config.attribution_delay = Duration::from_millis(10);
    config
}

fn token_body(access: &str, refresh: Option<&str>, expires_in: u64) -> serde_json::Value {
    json!({
        "access_token": access,
        "token_type": "Bearer",
        "expires_in": expires_in,
        "refresh_token": refresh,
    })
}

async fn mount_password_grant(server: &MockServer, refresh: Option<&str>, expected: u64) {
    Mock::given(method("POST"))
        .and(path("/oauth/oauth"))
        .and(body_string_contains("grant_type=password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("a1", refresh, 3600)))
        .expect(expected)
        .mount(server)
        .await;
}

async fn mount_sites(server: &MockServer, sites: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/v2/client/site"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sites))
        .mount(server)
        .await;
}

async fn mount_status(server: &MockServer, site_id: &str, status: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/v2/client/site/{site_id}/security")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": status })))
        .mount(server)
        .await;
}

async fn start(config: AccessoryConfig) -> (Accessory, Arc<RecordingHost>) {
    let host = Arc::new(RecordingHost::default());
    let accessory = Accessory::start(config, Arc::clone(&host) as Arc<dyn HostBridge>)
        .await
        .unwrap();
    (accessory, host)
}

// ── Token guard ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_guard_uses_password_grant_without_tokens() {
    let server = MockServer::start().await;
    mount_password_grant(&server, Some("r1"), 1).await;

    let session = Session::new(&config(&server)).unwrap();
    session.authenticate().await.unwrap();
    assert!(session.guard().store().is_valid());

    // A valid token makes the second call a no-op.
    session.authenticate().await.unwrap();
}

#[tokio::test]
async fn test_guard_prefers_refresh_grant_when_refresh_token_stored() {
    let server = MockServer::start().await;
    mount_password_grant(&server, None, 0).await;
    Mock::given(method("POST"))
        .and(path("/oauth/oauth"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=r0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("a2", Some("r2"), 3600)))
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::new(&config(&server)).unwrap();
    // Expired access token with a usable refresh token.
    session.guard().store().set(
        SecretString::from("stale".to_owned()),
        Some(SecretString::from("r0".to_owned())),
        Duration::ZERO,
    ).unwrap();

    session.authenticate().await.unwrap();
    assert!(session.guard().store().is_valid());
}

#[tokio::test]
async fn test_guard_propagates_refresh_failure_without_fallback() {
    let server = MockServer::start().await;
    mount_password_grant(&server, None, 0).await;
    Mock::given(method("POST"))
        .and(path("/oauth/oauth"))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(ResponseTemplate::new(400).set_body_string("invalid_grant"))
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::new(&config(&server)).unwrap();
    session.guard().store().set(
        SecretString::from("stale".to_owned()),
        Some(SecretString::from("r0".to_owned())),
        Duration::ZERO,
    ).unwrap();

    let err = session.authenticate().await.unwrap_err();
    assert!(err.is_authentication(), "got {err:?}");
    assert!(!session.guard().store().is_valid());
}

#[tokio::test]
async fn test_guard_reauthenticates_once_for_concurrent_callers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/oauth"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(token_body("a1", Some("r1"), 3600))
                .set_delay(Duration::from_millis(50)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::new(&config(&server)).unwrap();
    let (a, b, c) = tokio::join!(
        session.authenticate(),
        session.authenticate(),
        session.authenticate()
    );
    a.unwrap();
    b.unwrap();
    c.unwrap();
}

#[tokio::test]
async fn test_token_expires_and_refreshes_after_lifetime() {
    let server = MockServer::start().await;
    mount_password_grant(&server, Some("r1"), 1).await;
    Mock::given(method("POST"))
        .and(path("/oauth/oauth"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=r1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("a2", Some("r2"), 3600)))
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::new(&config(&server)).unwrap();
    session.authenticate().await.unwrap();
    assert!(session.guard().store().is_valid());

    tokio::time::pause();
    tokio::time::advance(Duration::from_secs(3601)).await;
    tokio::time::resume();

    assert!(!session.guard().store().is_valid());
    session.authenticate().await.unwrap();
    assert!(session.guard().store().is_valid());
}

// ── Startup ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_start_selects_first_of_two_sites() {
    let server = MockServer::start().await;
    mount_password_grant(&server, Some("r1"), 1).await;
    mount_sites(
        &server,
        json!([
            { "site_id": "A", "label": "Home" },
            { "site_id": "B", "label": "Cabin" }
        ]),
    )
    .await;

    let (accessory, _host) = start(config(&server)).await;
    assert_eq!(accessory.site().id, "A");
    assert_eq!(accessory.information().serial_number, "SP-001");
    assert_eq!(accessory.name(), "Alarm");
    accessory.shutdown().await;
}

#[tokio::test]
async fn test_start_fails_for_unknown_configured_site() {
    let server = MockServer::start().await;
    mount_password_grant(&server, Some("r1"), 1).await;
    mount_sites(&server, json!([{ "site_id": "A", "label": "Home" }])).await;

    let mut config = config(&server);
    config.site_id = Some("Z".into());
    let host = Arc::new(RecordingHost::default());
    let err = Accessory::start(config, host).await.err().unwrap();
    assert!(matches!(err, CoreError::SiteNotFound { ref site_id, .. } if site_id == "Z"));
}

#[tokio::test]
async fn test_start_fails_on_bad_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/oauth"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid_grant"))
        .mount(&server)
        .await;

    let host = Arc::new(RecordingHost::default());
    let err = Accessory::start(config(&server), host).await.err().unwrap();
    assert!(err.is_authentication());
}

// ── State reads and writes ──────────────────────────────────────────

#[tokio::test]
async fn test_current_state_maps_vendor_status() {
    let server = MockServer::start().await;
    mount_password_grant(&server, Some("r1"), 1).await;
    mount_sites(&server, json!([{ "site_id": "A", "label": "Home" }])).await;
    mount_status(&server, "A", "partial").await;

    let (accessory, _host) = start(config(&server)).await;
    assert_eq!(accessory.current_state().await.unwrap(), SecurityState::StayArm);
    assert_eq!(accessory.target_state().await.unwrap(), SecurityState::StayArm);
    accessory.shutdown().await;
}

#[tokio::test]
async fn test_set_stay_arm_writes_partial_and_pushes_optimistically() {
    let server = MockServer::start().await;
    mount_password_grant(&server, Some("r1"), 1).await;
    mount_sites(&server, json!([{ "site_id": "A", "label": "Home" }])).await;
    Mock::given(method("PUT"))
        .and(path("/v2/client/site/A/security"))
        .and(body_json(json!({ "status": "partial" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/client/site/A/history"))
        .and(query_param("types", "alarm_arm,alarm_disarm,alarm_partial"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let (accessory, host) = start(config(&server)).await;
    accessory
        .set_target_state(SecurityState::StayArm)
        .await
        .unwrap();
    assert_eq!(host.pushed(), vec![SecurityState::StayArm]);

    // Post-write attribution check fires after the configured delay.
    tokio::time::sleep(Duration::from_millis(200)).await;
    let history_calls = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path().ends_with("/history"))
        .count();
    assert_eq!(history_calls, 1);
    accessory.shutdown().await;
}

#[tokio::test]
async fn test_failed_write_pushes_nothing() {
    let server = MockServer::start().await;
    mount_password_grant(&server, Some("r1"), 1).await;
    mount_sites(&server, json!([{ "site_id": "A", "label": "Home" }])).await;
    Mock::given(method("PUT"))
        .and(path("/v2/client/site/A/security"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let (accessory, host) = start(config(&server)).await;
    let err = accessory
        .set_target_state(SecurityState::AwayArm)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Api { status: Some(500), .. }));
    assert!(host.pushed().is_empty());
    accessory.shutdown().await;
}

#[tokio::test]
async fn test_waiting_for_post_write_check_before_shutdown() {
    let server = MockServer::start().await;
    mount_password_grant(&server, Some("r1"), 1).await;
    mount_sites(&server, json!([{ "site_id": "A", "label": "Home" }])).await;
    Mock::given(method("PUT"))
        .and(path("/v2/client/site/A/security"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/client/site/A/history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config(&server);
    config.attribution_delay = Duration::from_millis(100);
    let (accessory, _host) = start(config).await;
    accessory
        .set_target_state(SecurityState::AwayArm)
        .await
        .unwrap();
    accessory.attributor().wait_post_write_checks().await;
    accessory.shutdown().await;

    let history_calls = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path().ends_with("/history"))
        .count();
    assert_eq!(history_calls, 1);
}

#[tokio::test]
async fn test_failed_read_surfaces_api_error_and_pushes_nothing() {
    let server = MockServer::start().await;
    mount_password_grant(&server, Some("r1"), 1).await;
    mount_sites(&server, json!([{ "site_id": "A", "label": "Home" }])).await;
    Mock::given(method("GET"))
        .and(path("/v2/client/site/A/security"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let (accessory, host) = start(config(&server)).await;
    let err = accessory.current_state().await.unwrap_err();
    assert!(
        matches!(err, CoreError::Api { status: Some(500), .. }),
        "got {err:?}"
    );

    let adapter = CallbackAdapter::new(Arc::new(accessory), tokio::runtime::Handle::current());
    let (tx, rx) = tokio::sync::oneshot::channel();
    adapter
        .get_current_state(move |result| {
            let _ = tx.send(result);
        })
        .await
        .unwrap();
    let err = rx.await.unwrap().unwrap_err();
    assert_eq!(err.status, HostError::SERVICE_COMMUNICATION_FAILURE);
    assert!(host.pushed().is_empty());

    adapter.accessory().shutdown().await;
}

// ── Callback adapter ────────────────────────────────────────────────

#[tokio::test]
async fn test_callback_adapter_reports_values_and_failures() {
    let server = MockServer::start().await;
    mount_password_grant(&server, Some("r1"), 1).await;
    mount_sites(&server, json!([{ "site_id": "A", "label": "Home" }])).await;
    mount_status(&server, "A", "armed").await;
    Mock::given(method("PUT"))
        .and(path("/v2/client/site/A/security"))
        .and(body_json(json!({ "status": "disarmed" })))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let (accessory, _host) = start(config(&server)).await;
    let adapter = CallbackAdapter::new(Arc::new(accessory), tokio::runtime::Handle::current());

    let (tx, rx) = tokio::sync::oneshot::channel();
    adapter
        .get_current_state(move |result| {
            let _ = tx.send(result);
        })
        .await
        .unwrap();
    assert_eq!(rx.await.unwrap(), Ok(SecurityState::AwayArm.characteristic_value()));

    // Out-of-range values write "disarmed"; the vendor rejects it here.
    let (tx, rx) = tokio::sync::oneshot::channel();
    adapter
        .set_target_state(9, move |result| {
            let _ = tx.send(result);
        })
        .await
        .unwrap();
    let err = rx.await.unwrap().unwrap_err();
    assert_eq!(err.status, HostError::SERVICE_COMMUNICATION_FAILURE);

    adapter.accessory().shutdown().await;
}

// ── History monitoring ──────────────────────────────────────────────

#[tokio::test]
async fn test_monitoring_loop_publishes_new_attribution_and_stops() {
    let server = MockServer::start().await;
    mount_password_grant(&server, Some("r1"), 1).await;
    mount_sites(&server, json!([{ "site_id": "A", "label": "Home" }])).await;
    Mock::given(method("GET"))
        .and(path("/v2/client/site/A/history"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "timestamp": "2024-03-01T08:00:00Z",
                "type": "alarm_arm",
                "user": { "id": "u1", "name": "Alice" }
            },
            {
                "timestamp": "2024-03-01T09:00:00Z",
                "type": "alarm_disarm",
                "user": { "id": "u2", "name": "Bob" }
            }
        ])))
        .mount(&server)
        .await;

    let mut config = config(&server);
    config.log_user_changes = true;
    config.monitor_interval = Duration::from_millis(20);
    let (accessory, _host) = start(config).await;
    let mut events = accessory.attributor().subscribe();

    let attribution = tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(attribution.actor_name.as_deref(), Some("Bob"));
    assert_eq!(
        accessory.attributor().last_known().unwrap().timestamp,
        "2024-03-01T09:00:00Z"
    );

    // The same timestamp is not announced twice.
    assert!(
        tokio::time::timeout(Duration::from_millis(100), events.recv())
            .await
            .is_err()
    );

    accessory.shutdown().await;
    let before = server.received_requests().await.unwrap().len();
    tokio::time::sleep(Duration::from_millis(100)).await;
    let after = server.received_requests().await.unwrap().len();
    assert_eq!(before, after, "no polling after shutdown");
}

#[tokio::test]
async fn test_history_failures_read_as_unknown() {
    let server = MockServer::start().await;
    mount_password_grant(&server, Some("r1"), 1).await;
    mount_sites(&server, json!([{ "site_id": "A", "label": "Home" }])).await;
    Mock::given(method("GET"))
        .and(path("/v2/client/site/A/history"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (accessory, _host) = start(config(&server)).await;
    assert!(accessory.attributor().last_alarm_action().await.is_none());
    assert!(accessory.attributor().poll_once().await.is_none());
    assert!(accessory.attributor().last_known().is_none());
    accessory.shutdown().await;
}
