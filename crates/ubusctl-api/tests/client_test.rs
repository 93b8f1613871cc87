// Integration tests for `UbusClient` using wiremock.
#![allow(clippy::unwrap_used)]

use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

use ubusctl_api::{Error, SENTINEL_TOKEN, TransportConfig, UbusClient};

// ── Helpers ─────────────────────────────────────────────────────────

/// Matches a ubus `call` envelope by object, method and optionally token
/// and arguments.
struct UbusCall {
    object: &'static str,
    method: &'static str,
    token: Option<&'static str>,
    args: Option<Value>,
}

fn ubus_call(object: &'static str, method: &'static str) -> UbusCall {
    UbusCall {
        object,
        method,
        token: None,
        args: None,
    }
}

impl UbusCall {
    fn with_token(mut self, token: &'static str) -> Self {
        self.token = Some(token);
        self
    }

    fn with_args(mut self, args: Value) -> Self {
        self.args = Some(args);
        self
    }
}

impl Match for UbusCall {
    fn matches(&self, request: &Request) -> bool {
        let Ok(body) = serde_json::from_slice::<Value>(&request.body) else {
            return false;
        };
        let params = &body["params"];
        params[1] == self.object
            && params[2] == self.method
            && self.token.is_none_or(|t| params[0] == t)
            && self.args.as_ref().is_none_or(|a| &params[3] == a)
    }
}

fn ok(payload: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "result": [0, payload],
    }))
}

fn status_only(code: i64) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "result": [code],
    }))
}

fn rpc_error(code: i64, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "error": { "code": code, "message": message },
    }))
}

fn client_for(server: &MockServer, timeout: Duration) -> UbusClient {
    UbusClient::new(
        &server.uri(),
        "root",
        SecretString::from("hunter2".to_owned()),
        &TransportConfig::new(timeout),
    )
    .unwrap()
}

async fn setup() -> (MockServer, UbusClient) {
    let server = MockServer::start().await;
    let client = client_for(&server, Duration::from_secs(5));
    (server, client)
}

async fn mount_login(server: &MockServer, token: &str, times: u64) {
    Mock::given(method("POST"))
        .and(path("/ubus"))
        .and(
            ubus_call("session", "login")
                .with_token(SENTINEL_TOKEN)
                .with_args(json!({ "username": "root", "password": "hunter2" })),
        )
        .respond_with(ok(json!({ "ubus_rpc_session": token, "timeout": 300 })))
        .up_to_n_times(times)
        .expect(times)
        .mount(server)
        .await;
}

// ── Session handling ────────────────────────────────────────────────

#[tokio::test]
async fn test_login_once_and_reuse_token() {
    let (server, client) = setup().await;
    mount_login(&server, "tok-a", 1).await;

    Mock::given(ubus_call("system", "board").with_token("tok-a"))
        .respond_with(ok(json!({
            "hostname": "gw",
            "model": "GL.iNet GL-MT6000",
            "kernel": "6.6.73",
        })))
        .expect(2)
        .mount(&server)
        .await;

    let board = client.system_board().await.unwrap();
    assert_eq!(board.hostname.as_deref(), Some("gw"));
    assert_eq!(board.model.as_deref(), Some("GL.iNet GL-MT6000"));

    client.system_board().await.unwrap();
}

#[tokio::test]
async fn test_rpc_error_forces_relogin() {
    let (server, client) = setup().await;
    mount_login(&server, "tok-a", 1).await;
    mount_login(&server, "tok-b", 1).await;

    Mock::given(ubus_call("system", "info").with_token("tok-a"))
        .respond_with(rpc_error(-32002, "Access denied"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(ubus_call("system", "info").with_token("tok-b"))
        .respond_with(ok(json!({ "uptime": 42, "load": [0, 0, 0] })))
        .expect(1)
        .mount(&server)
        .await;

    let err = client.system_info().await.unwrap_err();
    assert!(matches!(err, Error::Rpc { code: -32002, .. }));
    assert!(client.session_manager().current().await.is_none());

    let info = client.system_info().await.unwrap();
    assert_eq!(info.uptime, 42);
    assert_eq!(client.ensure_session().await.unwrap().token, "tok-b");
}

#[tokio::test]
async fn test_login_without_token_is_auth_error() {
    let (server, client) = setup().await;

    Mock::given(ubus_call("session", "login"))
        .respond_with(ok(json!({ "timeout": 300 })))
        .mount(&server)
        .await;

    let err = client.ensure_session().await.unwrap_err();
    assert!(err.is_auth(), "expected auth error, got {err:?}");
    assert!(client.session_manager().current().await.is_none());
}

#[tokio::test]
async fn test_login_rejected_is_auth_error() {
    let (server, client) = setup().await;

    Mock::given(ubus_call("session", "login"))
        .respond_with(status_only(6))
        .mount(&server)
        .await;

    let err = client.system_board().await.unwrap_err();
    assert!(err.is_auth(), "expected auth error, got {err:?}");
}

// ── Transport failures ──────────────────────────────────────────────

#[tokio::test]
async fn test_http_status_error() {
    let (server, client) = setup().await;
    mount_login(&server, "tok-a", 1).await;

    Mock::given(ubus_call("service", "list"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client.service_list().await.unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 500 }));
    assert!(err.is_session_fatal());
    assert!(client.session_manager().current().await.is_none());
}

#[tokio::test]
async fn test_timeout_is_transport_failure() {
    let server = MockServer::start().await;
    let client = client_for(&server, Duration::from_millis(200));
    mount_login(&server, "tok-a", 1).await;

    Mock::given(ubus_call("network.wireless", "status"))
        .respond_with(ok(json!({})).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let err = client.wireless_status().await.unwrap_err();
    assert!(matches!(err, Error::Timeout { .. }), "got {err:?}");
    assert!(err.is_transport());
}

// ── Object calls ────────────────────────────────────────────────────

#[tokio::test]
async fn test_del_client_params() {
    let (server, client) = setup().await;
    mount_login(&server, "tok-a", 1).await;

    Mock::given(ubus_call("hostapd", "del_client").with_args(json!({
        "addr": "aa:bb:cc:dd:ee:ff",
        "interface": "wlan0",
        "deauth": true,
        "reason": 5,
        "ban_time": 60_000,
    })))
    .respond_with(status_only(0))
    .expect(1)
    .mount(&server)
    .await;

    client
        .hostapd_del_client("wlan0", "aa:bb:cc:dd:ee:ff", Duration::from_secs(60))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_service_restart_and_list() {
    let (server, client) = setup().await;
    mount_login(&server, "tok-a", 1).await;

    Mock::given(ubus_call("service", "restart").with_args(json!({ "name": "dnsmasq" })))
        .respond_with(status_only(0))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(ubus_call("service", "list"))
        .respond_with(ok(json!({
            "dnsmasq": { "instances": { "instance1": { "running": true, "pid": 1880 } } },
            "odhcpd": { "instances": {} },
        })))
        .mount(&server)
        .await;

    client.service_restart("dnsmasq").await.unwrap();

    let services = client.service_list().await.unwrap();
    assert!(services["dnsmasq"].is_running());
    assert!(!services["odhcpd"].is_running());
}

#[tokio::test]
async fn test_hostapd_clients_and_file_read() {
    let (server, client) = setup().await;
    mount_login(&server, "tok-a", 1).await;

    Mock::given(ubus_call("hostapd", "get_clients"))
        .respond_with(ok(json!({
            "wlan0": {
                "freq": 5180,
                "clients": {
                    "AA:BB:CC:00:11:22": { "signal": -48, "rate": { "rx": 866, "tx": 780 } }
                }
            }
        })))
        .mount(&server)
        .await;
    Mock::given(ubus_call("file", "read").with_args(json!({ "path": "/etc/ethers" })))
        .respond_with(ok(json!({ "data": "aa:bb:cc:00:11:22 laptop\n" })))
        .mount(&server)
        .await;

    let ifaces = client.hostapd_clients().await.unwrap();
    let station = &ifaces["wlan0"].clients["AA:BB:CC:00:11:22"];
    assert_eq!(station.signal, Some(-48));

    let file = client.file_read("/etc/ethers").await.unwrap();
    assert_eq!(file.data.as_deref(), Some("aa:bb:cc:00:11:22 laptop\n"));
}
