// ubus JSON-RPC transport
//
// One POST per call against `http://{host}/ubus`. Unwraps the
// `{"result": [status, payload]}` envelope and maps every failure onto the
// crate error taxonomy. No retries happen at this layer; session renewal is
// the caller's concern.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Token sent with calls that need no session (login).
pub const SENTINEL_TOKEN: &str = "00000000000000000000000000000000";

// ── Envelope ─────────────────────────────────────────────────────────

/// Outbound envelope. `params` serializes as
/// `[token, object, method, args]`.
#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u32,
    method: &'static str,
    params: (&'a str, &'a str, &'a str, &'a Value),
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Vec<Value>>,
    #[serde(default)]
    error: Option<Value>,
}

/// Human-readable name for a non-zero ubus status code.
fn status_name(code: i64) -> &'static str {
    match code {
        1 => "invalid command",
        2 => "invalid argument",
        3 => "method not found",
        4 => "not found",
        5 => "no data",
        6 => "permission denied",
        7 => "timeout",
        8 => "not supported",
        10 => "connection failed",
        _ => "unknown error",
    }
}

/// What a call expects back in `result`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// `[status, payload]`; anything shorter is a protocol error.
    Payload,
    /// Commands such as `del_client` or `service/restart` answer with a bare
    /// `[0]` status.
    StatusOnly,
}

// ── Transport ────────────────────────────────────────────────────────

/// Raw JSON-RPC client for a single router.
#[derive(Debug, Clone)]
pub struct RpcTransport {
    http: reqwest::Client,
    endpoint: Url,
    timeout: Duration,
}

impl RpcTransport {
    /// Create a transport for `host`.
    ///
    /// A bare host (`192.168.1.1`, `router.lan:8080`) is reached over plain
    /// HTTP; a host with an explicit scheme is used as given. The path is
    /// always `/ubus`.
    pub fn new(host: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            endpoint: endpoint_url(host)?,
            timeout: transport.timeout,
        })
    }

    /// The resolved `/ubus` endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Issue one `call` and return the payload element of `result`.
    pub async fn call(
        &self,
        token: &str,
        object: &str,
        method: &str,
        params: &Value,
    ) -> Result<Value, Error> {
        self.call_with(token, object, method, params, Reply::Payload).await
    }

    /// Issue one `call`, accepting the reply shape given by `reply`.
    ///
    /// With [`Reply::StatusOnly`] a bare zero status yields `Value::Null`.
    pub async fn call_with(
        &self,
        token: &str,
        object: &str,
        method: &str,
        params: &Value,
        reply: Reply,
    ) -> Result<Value, Error> {
        debug!(object, method, "ubus call");

        let body = RpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method: "call",
            params: (token, object, method, params),
        };

        let resp = self
            .http
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            return Err(Error::HttpStatus {
                status: status.as_u16(),
            });
        }

        let text = resp.text().await.map_err(|e| self.map_send_error(e))?;
        parse_response(&text, reply)
    }

    fn map_send_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            Error::Transport(err)
        }
    }
}

/// Build `{scheme}://{host}/ubus` from a configured host string.
pub fn endpoint_url(host: &str) -> Result<Url, Error> {
    let host = host.trim().trim_end_matches('/');
    let base = if host.contains("://") {
        host.to_owned()
    } else {
        format!("http://{host}")
    };
    let mut url = Url::parse(&base)?;
    url.set_path("/ubus");
    Ok(url)
}

fn parse_response(body: &str, reply: Reply) -> Result<Value, Error> {
    let resp: RpcResponse = serde_json::from_str(body).map_err(|e| Error::Protocol {
        message: format!("invalid JSON-RPC body: {e}"),
    })?;

    if let Some(err) = resp.error {
        let code = err.get("code").and_then(Value::as_i64).unwrap_or_default();
        let message = err
            .get("message")
            .and_then(Value::as_str)
            .map_or_else(|| err.to_string(), str::to_owned);
        return Err(Error::Rpc {
            code,
            message,
            payload: err,
        });
    }

    let mut result = resp.result.unwrap_or_default();
    if reply == Reply::StatusOnly
        && result.len() == 1
        && result.first().and_then(Value::as_i64) == Some(0)
    {
        return Ok(Value::Null);
    }
    if result.len() < 2 {
        let message = match result.first().and_then(Value::as_i64) {
            Some(code) if code != 0 => format!("status {code} ({})", status_name(code)),
            _ => format!("result has {} element(s), expected 2", result.len()),
        };
        return Err(Error::Protocol { message });
    }

    Ok(result.swap_remove(1))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn bare_host_uses_http() {
        let url = endpoint_url("192.168.1.1").unwrap();
        assert_eq!(url.as_str(), "http://192.168.1.1/ubus");
    }

    #[test]
    fn explicit_scheme_is_kept() {
        let url = endpoint_url("https://router.lan:8443/").unwrap();
        assert_eq!(url.as_str(), "https://router.lan:8443/ubus");
    }

    #[test]
    fn request_params_serialize_as_array() {
        let args = json!({ "path": "/etc/ethers" });
        let req = RpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method: "call",
            params: (SENTINEL_TOKEN, "file", "read", &args),
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(
            v,
            json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "call",
                "params": [SENTINEL_TOKEN, "file", "read", { "path": "/etc/ethers" }],
            })
        );
    }

    #[test]
    fn second_result_element_is_returned() {
        let v = parse_response(
            r#"{"jsonrpc":"2.0","id":1,"result":[0,{"a":1}]}"#,
            Reply::Payload,
        )
        .unwrap();
        assert_eq!(v, json!({ "a": 1 }));
    }

    #[test]
    fn error_member_maps_to_rpc_error() {
        let err = parse_response(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32002,"message":"Access denied"}}"#,
            Reply::Payload,
        )
        .unwrap_err();
        match err {
            Error::Rpc { code, message, .. } => {
                assert_eq!(code, -32002);
                assert_eq!(message, "Access denied");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn status_only_result_is_protocol_error() {
        let err = parse_response(r#"{"jsonrpc":"2.0","id":1,"result":[6]}"#, Reply::Payload)
            .unwrap_err();
        match err {
            Error::Protocol { message } => assert!(message.contains("permission denied")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn bare_ok_status_needs_status_only_reply() {
        let body = r#"{"jsonrpc":"2.0","id":1,"result":[0]}"#;
        assert!(matches!(
            parse_response(body, Reply::Payload),
            Err(Error::Protocol { .. })
        ));
        assert_eq!(parse_response(body, Reply::StatusOnly).unwrap(), Value::Null);
    }

    #[test]
    fn bare_failure_status_fails_even_for_commands() {
        let body = r#"{"jsonrpc":"2.0","id":1,"result":[4]}"#;
        assert!(matches!(
            parse_response(body, Reply::StatusOnly),
            Err(Error::Protocol { .. })
        ));
    }

    #[test]
    fn missing_result_is_protocol_error() {
        let err = parse_response(r#"{"jsonrpc":"2.0","id":1}"#, Reply::Payload).unwrap_err();
        assert!(matches!(err, Error::Protocol { .. }));
    }
}
