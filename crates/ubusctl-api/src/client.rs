// Session-aware ubus client
//
// Combines the raw RPC transport with the session manager. Every call
// acquires a token first and gives it back up when the call fails, so the
// next caller re-authenticates. Object-specific calls (system, hostapd,
// service, ...) are inherent methods in sibling modules.

use secrecy::SecretString;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Error;
use crate::rpc::{Reply, RpcTransport};
use crate::session::{Session, SessionManager};
use crate::transport::TransportConfig;

/// High-level client for one router's ubus bridge.
pub struct UbusClient {
    rpc: RpcTransport,
    session: SessionManager,
}

impl UbusClient {
    /// Create a client for `host`. No network traffic happens until the
    /// first call.
    pub fn new(
        host: &str,
        username: impl Into<String>,
        password: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        Ok(Self {
            rpc: RpcTransport::new(host, transport)?,
            session: SessionManager::new(username, password),
        })
    }

    pub fn session_manager(&self) -> &SessionManager {
        &self.session
    }

    /// Return the cached session, logging in if necessary.
    pub async fn ensure_session(&self) -> Result<Session, Error> {
        self.session.ensure_session(&self.rpc).await
    }

    /// Forget the cached session; the next call logs in again.
    pub async fn invalidate_session(&self) {
        self.session.invalidate().await;
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Call `object.method` and return the untyped payload.
    pub async fn call_raw(
        &self,
        object: &str,
        method: &str,
        params: Value,
    ) -> Result<Value, Error> {
        self.invoke(object, method, &params, Reply::Payload).await
    }

    /// Call a method that answers with a bare status (`[0]`).
    pub async fn command(&self, object: &str, method: &str, params: Value) -> Result<(), Error> {
        self.invoke(object, method, &params, Reply::StatusOnly).await?;
        Ok(())
    }

    async fn invoke(
        &self,
        object: &str,
        method: &str,
        params: &Value,
        reply: Reply,
    ) -> Result<Value, Error> {
        let session = self.ensure_session().await?;
        match self
            .rpc
            .call_with(&session.token, object, method, params, reply)
            .await
        {
            Ok(payload) => Ok(payload),
            Err(e) => {
                self.session.invalidate_token(&session.token).await;
                Err(e)
            }
        }
    }

    /// Call `object.method` and decode the payload into `T`.
    pub async fn call<T: DeserializeOwned>(
        &self,
        object: &str,
        method: &str,
        params: Value,
    ) -> Result<T, Error> {
        let payload = self.call_raw(object, method, params).await?;
        serde_json::from_value(payload).map_err(|e| Error::Protocol {
            message: format!("unexpected {object}/{method} payload: {e}"),
        })
    }
}
