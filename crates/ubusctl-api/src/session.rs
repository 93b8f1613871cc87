// ubus session login and token caching
//
// The bridge hands out a short-lived `ubus_rpc_session` token in exchange for
// rpcd credentials. Renewal is failure-driven: there is no expiry timer, a
// token is dropped when a call made with it fails and the next caller logs in
// again.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::Error;
use crate::rpc::{RpcTransport, SENTINEL_TOKEN};

/// An acquired session token.
#[derive(Clone)]
pub struct Session {
    pub token: String,
    pub acquired_at: DateTime<Utc>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("acquired_at", &self.acquired_at)
            .finish()
    }
}

/// Owns the credentials and the cached token for one router.
///
/// The token slot sits behind an async mutex that is held across the login
/// call, so concurrent callers wait for a single login instead of racing.
pub struct SessionManager {
    username: String,
    password: SecretString,
    current: Mutex<Option<Session>>,
}

impl SessionManager {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
            current: Mutex::new(None),
        }
    }

    /// Return the cached session, logging in first if there is none.
    pub async fn ensure_session(&self, rpc: &RpcTransport) -> Result<Session, Error> {
        let mut slot = self.current.lock().await;
        if let Some(session) = slot.as_ref() {
            return Ok(session.clone());
        }

        let session = login(rpc, &self.username, &self.password).await?;
        *slot = Some(session.clone());
        Ok(session)
    }

    /// Drop the cached session unconditionally.
    pub async fn invalidate(&self) {
        if self.current.lock().await.take().is_some() {
            debug!("session invalidated");
        }
    }

    /// Drop the cached session only if it still holds `token`.
    ///
    /// Returns `true` when the slot was cleared. A failure observed with an
    /// older token leaves a newer login in place.
    pub async fn invalidate_token(&self, token: &str) -> bool {
        let mut slot = self.current.lock().await;
        if slot.as_ref().is_some_and(|s| s.token == token) {
            *slot = None;
            debug!("session invalidated after failed call");
            true
        } else {
            false
        }
    }

    /// The cached session, if any.
    pub async fn current(&self) -> Option<Session> {
        self.current.lock().await.clone()
    }
}

/// Exchange credentials for a session token.
///
/// `session/login` is called with the all-zero sentinel token. Every failure,
/// including a reply without `ubus_rpc_session`, surfaces as
/// [`Error::Authentication`]; a failed call is kept as its source.
pub async fn login(
    rpc: &RpcTransport,
    username: &str,
    password: &SecretString,
) -> Result<Session, Error> {
    debug!(username, endpoint = %rpc.endpoint(), "logging in");

    let params = json!({
        "username": username,
        "password": password.expose_secret(),
    });

    let payload = rpc
        .call(SENTINEL_TOKEN, "session", "login", &params)
        .await
        .map_err(|e| {
            warn!(error = %e, "login failed");
            Error::Authentication {
                message: e.to_string(),
                source: Some(Box::new(e)),
            }
        })?;

    let token = payload
        .get("ubus_rpc_session")
        .and_then(serde_json::Value::as_str)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| Error::Authentication {
            message: "login reply carried no ubus_rpc_session".into(),
            source: None,
        })?;

    debug!("login successful");
    Ok(Session {
        token: token.to_owned(),
        acquired_at: Utc::now(),
    })
}
