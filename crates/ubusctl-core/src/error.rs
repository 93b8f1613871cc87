// ── Core error types ──
//
// User-facing errors from ubusctl-core. Consumers never match on raw ubus
// envelopes; the `From<ubusctl_api::Error>` impl translates transport-layer
// errors into domain variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach router at {host}: {reason}")]
    ConnectionFailed { host: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Router request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Coordinator errors ───────────────────────────────────────────
    /// A refresh cycle aborted; the previous snapshot is still current.
    #[error("Error communicating with OpenWrt: {source}")]
    UpdateFailed {
        #[source]
        source: Box<CoreError>,
    },

    /// The first refresh failed, so the coordinator never came up.
    #[error("Router setup failed: {source}")]
    SetupFailed {
        #[source]
        source: Box<CoreError>,
    },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Service '{name}' is not managed")]
    UnmanagedService { name: String },

    #[error("Unsupported service action: {action}")]
    UnsupportedAction { action: String },

    #[error("Operation requires the {required} backend")]
    UnsupportedBackend { required: String },

    #[error("Device not found: {identifier}")]
    DeviceNotFound { identifier: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("ubus error: {message}")]
    Api { message: String, code: Option<i64> },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Wrap `self` as the cause of an aborted refresh cycle.
    pub fn into_update_failed(self) -> Self {
        match self {
            already @ Self::UpdateFailed { .. } => already,
            other => Self::UpdateFailed {
                source: Box::new(other),
            },
        }
    }

    /// The innermost cause, looking through `UpdateFailed`/`SetupFailed`.
    pub fn root(&self) -> &CoreError {
        match self {
            Self::UpdateFailed { source } | Self::SetupFailed { source } => source.root(),
            other => other,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<ubusctl_api::Error> for CoreError {
    fn from(err: ubusctl_api::Error) -> Self {
        match err {
            // A login that never reached the router is a connection problem.
            ubusctl_api::Error::Authentication {
                source: Some(cause),
                ..
            } if cause.is_transport() => CoreError::from(*cause),
            ubusctl_api::Error::Authentication { message, .. } => {
                CoreError::AuthenticationFailed { message }
            }
            ubusctl_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else {
                    CoreError::ConnectionFailed {
                        host: e
                            .url()
                            .and_then(|u| u.host_str().map(str::to_owned))
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                }
            }
            ubusctl_api::Error::HttpStatus { status } => CoreError::ConnectionFailed {
                host: String::new(),
                reason: format!("HTTP error: {status}"),
            },
            ubusctl_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid router address: {e}"),
            },
            ubusctl_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            ubusctl_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                host: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            ubusctl_api::Error::Rpc { code, message, .. } => CoreError::Api {
                message,
                code: Some(code),
            },
            ubusctl_api::Error::Protocol { message } => CoreError::Api {
                message,
                code: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_failed_does_not_nest() {
        let err = CoreError::Timeout { timeout_secs: 10 }
            .into_update_failed()
            .into_update_failed();
        match &err {
            CoreError::UpdateFailed { source } => {
                assert!(matches!(**source, CoreError::Timeout { timeout_secs: 10 }));
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert!(matches!(err.root(), CoreError::Timeout { .. }));
    }

    #[test]
    fn auth_errors_map_to_authentication_failed() {
        let err: CoreError = ubusctl_api::Error::Authentication {
            message: "bad password".into(),
            source: None,
        }
        .into();
        assert!(matches!(err, CoreError::AuthenticationFailed { .. }));
    }

    #[test]
    fn unreachable_login_maps_to_its_transport_cause() {
        let err: CoreError = ubusctl_api::Error::Authentication {
            message: "Request timed out after 10s".into(),
            source: Some(Box::new(ubusctl_api::Error::Timeout { timeout_secs: 10 })),
        }
        .into();
        assert!(matches!(err, CoreError::Timeout { timeout_secs: 10 }));

        let err: CoreError = ubusctl_api::Error::Authentication {
            message: "HTTP error: 503".into(),
            source: Some(Box::new(ubusctl_api::Error::HttpStatus { status: 503 })),
        }
        .into();
        assert!(matches!(err, CoreError::ConnectionFailed { .. }));
    }
}
