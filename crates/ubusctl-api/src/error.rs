use thiserror::Error;

/// Top-level error type for the `ubusctl-api` crate.
///
/// Covers every failure mode of the ubus HTTP bridge: login, transport,
/// remote RPC errors, and malformed envelopes. `ubusctl-core` decides which
/// of these abort a refresh cycle and which merely degrade one data source.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login failed or returned no session token.
    ///
    /// `source` holds the failed login call, so an unreachable router can be
    /// told apart from rejected credentials.
    #[error("Authentication failed: {message}")]
    Authentication {
        message: String,
        #[source]
        source: Option<Box<Error>>,
    },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The bridge answered with a non-200 status.
    #[error("HTTP error: {status}")]
    HttpStatus { status: u16 },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── ubus ────────────────────────────────────────────────────────
    /// The response carried an `error` member.
    #[error("ubus error {code}: {message}")]
    Rpc {
        code: i64,
        message: String,
        payload: serde_json::Value,
    },

    /// The response had no usable `result` array.
    #[error("ubus protocol error: {message}")]
    Protocol { message: String },
}

impl Error {
    /// Returns `true` if this error came from the login step.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// The network failure behind a failed login, if that is what it was.
    pub fn transport_cause(&self) -> Option<&Error> {
        match self {
            Self::Authentication {
                source: Some(cause),
                ..
            } if cause.is_transport() => Some(cause),
            _ => None,
        }
    }

    /// Returns `true` for network-level failures (including HTTP status
    /// and timeouts).
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::HttpStatus { .. } | Self::Timeout { .. } | Self::Tls(_)
        )
    }

    /// Returns `true` if the failure must abort a refresh cycle instead of
    /// degrading a single data source.
    pub fn is_session_fatal(&self) -> bool {
        self.is_auth() || self.is_transport()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_session_fatal_errors() {
        assert!(
            Error::Authentication {
                message: "denied".into(),
                source: None,
            }
            .is_session_fatal()
        );
        assert!(Error::HttpStatus { status: 502 }.is_session_fatal());
        assert!(Error::Timeout { timeout_secs: 10 }.is_session_fatal());

        let rpc = Error::Rpc {
            code: -32002,
            message: "Access denied".into(),
            payload: serde_json::Value::Null,
        };
        assert!(!rpc.is_session_fatal());
        assert!(
            !Error::Protocol {
                message: "short result".into()
            }
            .is_session_fatal()
        );
    }

    #[test]
    fn login_keeps_transport_cause() {
        let unreachable = Error::Authentication {
            message: "HTTP error: 502".into(),
            source: Some(Box::new(Error::HttpStatus { status: 502 })),
        };
        assert!(matches!(
            unreachable.transport_cause(),
            Some(Error::HttpStatus { status: 502 })
        ));

        let rejected = Error::Authentication {
            message: "ubus protocol error: status 6".into(),
            source: Some(Box::new(Error::Protocol {
                message: "status 6".into(),
            })),
        };
        assert!(rejected.transport_cause().is_none());
    }
}
