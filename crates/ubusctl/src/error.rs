//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with actionable
//! help text and process exit codes.

use miette::Diagnostic;
use thiserror::Error;

use ubusctl_config::ConfigError;
use ubusctl_core::CoreError;

/// Process exit codes.
#[allow(dead_code)]
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach router at {host}")]
    #[diagnostic(
        code(ubusctl::connection_failed),
        help(
            "Check that the router is up and uhttpd-mod-ubus is installed.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { host: String, reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(ubusctl::auth_failed),
        help(
            "Verify the username and password, and that the user has an rpcd ACL.\n\
             Store a new password with: ubusctl config set-password"
        )
    )]
    AuthFailed { message: String },

    #[error("No password configured for profile '{profile}'")]
    #[diagnostic(
        code(ubusctl::no_credentials),
        help(
            "Store one with: ubusctl config set-password\n\
             Or set the UBUSCTL_PASSWORD environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(ubusctl::not_found),
        help("Run: ubusctl {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Router ───────────────────────────────────────────────────────
    #[error("ubus error ({code}): {message}")]
    #[diagnostic(code(ubusctl::api_error))]
    ApiError { code: String, message: String },

    #[error("'{operation}' is not supported: {reason}")]
    #[diagnostic(code(ubusctl::unsupported))]
    Unsupported { operation: String, reason: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(ubusctl::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(ubusctl::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: ubusctl config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No router configured")]
    #[diagnostic(
        code(ubusctl::no_config),
        help(
            "Create a profile with: ubusctl config init\n\
             Expected at: {path}\n\
             Or pass --host and set UBUSCTL_PASSWORD."
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(ubusctl::config))]
    Config(ConfigError),

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(ubusctl::timeout),
        help("Increase timeout with --timeout or check router responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::Unsupported { .. } | Self::NoConfig { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UpdateFailed { source } | CoreError::SetupFailed { source } => {
                Self::from(*source)
            }

            CoreError::ConnectionFailed { host, reason } => Self::ConnectionFailed { host, reason },

            CoreError::AuthenticationFailed { message } => Self::AuthFailed { message },

            CoreError::Timeout { timeout_secs } => Self::Timeout {
                seconds: timeout_secs,
            },

            CoreError::UnmanagedService { name } => Self::NotFound {
                resource_type: "managed service".into(),
                identifier: name,
                list_command: "services list".into(),
            },

            CoreError::UnsupportedAction { action } => Self::Validation {
                field: "action".into(),
                reason: format!("'{action}' is not one of start, stop, restart"),
            },

            CoreError::UnsupportedBackend { required } => Self::Unsupported {
                operation: "kick".into(),
                reason: format!("requires wireless_backend = \"{required}\""),
            },

            CoreError::DeviceNotFound { identifier } => Self::NotFound {
                resource_type: "device".into(),
                identifier,
                list_command: "devices list".into(),
            },

            CoreError::Api { message, code } => Self::ApiError {
                code: code.map_or_else(|| "protocol".into(), |c| c.to_string()),
                message,
            },

            CoreError::Config { message } => Self::Validation {
                field: "host".into(),
                reason: message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_cycle_errors_unwrap_to_root_cause() {
        let err = CoreError::SetupFailed {
            source: Box::new(
                CoreError::AuthenticationFailed {
                    message: "denied".into(),
                }
                .into_update_failed(),
            ),
        };
        let cli = CliError::from(err);
        assert!(matches!(cli, CliError::AuthFailed { .. }));
        assert_eq!(cli.exit_code(), exit_code::AUTH);
    }

    #[test]
    fn exit_codes() {
        let timeout = CliError::from(CoreError::Timeout { timeout_secs: 10 });
        assert_eq!(timeout.exit_code(), exit_code::TIMEOUT);

        let conn = CliError::from(CoreError::ConnectionFailed {
            host: "192.168.1.1".into(),
            reason: "refused".into(),
        });
        assert_eq!(conn.exit_code(), exit_code::CONNECTION);

        let unmanaged = CliError::from(CoreError::UnmanagedService {
            name: "uhttpd".into(),
        });
        assert_eq!(unmanaged.exit_code(), exit_code::NOT_FOUND);

        let action = CliError::from(CoreError::UnsupportedAction {
            action: "reload".into(),
        });
        assert_eq!(action.exit_code(), exit_code::USAGE);

        let api = CliError::from(CoreError::Api {
            message: "Access denied".into(),
            code: Some(-32002),
        });
        assert_eq!(api.exit_code(), exit_code::GENERAL);
        assert_eq!(api.to_string(), "ubus error (-32002): Access denied");
    }
}
