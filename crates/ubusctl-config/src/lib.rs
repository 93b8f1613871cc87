//! Shared configuration for ubusctl.
//!
//! TOML router profiles, credential resolution (env + keyring + plaintext),
//! and translation to `ubusctl_core::RouterConfig`. The CLI layers its
//! `GlobalOpts` overrides on top of what this crate resolves.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use ubusctl_core::config::{
    DEFAULT_KICK_BAN, DEFAULT_POLL_INTERVAL, DEFAULT_SETTLE_DELAY, DEFAULT_TIMEOUT,
};
use ubusctl_core::{DhcpBackend, RouterConfig, TlsVerification, WirelessBackend};

/// Keyring service name; entries are keyed `{profile}/password`.
pub const KEYRING_SERVICE: &str = "ubusctl";

/// Environment variable consulted for the router password.
pub const PASSWORD_ENV: &str = "UBUSCTL_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no password configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named router profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    /// Per-call timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

/// A named router profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Router address (e.g. "192.168.1.1" or "https://router.lan").
    pub host: String,

    /// Login user.
    #[serde(default = "default_username")]
    pub username: String,

    /// Password (plaintext, prefer keyring or env var).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Environment variable name containing the password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_env: Option<String>,

    /// "hostapd", "iwinfo" or "none".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wireless_backend: Option<String>,

    /// "dnsmasq", "odhcpd" or "none".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dhcp_backend: Option<String>,

    /// Services that may be controlled and are reported on.
    #[serde(default)]
    pub managed_services: Vec<String>,

    /// Poll interval in seconds; 0 disables polling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll_interval: Option<u64>,

    /// Override per-call timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Kick ban duration in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kick_ban: Option<u64>,

    /// Seconds to wait after a service command before refreshing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settle_delay: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_cores: Option<u32>,

    /// Path to custom CA certificate for `https://` hosts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,
}

fn default_username() -> String {
    "root".into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "ubusctl", "ubusctl").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("ubusctl");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical path + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from `path`, layering `UBUSCTL_*` environment variables on
/// top. A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("UBUSCTL_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist or is invalid.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password"))
}

/// Resolve the router password without CLI flags.
///
/// Order: the profile's `password_env` variable, `UBUSCTL_PASSWORD`, the
/// system keyring, then plaintext in the config file.
pub fn resolve_password(
    profile: &Profile,
    profile_name: &str,
) -> Result<SecretString, ConfigError> {
    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    if let Ok(val) = std::env::var(PASSWORD_ENV) {
        return Ok(SecretString::from(val));
    }

    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(pw) = entry.get_password() {
            return Ok(SecretString::from(pw));
        }
    }

    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store `password` in the system keyring for `profile_name`.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(password)?;
    Ok(())
}

// ── Profile translation ─────────────────────────────────────────────

fn parse_backend<T>(field: &str, value: Option<&str>) -> Result<T, ConfigError>
where
    T: Default + std::str::FromStr + strum::VariantNames,
{
    let Some(value) = value else {
        return Ok(T::default());
    };
    value.parse().map_err(|_| ConfigError::Validation {
        field: field.into(),
        reason: format!("expected one of {}, got '{value}'", T::VARIANTS.join(", ")),
    })
}

/// Build a `RouterConfig` from a profile without CLI overrides.
///
/// Unset fields take the library defaults. Unknown backend names are
/// rejected.
pub fn profile_to_router_config(
    profile: &Profile,
    profile_name: &str,
) -> Result<RouterConfig, ConfigError> {
    let password = resolve_password(profile, profile_name)?;
    router_config_with_password(profile, password)
}

/// Like [`profile_to_router_config`], with an already-resolved password.
pub fn router_config_with_password(
    profile: &Profile,
    password: SecretString,
) -> Result<RouterConfig, ConfigError> {
    let host = profile.host.trim();
    if host.is_empty() {
        return Err(ConfigError::Validation {
            field: "host".into(),
            reason: "must not be empty".into(),
        });
    }

    let wireless_backend: WirelessBackend =
        parse_backend("wireless_backend", profile.wireless_backend.as_deref())?;
    let dhcp_backend: DhcpBackend = parse_backend("dhcp_backend", profile.dhcp_backend.as_deref())?;

    let tls = if profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let secs = |v: Option<u64>, default: Duration| v.map_or(default, Duration::from_secs);

    Ok(RouterConfig {
        host: host.to_owned(),
        username: profile.username.clone(),
        password,
        wireless_backend,
        dhcp_backend,
        managed_services: profile.managed_services.iter().cloned().collect(),
        poll_interval: secs(profile.poll_interval, DEFAULT_POLL_INTERVAL),
        timeout: secs(profile.timeout, DEFAULT_TIMEOUT),
        kick_ban: secs(profile.kick_ban, DEFAULT_KICK_BAN),
        settle_delay: secs(profile.settle_delay, DEFAULT_SETTLE_DELAY),
        cpu_cores: profile.cpu_cores.unwrap_or(1).max(1),
        tls,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    fn profile(host: &str) -> Profile {
        Profile {
            host: host.into(),
            username: default_username(),
            password: Some("hunter2".into()),
            ..Profile::default()
        }
    }

    #[test]
    fn profile_defaults_apply() {
        let cfg = profile_to_router_config(&profile("192.168.1.1"), "default").unwrap();
        assert_eq!(cfg.host, "192.168.1.1");
        assert_eq!(cfg.username, "root");
        assert_eq!(cfg.wireless_backend, WirelessBackend::Hostapd);
        assert_eq!(cfg.dhcp_backend, DhcpBackend::Dnsmasq);
        assert_eq!(cfg.poll_interval, Duration::from_secs(30));
        assert_eq!(cfg.timeout, Duration::from_secs(10));
        assert_eq!(cfg.kick_ban, Duration::from_secs(60));
        assert_eq!(cfg.cpu_cores, 1);
        assert_eq!(cfg.tls, TlsVerification::SystemDefaults);
        assert!(cfg.managed_services.is_empty());
    }

    #[test]
    fn profile_overrides_apply() {
        let p = Profile {
            wireless_backend: Some("none".into()),
            dhcp_backend: Some("odhcpd".into()),
            managed_services: vec!["dnsmasq".into(), "firewall".into(), "dnsmasq".into()],
            poll_interval: Some(0),
            cpu_cores: Some(4),
            insecure: Some(true),
            ..profile("https://router.lan")
        };
        let cfg = profile_to_router_config(&p, "lab").unwrap();
        assert_eq!(cfg.wireless_backend, WirelessBackend::Disabled);
        assert_eq!(cfg.dhcp_backend, DhcpBackend::Odhcpd);
        assert_eq!(cfg.managed_services.len(), 2);
        assert!(cfg.poll_interval.is_zero());
        assert_eq!(cfg.cpu_cores, 4);
        assert_eq!(cfg.tls, TlsVerification::DangerAcceptInvalid);
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let p = Profile {
            dhcp_backend: Some("kea".into()),
            ..profile("192.168.1.1")
        };
        let err = profile_to_router_config(&p, "default").unwrap_err();
        match err {
            ConfigError::Validation { field, reason } => {
                assert_eq!(field, "dhcp_backend");
                assert!(reason.contains("odhcpd"), "{reason}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_host_is_rejected() {
        let err = profile_to_router_config(&profile("  "), "default").unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "host"));
    }

    #[test]
    fn unset_password_env_falls_back_to_plaintext() {
        let p = Profile {
            password_env: Some("UBUSCTL_TEST_UNSET_PASSWORD_VAR".into()),
            ..profile("192.168.1.1")
        };
        let pw = resolve_password(&p, "fallback-test").unwrap();
        assert_eq!(pw.expose_secret(), "hunter2");
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles.insert(
            "home".into(),
            Profile {
                managed_services: vec!["dnsmasq".into()],
                kick_ban: Some(120),
                ..profile("192.168.8.1")
            },
        );
        cfg.default_profile = Some("home".into());
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.default_profile.as_deref(), Some("home"));
        let home = &loaded.profiles["home"];
        assert_eq!(home.host, "192.168.8.1");
        assert_eq!(home.managed_services, ["dnsmasq"]);
        assert_eq!(home.kick_ban, Some(120));
        assert_eq!(loaded.defaults.timeout, 10);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded.default_profile.as_deref(), Some("default"));
        assert!(loaded.profiles.is_empty());
    }
}
