//! CLI configuration: thin wrapper around `ubusctl_config` shared types.
//!
//! Re-exports the shared types and adds resolution that respects
//! `GlobalOpts` flag overrides (--host, --username, --password, ...).

use clap::ArgMatches;
use clap::ValueEnum;
use clap::parser::ValueSource;
use secrecy::SecretString;

use ubusctl_core::RouterConfig;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use ubusctl_config::{
    Config, Profile, config_path, load_config_or_default, save_config, store_password,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Comma-separated profile names, or "(none)".
pub fn available_profiles(config: &Config) -> String {
    if config.profiles.is_empty() {
        "(none)".into()
    } else {
        config.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

/// Take `--output` / `--color` from `[defaults]` when neither the flag nor
/// its env var was given.
pub fn apply_display_defaults(global: &mut GlobalOpts, matches: &ArgMatches, cfg: &Config) {
    let unset = |id: &str| matches.value_source(id) == Some(ValueSource::DefaultValue);

    if unset("output") {
        match <OutputFormat as ValueEnum>::from_str(&cfg.defaults.output, true) {
            Ok(format) => global.output = format,
            Err(_) => {
                tracing::warn!(value = %cfg.defaults.output, "ignoring invalid defaults.output");
            }
        }
    }
    if unset("color") {
        match <ColorMode as ValueEnum>::from_str(&cfg.defaults.color, true) {
            Ok(mode) => global.color = mode,
            Err(_) => {
                tracing::warn!(value = %cfg.defaults.color, "ignoring invalid defaults.color");
            }
        }
    }
}

/// Layer global flags over `profile`. Flags win over profile values, which
/// win over `[defaults]`.
fn apply_overrides(mut profile: Profile, global: &GlobalOpts, cfg: &Config) -> Profile {
    if let Some(ref host) = global.host {
        profile.host.clone_from(host);
    }
    if let Some(ref username) = global.username {
        profile.username.clone_from(username);
    }
    profile.timeout = global
        .timeout
        .or(profile.timeout)
        .or(Some(cfg.defaults.timeout));
    if global.insecure || cfg.defaults.insecure {
        profile.insecure = Some(true);
    }
    profile
}

/// Build the `RouterConfig` for this invocation.
///
/// Uses the active profile when one exists; otherwise `--host` plus a
/// password from `--password` / `UBUSCTL_PASSWORD` is enough.
pub fn resolve_router_config(global: &GlobalOpts) -> Result<RouterConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        None if global.host.is_some() => Profile {
            username: "root".into(),
            ..Profile::default()
        },
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(&cfg),
            });
        }
        None => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    };
    let profile = apply_overrides(profile, global, &cfg);

    let router = match global.password {
        Some(ref pw) => {
            ubusctl_config::router_config_with_password(&profile, SecretString::from(pw.clone()))?
        }
        None => ubusctl_config::profile_to_router_config(&profile, &profile_name)?,
    };

    tracing::debug!(
        profile = %profile_name,
        host = %router.host,
        wireless = %router.wireless_backend,
        dhcp = %router.dhcp_backend,
        "router config resolved"
    );
    Ok(router)
}
