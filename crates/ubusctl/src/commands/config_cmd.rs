//! Config subcommand handlers.

use dialoguer::{Input, MultiSelect, Select};
use secrecy::SecretString;
use strum::VariantNames;

use ubusctl_core::config::COMMON_SERVICES;
use ubusctl_core::{CoreError, DhcpBackend, WirelessBackend, discover_services};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

/// Keys accepted by `config set`.
const SETTABLE_KEYS: &str = "host, username, password_env, wireless_backend, dhcp_backend, \
     managed_services, poll_interval, timeout, kick_ban, settle_delay, cpu_cores, ca_cert, \
     insecure";

// ── Helpers ─────────────────────────────────────────────────────────

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn parse_field<T: std::str::FromStr>(
    field: &str,
    value: &str,
    expected: &str,
) -> Result<T, CliError> {
    value.parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: format!("must be {expected}"),
    })
}

fn check_variant(field: &str, value: &str, variants: &[&str]) -> Result<(), CliError> {
    if variants.contains(&value) {
        Ok(())
    } else {
        Err(CliError::Validation {
            field: field.into(),
            reason: format!("expected one of {}, got '{value}'", variants.join(", ")),
        })
    }
}

/// Apply `key = value` to a profile.
fn set_profile_key(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key {
        "host" => profile.host = value,
        "username" => profile.username = value,
        "password_env" | "password-env" => profile.password_env = Some(value),
        "wireless_backend" | "wireless-backend" => {
            check_variant("wireless_backend", &value, WirelessBackend::VARIANTS)?;
            profile.wireless_backend = Some(value);
        }
        "dhcp_backend" | "dhcp-backend" => {
            check_variant("dhcp_backend", &value, DhcpBackend::VARIANTS)?;
            profile.dhcp_backend = Some(value);
        }
        "managed_services" | "managed-services" => {
            profile.managed_services = value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .collect();
        }
        "poll_interval" | "poll-interval" => {
            profile.poll_interval =
                Some(parse_field("poll_interval", &value, "a number (seconds)")?);
        }
        "timeout" => {
            profile.timeout = Some(parse_field("timeout", &value, "a number (seconds)")?);
        }
        "kick_ban" | "kick-ban" => {
            profile.kick_ban = Some(parse_field("kick_ban", &value, "a number (seconds)")?);
        }
        "settle_delay" | "settle-delay" => {
            profile.settle_delay =
                Some(parse_field("settle_delay", &value, "a number (seconds)")?);
        }
        "cpu_cores" | "cpu-cores" => {
            profile.cpu_cores = Some(parse_field("cpu_cores", &value, "a positive number")?);
        }
        "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
        "insecure" => {
            profile.insecure = Some(parse_field("insecure", &value, "'true' or 'false'")?);
        }
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!("unknown config key '{other}'. Valid keys: {SETTABLE_KEYS}"),
            });
        }
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("ubusctl configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let host: String = Input::new()
                .with_prompt("Router address")
                .default("192.168.1.1".into())
                .interact_text()
                .map_err(prompt_err)?;

            let username: String = Input::new()
                .with_prompt("Username")
                .default("root".into())
                .interact_text()
                .map_err(prompt_err)?;

            let password = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
            if password.is_empty() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "password cannot be empty".into(),
                });
            }

            let wireless = Select::new()
                .with_prompt("Wireless client backend")
                .items(WirelessBackend::VARIANTS)
                .default(0)
                .interact()
                .map_err(prompt_err)?;

            let dhcp = Select::new()
                .with_prompt("DHCP backend")
                .items(DhcpBackend::VARIANTS)
                .default(0)
                .interact()
                .map_err(prompt_err)?;

            let mut profile = Profile {
                host,
                username,
                wireless_backend: WirelessBackend::VARIANTS.get(wireless).map(|s| (*s).to_owned()),
                dhcp_backend: DhcpBackend::VARIANTS.get(dhcp).map(|s| (*s).to_owned()),
                insecure: global.insecure.then_some(true),
                ..Profile::default()
            };

            // Log in once to confirm the credentials and list services.
            let router = ubusctl_config::router_config_with_password(
                &profile,
                SecretString::from(password.clone()),
            )?;
            let available = match discover_services(&router).await {
                Ok(services) => services,
                Err(e) if matches!(e.root(), CoreError::AuthenticationFailed { .. }) => {
                    return Err(e.into());
                }
                Err(e) => {
                    eprintln!("   Could not reach the router ({e}); offering common services");
                    COMMON_SERVICES.iter().map(|s| (*s).to_owned()).collect()
                }
            };

            let picked = MultiSelect::new()
                .with_prompt("Services to manage (space to toggle)")
                .items(&available)
                .interact()
                .map_err(prompt_err)?;
            profile.managed_services = picked
                .into_iter()
                .filter_map(|i| available.get(i).cloned())
                .collect();

            let store_choices = &[
                "Store password in system keyring (recommended)",
                "Save to config file (plaintext)",
            ];
            let store_selection = Select::new()
                .with_prompt("Where to store the password?")
                .items(store_choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?;

            if store_selection == 0 {
                config::store_password(&profile_name, &password)?;
                eprintln!("   Password stored in system keyring");
            } else {
                profile.password = Some(password);
            }

            let mut cfg = config::load_config_or_default();
            cfg.profiles.insert(profile_name.clone(), profile);
            cfg.default_profile = Some(profile_name.clone());
            config::save_config(&cfg)?;

            eprintln!("\nConfiguration written to {}", config_path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Test it: ubusctl status");

            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let mut cfg = config::load_config_or_default();
            for profile in cfg.profiles.values_mut() {
                if profile.password.is_some() {
                    profile.password = Some("********".into());
                }
            }
            let out = output::render_single(
                &global.output,
                &cfg,
                |c| toml::to_string_pretty(c).unwrap_or_else(|_| format!("{c:#?}")),
                |c| c.default_profile.clone().unwrap_or_default(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);

            let profile = cfg
                .profiles
                .entry(profile_name.clone())
                .or_insert_with(|| Profile {
                    username: "root".into(),
                    ..Profile::default()
                });
            set_profile_key(profile, &key, value)?;

            config::save_config(&cfg)?;
            eprintln!("Set {key} on profile '{profile_name}'");
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: ubusctl config init");
            } else {
                for (name, profile) in &cfg.profiles {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}\t{}", profile.host);
                }
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();

            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    name,
                    available: config::available_profiles(&cfg),
                });
            }

            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            eprintln!("Default profile set to '{name}'");
            Ok(())
        }

        // ── SetPassword ─────────────────────────────────────────────
        ConfigCommand::SetPassword { profile } => {
            let cfg: Config = config::load_config_or_default();
            let profile_name = profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));

            if !cfg.profiles.contains_key(&profile_name) {
                return Err(CliError::ProfileNotFound {
                    name: profile_name,
                    available: config::available_profiles(&cfg),
                });
            }

            let secret = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
            if secret.is_empty() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "value cannot be empty".into(),
                });
            }

            config::store_password(&profile_name, &secret)?;
            eprintln!("Password stored in system keyring for profile '{profile_name}'");
            Ok(())
        }
    }
}
