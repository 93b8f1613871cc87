// ── Runtime router configuration ──
//
// These types describe *how* to talk to one OpenWrt router and which data
// sources to poll. They carry credentials and tuning, but never touch disk.
// The CLI builds a `RouterConfig` from a profile and hands it in.

use std::collections::BTreeSet;
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantNames};

/// Poll interval when none is configured.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);
/// Per-call timeout when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// How long a kicked station stays banned.
pub const DEFAULT_KICK_BAN: Duration = Duration::from_secs(60);
/// Wait between a service command and the refresh it triggers.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(2);

/// Static MAC to name mapping read from the router.
pub const ETHERS_PATH: &str = "/etc/ethers";
/// dnsmasq lease file.
pub const DNSMASQ_LEASES_PATH: &str = "/var/lib/dhcp/dhcpd.leases";

/// Services offered for management when the router cannot list its own.
pub const COMMON_SERVICES: &[&str] = &[
    "network", "dnsmasq", "firewall", "dropbear", "uhttpd", "odhcpd", "hostapd",
];

/// Where connected wireless stations are read from.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WirelessBackend {
    #[default]
    Hostapd,
    Iwinfo,
    #[serde(rename = "none")]
    #[strum(serialize = "none")]
    Disabled,
}

/// Where DHCP leases are read from.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DhcpBackend {
    #[default]
    Dnsmasq,
    Odhcpd,
    #[serde(rename = "none")]
    #[strum(serialize = "none")]
    Disabled,
}

/// TLS verification strategy for `https://` hosts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed uhttpd certificates).
    DangerAcceptInvalid,
}

/// Configuration for one router.
///
/// Built by the CLI, passed to `Coordinator`. Core never reads config files.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Router address: `192.168.1.1`, `router.lan:8080` or a full
    /// `https://` URL.
    pub host: String,
    pub username: String,
    pub password: SecretString,
    pub wireless_backend: WirelessBackend,
    pub dhcp_backend: DhcpBackend,
    /// Services that may be started, stopped and reported on.
    pub managed_services: BTreeSet<String>,
    pub poll_interval: Duration,
    /// Bound on every single RPC call.
    pub timeout: Duration,
    pub kick_ban: Duration,
    /// Delay between a service command and its follow-up refresh.
    pub settle_delay: Duration,
    /// Core count used to scale load averages into percentages.
    pub cpu_cores: u32,
    pub tls: TlsVerification,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            host: "192.168.1.1".into(),
            username: "root".into(),
            password: SecretString::from(String::new()),
            wireless_backend: WirelessBackend::default(),
            dhcp_backend: DhcpBackend::default(),
            managed_services: BTreeSet::new(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
            kick_ban: DEFAULT_KICK_BAN,
            settle_delay: DEFAULT_SETTLE_DELAY,
            cpu_cores: 1,
            tls: TlsVerification::default(),
        }
    }
}

impl RouterConfig {
    pub fn is_managed(&self, service: &str) -> bool {
        self.managed_services.contains(service)
    }
}
