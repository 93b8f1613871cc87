// ubus payload types
//
// Typed views of the objects the client calls. rpcd and hostapd are
// inconsistent about field presence across OpenWrt releases, so every
// optional field carries `#[serde(default)]` and open-ended objects keep
// unknown members in a flattened `extra` map.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ── system ───────────────────────────────────────────────────────────

/// `system/board`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemBoard {
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub kernel: Option<String>,
    #[serde(default)]
    pub system: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `system/info`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemInfo {
    /// Seconds since boot.
    #[serde(default)]
    pub uptime: u64,
    #[serde(default)]
    pub localtime: Option<i64>,
    /// 1, 5 and 15 minute load averages.
    #[serde(default)]
    pub load: Vec<f64>,
    #[serde(default)]
    pub memory: Option<MemoryInfo>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Memory counters in bytes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryInfo {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub free: u64,
    #[serde(default)]
    pub available: u64,
    #[serde(default)]
    pub shared: u64,
    #[serde(default)]
    pub buffered: u64,
}

// ── hostapd ──────────────────────────────────────────────────────────

/// One entry of `hostapd/get_clients`, keyed by interface.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostapdInterface {
    /// Associated stations keyed by MAC address.
    #[serde(default)]
    pub clients: BTreeMap<String, HostapdClient>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An associated station as reported by hostapd.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostapdClient {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<RatePair>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes: Option<RatePair>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An rx/tx counter pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatePair {
    #[serde(default)]
    pub rx: u64,
    #[serde(default)]
    pub tx: u64,
}

// ── service ──────────────────────────────────────────────────────────

/// One entry of `service/list`, keyed by service name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceEntry {
    #[serde(default)]
    pub instances: BTreeMap<String, ServiceInstance>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A procd instance of a service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceInstance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub running: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ServiceEntry {
    /// procd names the first instance of a service `instance1`; a service
    /// counts as running when that instance has a non-zero pid.
    pub fn is_running(&self) -> bool {
        self.instances
            .get("instance1")
            .and_then(|i| i.pid)
            .is_some_and(|pid| pid != 0)
    }
}

// ── network.wireless ─────────────────────────────────────────────────

/// One radio of `network.wireless/status`, keyed by radio name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RadioStatus {
    #[serde(default)]
    pub up: bool,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub config: RadioConfig,
    #[serde(default)]
    pub interfaces: RadioInterfaces,
}

/// Radio-level configuration. Channel and tx power are numbers or strings
/// (`"auto"`) depending on the UCI value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RadioConfig {
    #[serde(default)]
    pub channel: Option<Value>,
    #[serde(default)]
    pub txpower: Option<Value>,
    #[serde(default)]
    pub band: Option<String>,
    #[serde(default)]
    pub htmode: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// netifd reports a radio's interfaces either as an object keyed by section
/// or as an array whose entries carry a `section` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RadioInterfaces {
    Keyed(BTreeMap<String, WirelessInterface>),
    Listed(Vec<WirelessInterface>),
}

impl Default for RadioInterfaces {
    fn default() -> Self {
        Self::Keyed(BTreeMap::new())
    }
}

impl RadioInterfaces {
    /// `(section, interface)` pairs in a stable order.
    pub fn entries(&self) -> Vec<(String, &WirelessInterface)> {
        match self {
            Self::Keyed(map) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
            Self::Listed(list) => list
                .iter()
                .enumerate()
                .map(|(idx, iface)| {
                    let section = iface
                        .section
                        .clone()
                        .unwrap_or_else(|| format!("iface{idx}"));
                    (section, iface)
                })
                .collect(),
        }
    }
}

/// A wifi-iface as seen by netifd.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WirelessInterface {
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub ifname: Option<String>,
    #[serde(default)]
    pub up: Option<bool>,
    #[serde(default)]
    pub config: InterfaceConfig,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterfaceConfig {
    #[serde(default)]
    pub ssid: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub disabled: Option<bool>,
    #[serde(default)]
    pub encryption: Option<Encryption>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Encryption settings: a structured block, or a bare UCI mode string such
/// as `"psk2"` or `"none"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Encryption {
    Block(EncryptionBlock),
    Mode(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptionBlock {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub auth_suites: Vec<String>,
    #[serde(default)]
    pub pair_ciphers: Vec<String>,
}

// ── file ─────────────────────────────────────────────────────────────

/// `file/read`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileContent {
    #[serde(default)]
    pub data: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn service_running_requires_instance1_pid() {
        let running: ServiceEntry = serde_json::from_value(json!({
            "instances": { "instance1": { "running": true, "pid": 1234 } }
        }))
        .unwrap();
        assert!(running.is_running());

        let stopped: ServiceEntry = serde_json::from_value(json!({
            "instances": { "instance1": { "running": false } }
        }))
        .unwrap();
        assert!(!stopped.is_running());

        let other_instance: ServiceEntry = serde_json::from_value(json!({
            "instances": { "main": { "pid": 77 } }
        }))
        .unwrap();
        assert!(!other_instance.is_running());

        assert!(!ServiceEntry::default().is_running());
    }

    #[test]
    fn radio_interfaces_accept_object_and_array() {
        let keyed: RadioStatus = serde_json::from_value(json!({
            "up": true,
            "interfaces": { "default_radio0": { "ifname": "wlan0" } }
        }))
        .unwrap();
        let entries = keyed.interfaces.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, "default_radio0");

        let listed: RadioStatus = serde_json::from_value(json!({
            "interfaces": [
                { "section": "guest", "ifname": "wlan0-1" },
                { "ifname": "wlan0-2" }
            ]
        }))
        .unwrap();
        let entries = listed.interfaces.entries();
        assert_eq!(entries[0].0, "guest");
        assert_eq!(entries[1].0, "iface1");
    }

    #[test]
    fn encryption_accepts_block_or_mode() {
        let cfg: InterfaceConfig = serde_json::from_value(json!({
            "encryption": { "enabled": true, "auth_suites": ["psk"], "pair_ciphers": ["ccmp"] }
        }))
        .unwrap();
        assert!(matches!(cfg.encryption, Some(Encryption::Block(ref b)) if b.enabled));

        let cfg: InterfaceConfig =
            serde_json::from_value(json!({ "encryption": "psk2" })).unwrap();
        assert!(matches!(cfg.encryption, Some(Encryption::Mode(ref m)) if m == "psk2"));
    }

    #[test]
    fn hostapd_client_keeps_unknown_fields() {
        let client: HostapdClient = serde_json::from_value(json!({
            "signal": -52,
            "rate": { "rx": 866_700, "tx": 780_000 },
            "authorized": true
        }))
        .unwrap();
        assert_eq!(client.signal, Some(-52));
        assert_eq!(client.rate.unwrap().tx, 780_000);
        assert_eq!(client.extra.get("authorized"), Some(&json!(true)));
    }
}
