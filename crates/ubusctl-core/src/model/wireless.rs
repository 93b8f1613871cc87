use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ubusctl_api::models::HostapdClient;

/// Stations associated with one interface, as seen by hostapd.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterfaceClients {
    pub interface: String,
    pub clients: BTreeMap<String, HostapdClient>,
    pub client_count: usize,
}

/// A configured wifi-iface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WirelessNetwork {
    pub interface: String,
    pub radio: String,
    pub ssid: String,
    pub mode: String,
    /// Label such as `"WPA2-PSK (CCMP)"` or `"Open"`.
    pub encryption: String,
    pub channel: String,
    pub txpower: String,
    pub disabled: bool,
    pub up: bool,
}

impl WirelessNetwork {
    /// Broadcasting: up and not administratively disabled.
    pub fn is_online(&self) -> bool {
        self.up && !self.disabled
    }
}
