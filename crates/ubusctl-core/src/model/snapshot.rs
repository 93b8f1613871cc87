use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    ConnectedDevice, DhcpLease, InterfaceClients, ProcessedDevice, ServiceStatus, SystemSummary,
    WirelessNetwork,
};

/// One complete, internally consistent poll result.
///
/// Snapshots are never mutated after publication; the coordinator swaps in a
/// new one per cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub system: SystemSummary,
    /// Stations per interface (hostapd view).
    pub wireless_info: BTreeMap<String, InterfaceClients>,
    /// Configured networks keyed by interface.
    pub wireless_networks: BTreeMap<String, WirelessNetwork>,
    /// Raw connected devices keyed by MAC as reported.
    pub connected_devices: BTreeMap<String, ConnectedDevice>,
    pub dhcp_leases: BTreeMap<String, DhcpLease>,
    /// Managed services only.
    pub services: BTreeMap<String, ServiceStatus>,
    /// Lowercased MAC to static name, as loaded this cycle.
    pub ethers: BTreeMap<String, String>,
    /// Connected devices with resolved names, keyed by MAC.
    pub devices: BTreeMap<String, ProcessedDevice>,
    pub refreshed_at: DateTime<Utc>,
}

impl Snapshot {
    /// Number of connected devices on `interface`.
    pub fn connected_count(&self, interface: &str) -> usize {
        self.connected_devices
            .values()
            .filter(|d| d.interface.as_deref() == Some(interface))
            .count()
    }

    /// Look up a processed device by MAC, ignoring case.
    pub fn device(&self, mac: &str) -> Option<&ProcessedDevice> {
        self.devices.get(mac).or_else(|| {
            self.devices
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(mac))
                .map(|(_, v)| v)
        })
    }

    /// Interfaces with a hostapd station list.
    pub fn wireless_interfaces(&self) -> impl Iterator<Item = &str> {
        self.wireless_info.keys().map(String::as_str)
    }
}
