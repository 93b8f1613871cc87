use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A station currently associated with the router.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectedDevice {
    pub mac: String,
    pub interface: Option<String>,
    pub connected: bool,
    pub wireless: bool,
    pub signal: Option<i64>,
    pub rx_rate: Option<u64>,
    pub tx_rate: Option<u64>,
    /// Every other attribute the wireless backend reported.
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

/// One DHCP lease.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DhcpLease {
    pub mac: String,
    pub hostname: Option<String>,
    pub ip: Option<String>,
}

/// A connected device with its resolved names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedDevice {
    #[serde(flatten)]
    pub device: ConnectedDevice,
    /// Static name, DHCP hostname or the MAC itself. Never empty.
    pub display_name: String,
    /// `"{display_name} ({interface})"`
    pub qualified_name: String,
    /// Identifier derived from `qualified_name`, unique within a snapshot.
    pub slug: String,
}
