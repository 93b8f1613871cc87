// Wireless stations and configured networks.

use std::collections::BTreeMap;

use tracing::debug;

use ubusctl_api::{Error, UbusClient};

use crate::config::WirelessBackend;
use crate::convert::{connected_device, wireless_network};
use crate::model::{ConnectedDevice, InterfaceClients, WirelessNetwork};

use super::degrade;

/// Associated stations per interface from the configured backend.
///
/// `iwinfo` is not implemented and yields an empty map, as does a disabled
/// backend.
pub async fn clients(
    client: &UbusClient,
    backend: WirelessBackend,
) -> Result<BTreeMap<String, InterfaceClients>, Error> {
    match backend {
        WirelessBackend::Hostapd => {
            let ifaces = degrade("hostapd/get_clients", client.hostapd_clients().await)?;
            let info: BTreeMap<_, _> = ifaces
                .into_iter()
                .map(|(iface, data)| {
                    let entry = InterfaceClients {
                        interface: iface.clone(),
                        client_count: data.clients.len(),
                        clients: data.clients,
                    };
                    (iface, entry)
                })
                .collect();
            debug!(interfaces = info.len(), "hostapd clients");
            Ok(info)
        }
        WirelessBackend::Iwinfo | WirelessBackend::Disabled => Ok(BTreeMap::new()),
    }
}

/// Flatten per-interface station maps into one map keyed by MAC.
///
/// A MAC seen on several interfaces keeps the last interface in key order.
pub fn connected_devices(
    info: &BTreeMap<String, InterfaceClients>,
) -> BTreeMap<String, ConnectedDevice> {
    info.iter()
        .flat_map(|(iface, data)| {
            data.clients
                .iter()
                .map(move |(mac, station)| (mac.clone(), connected_device(mac, iface, station)))
        })
        .collect()
}

/// Configured wifi-ifaces from `network.wireless/status`, keyed by ifname.
pub async fn networks(client: &UbusClient) -> Result<BTreeMap<String, WirelessNetwork>, Error> {
    let radios = degrade("network.wireless/status", client.wireless_status().await)?;

    let mut networks = BTreeMap::new();
    for (radio, status) in &radios {
        for (section, iface) in status.interfaces.entries() {
            let net = wireless_network(radio, status, &section, iface);
            networks.insert(net.interface.clone(), net);
        }
    }
    debug!(networks = networks.len(), "wireless networks");
    Ok(networks)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn flattens_stations_across_interfaces() {
        let info: BTreeMap<String, InterfaceClients> = serde_json::from_value(json!({
            "wlan0": {
                "interface": "wlan0",
                "client_count": 2,
                "clients": {
                    "aa:aa:aa:aa:aa:01": { "signal": -40 },
                    "aa:aa:aa:aa:aa:02": { "signal": -70, "authorized": true }
                }
            },
            "wlan1": {
                "interface": "wlan1",
                "client_count": 1,
                "clients": { "bb:bb:bb:bb:bb:01": {} }
            }
        }))
        .unwrap();

        let devices = connected_devices(&info);
        assert_eq!(devices.len(), 3);

        let dev = &devices["aa:aa:aa:aa:aa:02"];
        assert_eq!(dev.interface.as_deref(), Some("wlan0"));
        assert!(dev.connected && dev.wireless);
        assert_eq!(dev.signal, Some(-70));
        assert_eq!(dev.attributes.get("authorized"), Some(&json!(true)));
        assert_eq!(
            devices["bb:bb:bb:bb:bb:01"].interface.as_deref(),
            Some("wlan1")
        );
    }
}
