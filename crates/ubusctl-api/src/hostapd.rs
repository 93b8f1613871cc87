// `hostapd` object
//
// Station listing and disconnection through the hostapd ubus bridge.

use std::collections::BTreeMap;
use std::time::Duration;

use serde_json::json;
use tracing::debug;

use crate::client::UbusClient;
use crate::error::Error;
use crate::models::HostapdInterface;

/// IEEE 802.11 reason code 5: disassociated because the AP is unable to
/// handle all currently associated stations.
pub const KICK_REASON: u16 = 5;

impl UbusClient {
    /// Associated stations per wireless interface.
    ///
    /// `hostapd/get_clients`
    pub async fn hostapd_clients(&self) -> Result<BTreeMap<String, HostapdInterface>, Error> {
        debug!("listing hostapd clients");
        self.call("hostapd", "get_clients", json!({})).await
    }

    /// Deauthenticate a station and ban it for `ban`.
    ///
    /// `hostapd/del_client` with `{addr, interface, deauth, reason, ban_time}`;
    /// `ban_time` is in milliseconds.
    pub async fn hostapd_del_client(
        &self,
        interface: &str,
        mac: &str,
        ban: Duration,
    ) -> Result<(), Error> {
        debug!(mac, interface, "kicking station");
        let ban_time = u64::try_from(ban.as_millis()).unwrap_or(u64::MAX);
        self.command(
            "hostapd",
            "del_client",
            json!({
                "addr": mac,
                "interface": interface,
                "deauth": true,
                "reason": KICK_REASON,
                "ban_time": ban_time,
            }),
        )
        .await
    }
}
