// DHCP leases.
//
// Neither lease format is parsed yet: both backends return an empty map. The
// dnsmasq backend still reads its lease file so a dead session or transport
// surfaces here like in every other source.

use std::collections::BTreeMap;

use tracing::debug;

use ubusctl_api::{Error, UbusClient};

use crate::config::{DNSMASQ_LEASES_PATH, DhcpBackend};
use crate::model::DhcpLease;

use super::degrade;

/// Leases keyed by MAC from the configured backend.
pub async fn leases(
    client: &UbusClient,
    backend: DhcpBackend,
) -> Result<BTreeMap<String, DhcpLease>, Error> {
    match backend {
        DhcpBackend::Dnsmasq => {
            let file = degrade("dnsmasq leases", client.file_read(DNSMASQ_LEASES_PATH).await)?;
            debug!(
                bytes = file.data.as_deref().map_or(0, str::len),
                "dnsmasq lease file read"
            );
            Ok(BTreeMap::new())
        }
        DhcpBackend::Odhcpd | DhcpBackend::Disabled => Ok(BTreeMap::new()),
    }
}
